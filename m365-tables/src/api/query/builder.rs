//! Fluent assembly of Graph request paths with OData query options

use crate::api::constants::MAX_PAGE_SIZE;

/// Builds a relative request path with `$select`, `$filter`, `$top` and
/// `$expand` options. The filter value is URL-encoded; everything else is
/// passed through as given.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    resource: String,
    select: Option<String>,
    filter: Option<String>,
    top: Option<u32>,
    expand: Option<String>,
}

impl QueryBuilder {
    /// `resource` is the collection path relative to the API root, e.g.
    /// `users` or `users/{id}/messages`.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            select: None,
            filter: None,
            top: None,
            expand: None,
        }
    }

    pub fn select(mut self, fields: &str) -> Self {
        self.select = Some(fields.to_string());
        self
    }

    pub fn filter(mut self, filter: Option<String>) -> Self {
        self.filter = filter.filter(|f| !f.is_empty());
        self
    }

    /// Page-size hint, capped at the Graph `$top` ceiling.
    pub fn top(mut self, top: Option<u32>) -> Self {
        self.top = top.map(|t| t.min(MAX_PAGE_SIZE));
        self
    }

    pub fn expand(mut self, expand: &str) -> Self {
        self.expand = Some(expand.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut options = Vec::new();
        if let Some(select) = &self.select {
            options.push(format!("$select={}", select));
        }
        if let Some(filter) = &self.filter {
            options.push(format!("$filter={}", urlencoding::encode(filter)));
        }
        if let Some(top) = self.top {
            options.push(format!("$top={}", top));
        }
        if let Some(expand) = &self.expand {
            options.push(format!("$expand={}", expand));
        }

        if options.is_empty() {
            self.resource.clone()
        } else {
            format!("{}?{}", self.resource, options.join("&"))
        }
    }
}
