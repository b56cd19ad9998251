//! The `m365_service_principal` table

use anyhow::Context as _;
use async_trait::async_trait;
use std::sync::Arc;

use crate::api::manager::ConnectionContext;
use crate::api::query::{QueryBuilder, build_filter};
use crate::models::directory::{SERVICE_PRINCIPAL_SELECT, ServicePrincipal};
use crate::models::{json_bool, json_list, json_str, json_string};
use crate::plugin::{
    Column, ColumnType, KeyColumn, QueryContext, TableDescriptor, TableHandler, TableSchema,
};
use crate::tables::{echoed_filter, stream_collection, suppress_ignorable};

const TABLE: &str = "m365_service_principal";
const IGNORE: &[&str] = &["Request_ResourceNotFound"];

pub struct ServicePrincipalTable {
    descriptor: TableDescriptor,
    schema: TableSchema<ServicePrincipal>,
}

impl ServicePrincipalTable {
    pub fn handler() -> Arc<dyn TableHandler> {
        Arc::new(Self::new())
    }

    pub fn new() -> Self {
        let schema = Self::schema();
        let descriptor = TableDescriptor {
            name: TABLE,
            description: "Service principals (enterprise applications) in the directory.",
            columns: schema.defs(),
            list_key_columns: vec![
                KeyColumn::optional("display_name"),
                KeyColumn::optional("service_principal_type"),
                KeyColumn::boolean("account_enabled"),
                KeyColumn::raw_filter(),
            ],
            get_key_columns: vec![KeyColumn::required("id")],
            ignore_codes: IGNORE,
        };
        Self { descriptor, schema }
    }

    fn schema() -> TableSchema<ServicePrincipal> {
        TableSchema::new(vec![
            Column::new("id", ColumnType::String, "Unique identifier for the service principal.", |s: &ServicePrincipal| {
                json_str(&s.id)
            }),
            Column::new("display_name", ColumnType::String, "Display name.", |s: &ServicePrincipal| {
                json_string(&s.display_name)
            }),
            Column::new("app_id", ColumnType::String, "Application (client) ID this principal represents.", |s: &ServicePrincipal| {
                json_string(&s.app_id)
            }),
            Column::new("app_display_name", ColumnType::String, "Display name of the backing application.", |s: &ServicePrincipal| {
                json_string(&s.app_display_name)
            }),
            Column::new("account_enabled", ColumnType::Bool, "Whether sign-in to the principal is allowed.", |s: &ServicePrincipal| {
                json_bool(&s.account_enabled)
            }),
            Column::new("service_principal_type", ColumnType::String, "Application, ManagedIdentity or Legacy.", |s: &ServicePrincipal| {
                json_string(&s.service_principal_type)
            }),
            Column::new("sign_in_audience", ColumnType::String, "Supported account types.", |s: &ServicePrincipal| {
                json_string(&s.sign_in_audience)
            }),
            Column::new("app_owner_organization_id", ColumnType::String, "Tenant that owns the backing application.", |s: &ServicePrincipal| {
                json_string(&s.app_owner_organization_id)
            }),
            Column::new("app_role_assignment_required", ColumnType::Bool, "Whether users need an app role assignment to sign in.", |s: &ServicePrincipal| {
                json_bool(&s.app_role_assignment_required)
            }),
            Column::new("login_url", ColumnType::String, "SSO login URL.", |s: &ServicePrincipal| {
                json_string(&s.login_url)
            }),
            Column::new("logout_url", ColumnType::String, "Logout URL.", |s: &ServicePrincipal| {
                json_string(&s.logout_url)
            }),
            Column::new("service_principal_names", ColumnType::Json, "Identifier URIs and app ID URLs.", |s: &ServicePrincipal| {
                json_list(&s.service_principal_names)
            }),
            Column::new("tags", ColumnType::Json, "Custom tags.", |s: &ServicePrincipal| {
                json_list(&s.tags)
            }),
            Column::new("filter", ColumnType::String, "Raw OData $filter passed through to the remote API.", |_| None),
        ])
    }
}

#[async_trait]
impl TableHandler for ServicePrincipalTable {
    fn descriptor(&self) -> &TableDescriptor {
        &self.descriptor
    }

    async fn list(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let filter = build_filter(ctx.quals(), &[])?;
            let path = QueryBuilder::new("servicePrincipals")
                .select(SERVICE_PRINCIPAL_SELECT)
                .filter(filter)
                .top(Some(ctx.top_hint()))
                .build();
            stream_collection(&client, &path, &self.schema, ctx, &[echoed_filter(ctx)])
                .await
                .context("Failed to list service principals")
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }

    async fn get(&self, conn: &ConnectionContext, ctx: &QueryContext) -> anyhow::Result<()> {
        let Some(id) = ctx.qual_string("id") else {
            anyhow::bail!("get on {} requires an id qual", TABLE);
        };
        let result = async {
            let client = conn.client().await.context("Failed to create Graph client")?;
            let principal: ServicePrincipal = client
                .get(&format!(
                    "servicePrincipals/{}?$select={}",
                    id, SERVICE_PRINCIPAL_SELECT
                ))
                .await
                .with_context(|| format!("Failed to get service principal {}", id))?;
            ctx.emit(self.schema.row(&principal));
            Ok(())
        }
        .await;
        suppress_ignorable(result, TABLE, IGNORE)
    }
}
