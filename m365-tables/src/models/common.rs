//! Shared Graph sub-resources used across several models

use serde::{Deserialize, Serialize};

/// Name/address pair used for senders, recipients and calendar owners.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailAddress {
    pub name: Option<String>,
    pub address: Option<String>,
}

/// Wrapper the mail and calendar resources put around an [`EmailAddress`].
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipient {
    pub email_address: Option<EmailAddress>,
}

impl Recipient {
    pub fn address(&self) -> Option<&str> {
        self.email_address.as_ref()?.address.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.email_address.as_ref()?.name.as_deref()
    }
}

/// A single directory identity reference.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub id: Option<String>,
    pub display_name: Option<String>,
}

/// The `identitySet` facet: the acting user/application/device.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentitySet {
    pub user: Option<Identity>,
    pub application: Option<Identity>,
}

impl IdentitySet {
    pub fn user_display_name(&self) -> Option<&str> {
        self.user.as_ref()?.display_name.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref()?.id.as_deref()
    }
}

/// Graph's zoned timestamp: a naive stamp plus an IANA/Windows zone name.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateTimeTimeZone {
    pub date_time: Option<String>,
    pub time_zone: Option<String>,
}

impl DateTimeTimeZone {
    /// The naive stamp as reported; zone interpretation stays with the host.
    pub fn stamp(&self) -> Option<&str> {
        self.date_time.as_deref()
    }
}
