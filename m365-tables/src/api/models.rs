//! Connection configuration and credential models

use serde::Deserialize;
use std::env;

use super::constants;

/// Connection-level configuration as supplied by the host. Every field is
/// optional; unset fields fall back to environment variables during
/// [`CredentialSet::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub tenant_id: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub certificate_path: Option<String>,
    pub certificate_password: Option<String>,
    pub enable_msi: Option<bool>,
    pub msi_endpoint: Option<String>,
    pub environment: Option<String>,
    pub default_user_id: Option<String>,
}

impl ClientConfig {
    /// Parse a host-supplied JSON configuration object.
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

/// Fully resolved credential set. Immutable after resolution; authentication
/// strategy selection is a pure function of this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialSet {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub certificate_path: String,
    pub certificate_password: String,
    pub enable_msi: bool,
    pub msi_endpoint: Option<String>,
    pub environment: Option<String>,
    pub default_user_id: Option<String>,
}

impl CredentialSet {
    /// Merge connection configuration with environment-variable fallbacks.
    /// Connection values take precedence. No validation happens here;
    /// invalid combinations surface later as authentication failures.
    pub fn resolve(config: &ClientConfig) -> Self {
        Self {
            tenant_id: field(&config.tenant_id, constants::ENV_TENANT_ID),
            client_id: field(&config.client_id, constants::ENV_CLIENT_ID),
            client_secret: field(&config.client_secret, constants::ENV_CLIENT_SECRET),
            certificate_path: field(&config.certificate_path, constants::ENV_CERTIFICATE_PATH),
            certificate_password: field(
                &config.certificate_password,
                constants::ENV_CERTIFICATE_PASSWORD,
            ),
            enable_msi: config.enable_msi.unwrap_or_else(|| {
                env::var(constants::ENV_ENABLE_MSI)
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false)
            }),
            msi_endpoint: optional(&config.msi_endpoint, constants::ENV_MSI_ENDPOINT),
            environment: optional(&config.environment, constants::ENV_ENVIRONMENT),
            default_user_id: optional(&config.default_user_id, constants::ENV_DEFAULT_USER_ID),
        }
    }
}

fn field(configured: &Option<String>, env_name: &str) -> String {
    configured
        .clone()
        .or_else(|| env::var(env_name).ok())
        .unwrap_or_default()
}

fn optional(configured: &Option<String>, env_name: &str) -> Option<String> {
    configured
        .clone()
        .or_else(|| env::var(env_name).ok())
        .filter(|v| !v.is_empty())
}

/// Target cloud instance. Four recognized environment names plus the public
/// cloud as default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudEnvironment {
    Public,
    UsGovernment,
    China,
    Germany,
}

impl CloudEnvironment {
    /// Map an environment name to a cloud. Unrecognized names resolve to the
    /// public cloud with a logged warning rather than silently.
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            None | Some("") => Self::Public,
            Some("AZUREPUBLICCLOUD") => Self::Public,
            Some("AZUREUSGOVERNMENTCLOUD") => Self::UsGovernment,
            Some("AZURECHINACLOUD") => Self::China,
            Some("AZUREGERMANCLOUD") => Self::Germany,
            Some(other) => {
                log::warn!(
                    "Unrecognized cloud environment {:?}, falling back to the public cloud",
                    other
                );
                Self::Public
            }
        }
    }

    /// Base URL of the identity platform for this cloud.
    pub fn login_endpoint(&self) -> &'static str {
        match self {
            Self::Public => "https://login.microsoftonline.com",
            Self::UsGovernment => "https://login.microsoftonline.us",
            Self::China => "https://login.chinacloudapi.cn",
            Self::Germany => "https://login.microsoftonline.de",
        }
    }

    /// Base URL of the Graph API for this cloud, without the version segment.
    pub fn graph_endpoint(&self) -> &'static str {
        match self {
            Self::Public => "https://graph.microsoft.com",
            Self::UsGovernment => "https://graph.microsoft.us",
            Self::China => "https://microsoftgraph.chinacloudapi.cn",
            Self::Germany => "https://graph.microsoft.de",
        }
    }
}

/// A cached bearer token with its expiry.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl TokenInfo {
    /// True when the token is expired or will expire within the grace period.
    pub fn is_expired(&self, grace_secs: i64) -> bool {
        chrono::Utc::now() + chrono::Duration::seconds(grace_secs) >= self.expires_at
    }
}
