//! Shared constants for the Graph API layer

/// Graph REST API version used for all table listings.
pub const API_VERSION: &str = "v1.0";

/// Hard ceiling the Graph API places on `$top`.
pub const MAX_PAGE_SIZE: u32 = 999;

/// Refresh tokens this many seconds before their reported expiry.
pub const TOKEN_EXPIRY_GRACE_SECS: i64 = 300;

/// Default validity window assumed for CLI tokens whose expiry stamp
/// cannot be parsed.
pub const CLI_TOKEN_FALLBACK_SECS: i64 = 45 * 60;

/// Lifetime of the client-assertion JWT used for certificate auth.
pub const ASSERTION_LIFETIME_SECS: i64 = 600;

// Environment-variable fallbacks for connection configuration. Connection
// values always win; these are consulted only for unset fields.
pub const ENV_TENANT_ID: &str = "AZURE_TENANT_ID";
pub const ENV_CLIENT_ID: &str = "AZURE_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AZURE_CLIENT_SECRET";
pub const ENV_CERTIFICATE_PATH: &str = "AZURE_CERTIFICATE_PATH";
pub const ENV_CERTIFICATE_PASSWORD: &str = "AZURE_CERTIFICATE_PASSWORD";
pub const ENV_ENABLE_MSI: &str = "AZURE_ENABLE_MSI";
pub const ENV_MSI_ENDPOINT: &str = "AZURE_MSI_ENDPOINT";
pub const ENV_ENVIRONMENT: &str = "AZURE_ENVIRONMENT";
pub const ENV_DEFAULT_USER_ID: &str = "M365_DEFAULT_USER_ID";

/// Instance-metadata token endpoint used when no explicit managed-identity
/// endpoint is configured.
pub const DEFAULT_MSI_ENDPOINT: &str =
    "http://169.254.169.254/metadata/identity/oauth2/token";

/// IMDS API version for managed-identity token requests.
pub const MSI_API_VERSION: &str = "2018-02-01";

/// Fixed location of the Azure CLI. Deliberately not resolved through
/// `PATH`: a caller-controlled `PATH` must not decide what we execute.
#[cfg(windows)]
pub const AZURE_CLI_PATH: &str =
    r"C:\Program Files (x86)\Microsoft SDKs\Azure\CLI2\wbin\az.cmd";
#[cfg(not(windows))]
pub const AZURE_CLI_PATH: &str = "/usr/bin/az";
