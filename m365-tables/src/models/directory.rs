//! Directory resources: users, groups, service principals, applications,
//! domains and directory roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory user.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    pub user_principal_name: Option<String>,
    pub mail: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub user_type: Option<String>,
    pub account_enabled: Option<bool>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub mobile_phone: Option<String>,
    pub office_location: Option<String>,
    pub preferred_language: Option<String>,
    pub employee_id: Option<String>,
    pub usage_location: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub business_phones: Vec<String>,
    pub im_addresses: Vec<String>,
}

/// Select list matching the [`User`] fields.
pub const USER_SELECT: &str = "id,displayName,userPrincipalName,mail,givenName,surname,\
userType,accountEnabled,jobTitle,department,mobilePhone,officeLocation,preferredLanguage,\
employeeId,usageLocation,createdDateTime,businessPhones,imAddresses";

/// A directory group.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub mail: Option<String>,
    pub mail_enabled: Option<bool>,
    pub mail_nickname: Option<String>,
    pub security_enabled: Option<bool>,
    pub visibility: Option<String>,
    pub classification: Option<String>,
    pub is_assignable_to_role: Option<bool>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub expiration_date_time: Option<DateTime<Utc>>,
    pub renewed_date_time: Option<DateTime<Utc>>,
    pub group_types: Vec<String>,
}

impl Group {
    /// Microsoft 365 groups carry the `Unified` marker in `groupTypes`.
    pub fn is_unified(&self) -> bool {
        self.group_types.iter().any(|t| t == "Unified")
    }
}

pub const GROUP_SELECT: &str = "id,displayName,description,mail,mailEnabled,mailNickname,\
securityEnabled,visibility,classification,isAssignableToRole,createdDateTime,\
expirationDateTime,renewedDateTime,groupTypes";

/// A service principal (enterprise application instance).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServicePrincipal {
    pub id: String,
    pub display_name: Option<String>,
    pub app_id: Option<String>,
    pub app_display_name: Option<String>,
    pub account_enabled: Option<bool>,
    pub service_principal_type: Option<String>,
    pub sign_in_audience: Option<String>,
    pub app_owner_organization_id: Option<String>,
    pub app_role_assignment_required: Option<bool>,
    pub login_url: Option<String>,
    pub logout_url: Option<String>,
    pub service_principal_names: Vec<String>,
    pub tags: Vec<String>,
}

pub const SERVICE_PRINCIPAL_SELECT: &str = "id,displayName,appId,appDisplayName,\
accountEnabled,servicePrincipalType,signInAudience,appOwnerOrganizationId,\
appRoleAssignmentRequired,loginUrl,logoutUrl,servicePrincipalNames,tags";

/// An application registration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Application {
    pub id: String,
    pub app_id: Option<String>,
    pub display_name: Option<String>,
    pub sign_in_audience: Option<String>,
    pub publisher_domain: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub identifier_uris: Vec<String>,
    pub tags: Vec<String>,
    pub web: Option<WebApplication>,
}

/// The `web` facet of an application registration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebApplication {
    pub home_page_url: Option<String>,
    pub logout_url: Option<String>,
    pub redirect_uris: Vec<String>,
}

impl Application {
    pub fn home_page_url(&self) -> Option<&str> {
        self.web.as_ref()?.home_page_url.as_deref()
    }

    pub fn redirect_uris(&self) -> &[String] {
        self.web.as_ref().map(|w| w.redirect_uris.as_slice()).unwrap_or(&[])
    }
}

pub const APPLICATION_SELECT: &str = "id,appId,displayName,signInAudience,publisherDomain,\
createdDateTime,identifierUris,tags,web";

/// A verified or pending domain of the tenant.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Domain {
    pub id: String,
    pub authentication_type: Option<String>,
    pub is_admin_managed: Option<bool>,
    pub is_default: Option<bool>,
    pub is_initial: Option<bool>,
    pub is_root: Option<bool>,
    pub is_verified: Option<bool>,
    pub password_notification_window_in_days: Option<i64>,
    pub password_validity_period_in_days: Option<i64>,
    pub supported_services: Vec<String>,
}

/// An activated directory role.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectoryRole {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub role_template_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_deserializes_from_graph_shape() {
        let value = json!({
            "id": "u-1",
            "displayName": "Ada Example",
            "userPrincipalName": "ada@contoso.onmicrosoft.com",
            "accountEnabled": true,
            "businessPhones": ["+1 555 0100"],
            "createdDateTime": "2023-04-01T08:30:00Z"
        });
        let user: User = serde_json::from_value(value).unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.display_name.as_deref(), Some("Ada Example"));
        assert_eq!(user.account_enabled, Some(true));
        assert_eq!(user.business_phones.len(), 1);
        assert!(user.created_date_time.is_some());
        assert!(user.mail.is_none());
    }

    #[test]
    fn unified_groups_are_detected() {
        let group: Group = serde_json::from_value(json!({
            "id": "g-1",
            "groupTypes": ["DynamicMembership", "Unified"]
        }))
        .unwrap();
        assert!(group.is_unified());

        let security: Group = serde_json::from_value(json!({"id": "g-2"})).unwrap();
        assert!(!security.is_unified());
    }

    #[test]
    fn application_web_facet_flattens() {
        let app: Application = serde_json::from_value(json!({
            "id": "a-1",
            "web": {
                "homePageUrl": "https://app.contoso.com",
                "redirectUris": ["https://app.contoso.com/auth"]
            }
        }))
        .unwrap();
        assert_eq!(app.home_page_url(), Some("https://app.contoso.com"));
        assert_eq!(app.redirect_uris().len(), 1);
    }
}
