//! Teamwork resources: teams and channels

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A team. Listings through `joinedTeams` return a reduced projection;
/// columns missing there are marked for get-hydration in the table schema.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Team {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub internal_id: Option<String>,
    pub specialization: Option<String>,
    pub visibility: Option<String>,
    pub classification: Option<String>,
    pub is_archived: Option<bool>,
    pub web_url: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
}

/// A channel within a team.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Channel {
    pub id: String,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub membership_type: Option<String>,
    pub web_url: Option<String>,
    pub is_favorite_by_default: Option<bool>,
    pub created_date_time: Option<DateTime<Utc>>,
}
