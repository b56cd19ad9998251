//! File-storage resources: drives and drive items

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::IdentitySet;

/// A document library or personal drive.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Drive {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub drive_type: Option<String>,
    pub web_url: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_modified_date_time: Option<DateTime<Utc>>,
    pub owner: Option<IdentitySet>,
    pub quota: Option<Quota>,
}

/// Storage quota facet.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Quota {
    pub deleted: Option<i64>,
    pub remaining: Option<i64>,
    pub state: Option<String>,
    pub total: Option<i64>,
    pub used: Option<i64>,
}

impl Drive {
    pub fn owner_display_name(&self) -> Option<&str> {
        self.owner.as_ref()?.user_display_name()
    }

    pub fn quota_total(&self) -> Option<i64> {
        self.quota.as_ref()?.total
    }

    pub fn quota_used(&self) -> Option<i64> {
        self.quota.as_ref()?.used
    }

    pub fn quota_state(&self) -> Option<&str> {
        self.quota.as_ref()?.state.as_deref()
    }
}

/// A file or folder inside a drive.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DriveItem {
    pub id: String,
    pub name: Option<String>,
    pub size: Option<i64>,
    pub web_url: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_modified_date_time: Option<DateTime<Utc>>,
    pub e_tag: Option<String>,
    pub folder: Option<FolderFacet>,
    pub file: Option<FileFacet>,
    pub parent_reference: Option<ItemReference>,
    pub created_by: Option<IdentitySet>,
}

/// Marks an item as a folder.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderFacet {
    pub child_count: Option<i64>,
}

/// Marks an item as a file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FileFacet {
    pub mime_type: Option<String>,
}

/// Reference to the containing drive and folder.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemReference {
    pub drive_id: Option<String>,
    pub id: Option<String>,
    pub path: Option<String>,
}

impl DriveItem {
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }

    pub fn child_count(&self) -> Option<i64> {
        self.folder.as_ref()?.child_count
    }

    pub fn mime_type(&self) -> Option<&str> {
        self.file.as_ref()?.mime_type.as_deref()
    }

    pub fn parent_path(&self) -> Option<&str> {
        self.parent_reference.as_ref()?.path.as_deref()
    }

    pub fn created_by_name(&self) -> Option<&str> {
        self.created_by.as_ref()?.user_display_name()
    }
}
