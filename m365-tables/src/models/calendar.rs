//! Calendar resources: calendars and events

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{DateTimeTimeZone, EmailAddress, Recipient};

/// A user calendar.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Calendar {
    pub id: String,
    pub name: Option<String>,
    pub color: Option<String>,
    pub change_key: Option<String>,
    pub can_edit: Option<bool>,
    pub can_share: Option<bool>,
    pub can_view_private_items: Option<bool>,
    pub is_default_calendar: Option<bool>,
    pub is_removable: Option<bool>,
    pub owner: Option<EmailAddress>,
    pub allowed_online_meeting_providers: Vec<String>,
}

impl Calendar {
    pub fn owner_name(&self) -> Option<&str> {
        self.owner.as_ref()?.name.as_deref()
    }

    pub fn owner_address(&self) -> Option<&str> {
        self.owner.as_ref()?.address.as_deref()
    }
}

/// A calendar event.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub subject: Option<String>,
    pub body_preview: Option<String>,
    pub importance: Option<String>,
    pub sensitivity: Option<String>,
    pub show_as: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub series_master_id: Option<String>,
    pub is_all_day: Option<bool>,
    pub is_cancelled: Option<bool>,
    pub is_organizer: Option<bool>,
    pub is_online_meeting: Option<bool>,
    pub response_requested: Option<bool>,
    pub web_link: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_modified_date_time: Option<DateTime<Utc>>,
    pub start: Option<DateTimeTimeZone>,
    pub end: Option<DateTimeTimeZone>,
    pub location: Option<Location>,
    pub organizer: Option<Recipient>,
    pub attendees: Vec<Attendee>,
}

/// Event location facet; only the display name is surfaced as a column.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    pub display_name: Option<String>,
}

/// One attendee with response status.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attendee {
    #[serde(rename = "type")]
    pub attendee_type: Option<String>,
    pub email_address: Option<EmailAddress>,
    pub status: Option<ResponseStatus>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseStatus {
    pub response: Option<String>,
    pub time: Option<String>,
}

impl Event {
    pub fn start_time(&self) -> Option<&str> {
        self.start.as_ref()?.stamp()
    }

    pub fn end_time(&self) -> Option<&str> {
        self.end.as_ref()?.stamp()
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location.as_ref()?.display_name.as_deref()
    }

    pub fn organizer_name(&self) -> Option<&str> {
        self.organizer.as_ref()?.name()
    }

    pub fn organizer_address(&self) -> Option<&str> {
        self.organizer.as_ref()?.address()
    }
}

pub const EVENT_SELECT: &str = "id,subject,bodyPreview,importance,sensitivity,showAs,type,\
seriesMasterId,isAllDay,isCancelled,isOrganizer,isOnlineMeeting,responseRequested,webLink,\
createdDateTime,lastModifiedDateTime,start,end,location,organizer,attendees";
