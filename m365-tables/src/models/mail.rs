//! Mailbox resources: messages and personal contacts

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::{EmailAddress, Recipient};

/// A mailbox message.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub id: String,
    pub subject: Option<String>,
    pub body_preview: Option<String>,
    pub importance: Option<String>,
    pub inference_classification: Option<String>,
    pub internet_message_id: Option<String>,
    pub conversation_id: Option<String>,
    pub is_read: Option<bool>,
    pub is_draft: Option<bool>,
    pub has_attachments: Option<bool>,
    pub received_date_time: Option<DateTime<Utc>>,
    pub sent_date_time: Option<DateTime<Utc>>,
    pub web_link: Option<String>,
    pub from: Option<Recipient>,
    pub sender: Option<Recipient>,
    pub to_recipients: Vec<Recipient>,
    pub cc_recipients: Vec<Recipient>,
    pub categories: Vec<String>,
}

impl Message {
    pub fn from_address(&self) -> Option<&str> {
        self.from.as_ref()?.address()
    }

    pub fn sender_address(&self) -> Option<&str> {
        self.sender.as_ref()?.address()
    }

    /// Bare addresses of the To line, dropping recipients without one.
    pub fn to_addresses(&self) -> Vec<&str> {
        self.to_recipients.iter().filter_map(Recipient::address).collect()
    }
}

pub const MESSAGE_SELECT: &str = "id,subject,bodyPreview,importance,\
inferenceClassification,internetMessageId,conversationId,isRead,isDraft,hasAttachments,\
receivedDateTime,sentDateTime,webLink,from,sender,toRecipients,ccRecipients,categories";

/// A personal (Outlook) contact.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub id: String,
    pub display_name: Option<String>,
    pub given_name: Option<String>,
    pub surname: Option<String>,
    pub middle_name: Option<String>,
    pub nick_name: Option<String>,
    pub company_name: Option<String>,
    pub job_title: Option<String>,
    pub department: Option<String>,
    pub mobile_phone: Option<String>,
    pub personal_notes: Option<String>,
    pub created_date_time: Option<DateTime<Utc>>,
    pub last_modified_date_time: Option<DateTime<Utc>>,
    pub email_addresses: Vec<EmailAddress>,
    pub business_phones: Vec<String>,
    pub home_phones: Vec<String>,
}

impl Contact {
    /// First listed email address, the convention for "primary".
    pub fn primary_email(&self) -> Option<&str> {
        self.email_addresses.first()?.address.as_deref()
    }
}

pub const CONTACT_SELECT: &str = "id,displayName,givenName,surname,middleName,nickName,\
companyName,jobTitle,department,mobilePhone,personalNotes,createdDateTime,\
lastModifiedDateTime,emailAddresses,businessPhones,homePhones";
