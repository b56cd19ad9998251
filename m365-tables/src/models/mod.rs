//! Concrete models for Graph resources
//!
//! Each table deserializes API responses into these structs and flattens
//! them through typed column extractors. Derived accessors on the models
//! (the adapter methods) do the nested-field flattening; extractors stay
//! one-liners.

pub mod calendar;
pub mod common;
pub mod directory;
pub mod files;
pub mod mail;
pub mod teamwork;

pub use calendar::{Calendar, Event};
pub use common::{DateTimeTimeZone, EmailAddress, Identity, IdentitySet, Recipient};
pub use directory::{Application, DirectoryRole, Domain, Group, ServicePrincipal, User};
pub use files::{Drive, DriveItem};
pub use mail::{Contact, Message};
pub use teamwork::{Channel, Team};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

// Extractor helpers: lift optional model fields into column values.

pub(crate) fn json_string(v: &Option<String>) -> Option<Value> {
    v.clone().map(Value::String)
}

pub(crate) fn json_str(v: &str) -> Option<Value> {
    Some(Value::String(v.to_string()))
}

pub(crate) fn json_bool(v: &Option<bool>) -> Option<Value> {
    v.map(Value::Bool)
}

pub(crate) fn json_int(v: &Option<i64>) -> Option<Value> {
    v.map(|i| Value::Number(i.into()))
}

pub(crate) fn json_timestamp(v: &Option<DateTime<Utc>>) -> Option<Value> {
    v.map(|dt| Value::String(dt.to_rfc3339()))
}

pub(crate) fn json_value<T: Serialize>(v: &Option<T>) -> Option<Value> {
    v.as_ref().and_then(|x| serde_json::to_value(x).ok())
}

pub(crate) fn json_list<T: Serialize>(v: &[T]) -> Option<Value> {
    serde_json::to_value(v).ok()
}
