//! Wire types for the discovery and provider search responses
//!
//! Providers are not always consistent about field types, so every field
//! decodes leniently: a missing or mistyped value becomes empty, false or
//! absent instead of failing the whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// One entry of the discovery response
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DiscoveredProvider {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_order")]
    pub order: i64,
}

/// Decode the provider list out of a discovery payload
pub fn decode_providers(data: Option<&Value>) -> Vec<DiscoveredProvider> {
    let Some(Value::Array(items)) = data else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match DiscoveredProvider::deserialize(item) {
            Ok(provider) => Some(provider),
            Err(e) => {
                debug!("Skipping malformed provider entry: {}", e);
                None
            }
        })
        .collect()
}

/// One page of results from a provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_paginated: bool,
    /// Cursor for the next page, absent unless positive
    #[serde(default, deserialize_with = "lenient_cursor")]
    pub cursor: Option<u64>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub entries: Vec<RawEntry>,
}

impl SearchPage {
    /// Decode a search payload; an absent or empty object carries no page
    pub fn decode(data: Option<&Value>) -> Option<Self> {
        match data {
            Some(value) if value.as_object().is_some_and(|map| !map.is_empty()) => {
                Self::deserialize(value).ok()
            }
            _ => None,
        }
    }
}

/// A single result entry as sent by a provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub icon: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub rounded: bool,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub subline: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub resource_url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub thumbnail_url: String,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|n| n != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.as_str(), "true" | "1"),
        _ => false,
    })
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(integer(&Value::deserialize(deserializer)?).unwrap_or(0))
}

fn lenient_cursor<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(integer(&Value::deserialize(deserializer)?)
        .filter(|cursor| *cursor > 0)
        .map(|cursor| cursor as u64))
}

fn lenient_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<RawEntry>, D::Error> {
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .iter()
        .filter_map(|item| match RawEntry::deserialize(item) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping malformed search entry: {}", e);
                None
            }
        })
        .collect())
}
