//! Result row types

use super::icons;
use crate::providers::Provider;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of row in the result list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    #[default]
    Default,
    CategorySeparator,
    FetchMoreTrigger,
}

impl ResultType {
    /// Numeric form exposed to the presentation layer
    pub fn as_u32(self) -> u32 {
        match self {
            Self::Default => 0,
            Self::CategorySeparator => 1,
            Self::FetchMoreTrigger => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::CategorySeparator => "category_separator",
            Self::FetchMoreTrigger => "fetch_more_trigger",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single row of the aggregated result list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub provider_id: String,
    pub provider_name: String,
    /// Provider display order at creation time
    pub order: i64,
    pub result_type: ResultType,
    pub title: String,
    pub subline: String,
    pub resource_url: String,
    /// Thumbnail and icon references joined by `;`
    pub icons: String,
    pub is_rounded: bool,
}

impl SearchResult {
    /// Heading row of a provider's block
    pub fn category_separator(provider: &Provider) -> Self {
        Self::marker(provider, ResultType::CategorySeparator)
    }

    /// Trailing "load more" row of a provider's block
    pub fn fetch_more_trigger(provider: &Provider) -> Self {
        Self::marker(provider, ResultType::FetchMoreTrigger)
    }

    fn marker(provider: &Provider, result_type: ResultType) -> Self {
        Self {
            provider_id: provider.id.clone(),
            provider_name: provider.name.clone(),
            order: provider.order,
            result_type,
            ..Default::default()
        }
    }

    /// Block ordering key
    pub fn sort_key(&self) -> (i64, &str) {
        (self.order, self.provider_name.as_str())
    }

    pub fn belongs_to(&self, provider_id: &str) -> bool {
        self.provider_id == provider_id
    }

    pub fn is(&self, result_type: ResultType) -> bool {
        self.result_type == result_type
    }

    /// Value of a named attribute
    pub fn data(&self, role: Role) -> RoleValue {
        match role {
            Role::ProviderName => RoleValue::Text(self.provider_name.clone()),
            Role::ProviderId => RoleValue::Text(self.provider_id.clone()),
            Role::Icons => RoleValue::Text(self.icons.clone()),
            Role::ImagePlaceholder => {
                RoleValue::Text(icons::placeholder_for(&self.provider_id).to_string())
            }
            Role::Title => RoleValue::Text(self.title.clone()),
            Role::Subline => RoleValue::Text(self.subline.clone()),
            Role::ResourceUrl => RoleValue::Text(self.resource_url.clone()),
            Role::Rounded => RoleValue::Bool(self.is_rounded),
            Role::Type => RoleValue::Number(self.result_type.as_u32()),
            Role::TypeAsString => RoleValue::Text(self.result_type.as_str().to_string()),
        }
    }
}

/// Named attributes a presentation layer can read per row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    ProviderName,
    ProviderId,
    Icons,
    ImagePlaceholder,
    Title,
    Subline,
    ResourceUrl,
    Type,
    TypeAsString,
    Rounded,
}

impl Role {
    pub const ALL: [Role; 10] = [
        Role::ProviderName,
        Role::ProviderId,
        Role::Icons,
        Role::ImagePlaceholder,
        Role::Title,
        Role::Subline,
        Role::ResourceUrl,
        Role::Type,
        Role::TypeAsString,
        Role::Rounded,
    ];

    /// Key the presentation layer binds to
    pub fn name(self) -> &'static str {
        match self {
            Self::ProviderName => "providerName",
            Self::ProviderId => "providerId",
            Self::Icons => "icons",
            Self::ImagePlaceholder => "imagePlaceholder",
            Self::Title => "resultTitle",
            Self::Subline => "subline",
            Self::ResourceUrl => "resourceUrlRole",
            Self::Type => "type",
            Self::TypeAsString => "typeAsString",
            Self::Rounded => "isRounded",
        }
    }
}

/// Attribute value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RoleValue {
    Text(String),
    Bool(bool),
    Number(u32),
}

impl RoleValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}
