//! Typed models for metadata endpoint responses
//!
//! Report-module entities arrive with snake_case keys, CRM entities with
//! camelCase keys matching their envelope names.

use serde::Deserialize;

/// Ordered collection of entities, normalized out of the per-endpoint
/// response envelope. Wire order is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCollection<T> {
    pub items: Vec<T>,
}

impl<T> EntityCollection<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for EntityCollection<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EntityCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Advertising channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Channel {
    pub id: i64,
    pub title: String,
}

/// Channel reference embedded in a placement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlacementChannel {
    pub id: i64,
    pub title: String,
    pub channel_id: i64,
}

/// Ad placement inside a channel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Placement {
    pub id: i64,
    pub title: String,
    pub channel: PlacementChannel,
}

/// Advertising campaign.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub placement_id: i64,
    pub title: String,
}

/// Search keyword.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
}

/// Single advertisement record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Ad {
    pub id: i64,
    pub external_id: String,
    pub placement_id: i64,
    pub campaign_id: Option<i64>,
    pub external_campaign_id: Option<String>,
    #[serde(rename = "type")]
    pub ad_type: String,
    pub title: Option<String>,
    pub text: Option<String>,
    pub text1: Option<String>,
    pub text2: Option<String>,
    pub preview_url: Option<String>,
    pub href: Option<String>,
    pub device: Option<String>,
    pub created_at: String,
}

/// CRM custom field descriptor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmCustomField {
    pub id: i64,
    pub crm_account_id: i64,
    pub element_type_id: i64,
    pub custom_field_title: String,
    pub field_type_id: i64,
    pub is_multiple: bool,
    pub group_id: Option<i64>,
    pub description: Option<String>,
    pub status: i64,
    pub is_filter: bool,
    pub filter_param_id: Option<i64>,
    pub default_visibility: bool,
}

/// Grouping of CRM custom fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmCustomFieldGroup {
    pub id: i64,
    pub title: String,
    pub crm_account_id: i64,
    pub default_visibility: bool,
    pub sort: i64,
}
