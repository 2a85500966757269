//! Group domain model.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A directory group.
///
/// The group ID is the stable identity key and is immutable once
/// assigned; domain + ID form the canonical composite key. The display
/// name is mutable and unique only within (tenant, domain).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// Owning directory / user-store partition.
    pub domain: String,
    pub tenant_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Location URI of the group, if the directory exposes one.
    pub location: Option<String>,
    /// Claim-name to value map, populated on demand for the claims a
    /// caller requested. Post-listeners may enrich this in place.
    pub attributes: HashMap<String, String>,
}

/// Input for creating a group through the underlying directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    pub domain: String,
    pub tenant_id: i32,
    /// User IDs to enroll as initial members.
    pub members: Vec<String>,
    pub location: Option<String>,
    pub attributes: HashMap<String, String>,
}

/// Sort direction for group listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Pagination and sorting parameters for `list_groups`.
///
/// A `limit` of zero or less means unbounded, per directory convention.
/// Sort field validation is the directory's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupListParams {
    pub limit: i32,
    pub offset: u32,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    /// User-store domain the listing is scoped to.
    pub domain: String,
}

impl GroupListParams {
    /// Unbounded listing over the given domain with default sorting.
    pub fn unbounded(domain: impl Into<String>) -> Self {
        Self {
            limit: 0,
            offset: 0,
            sort_by: None,
            sort_order: SortOrder::Asc,
            domain: domain.into(),
        }
    }
}
