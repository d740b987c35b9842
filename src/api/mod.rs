//! Remote admin API access.
//!
//! The catalog traits are the injection seam between the selection logic and
//! the network: [`ApiClient`] implements them over HTTP, tests implement them
//! in memory.

mod client;
mod error;

use async_trait::async_trait;
pub use client::*;
pub use error::*;
use serde::Serialize;

use crate::models::{Group, Page, ScimMapping};

/// Query against the `provider-scim` property mapping catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappingQuery {
    pub ordering: String,
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Query against the group catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupQuery {
    pub ordering: String,
    pub include_users: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl GroupQuery {
    /// Groups ordered by name without member lists, optionally filtered.
    pub fn by_name(search: Option<&str>) -> Self {
        Self {
            ordering: "name".to_string(),
            include_users: false,
            search: search.map(str::to_string),
        }
    }
}

/// Source of SCIM property mappings.
#[async_trait]
pub trait MappingCatalog: Send + Sync {
    async fn list_scim_mappings(&self, query: &MappingQuery) -> ApiResult<Page<ScimMapping>>;
}

/// Source of groups for provider user filtering.
#[async_trait]
pub trait GroupCatalog: Send + Sync {
    async fn list_groups(&self, query: &GroupQuery) -> ApiResult<Page<Group>>;
}

#[async_trait]
impl<T: MappingCatalog + ?Sized> MappingCatalog for std::sync::Arc<T> {
    async fn list_scim_mappings(&self, query: &MappingQuery) -> ApiResult<Page<ScimMapping>> {
        (**self).list_scim_mappings(query).await
    }
}

#[async_trait]
impl<T: GroupCatalog + ?Sized> GroupCatalog for std::sync::Arc<T> {
    async fn list_groups(&self, query: &GroupQuery) -> ApiResult<Page<Group>> {
        (**self).list_groups(query).await
    }
}
