//! Data contract of the dual-list selector.
//!
//! The selector shows an "available" pane fed page by page from a
//! [`DualSelectProvider`], and marks entries as pre-selected with a
//! [`SelectionPredicate`] built once per field.

mod pane;

use std::collections::HashSet;

use async_trait::async_trait;
pub use pane::*;
use serde::Serialize;

use crate::{
    api::ApiResult,
    models::{MappingSelection, Pagination, ScimMapping},
};

/// One row of the dual-list selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DualSelectEntry<T> {
    /// Unique id within the catalog
    pub id: String,
    /// Label shown to the user
    pub display_label: String,
    /// Text the selector's local filter matches against
    pub search_label: String,
    /// Full catalog record. `None` for entries restored from a saved id list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record: Option<T>,
}

impl<T> DualSelectEntry<T> {
    pub fn new(id: impl Into<String>, label: impl Into<String>, record: Option<T>) -> Self {
        let label = label.into();
        Self {
            id: id.into(),
            search_label: label.clone(),
            display_label: label,
            record,
        }
    }
}

impl From<ScimMapping> for DualSelectEntry<ScimMapping> {
    fn from(mapping: ScimMapping) -> Self {
        DualSelectEntry::new(mapping.pk.clone(), mapping.name.clone(), Some(mapping))
    }
}

/// A page of selector entries with the remote pagination passed through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DualSelectPage<T> {
    pub entries: Vec<DualSelectEntry<T>>,
    pub pagination: Pagination,
}

/// Supplies the "available" pane, one page per call.
///
/// Calls for different `(page, search)` pairs may overlap; ordering of the
/// responses is not guaranteed.
#[async_trait]
pub trait DualSelectProvider: Send + Sync {
    type Record: Send;

    async fn fetch(&self, page: u32, search: &str) -> ApiResult<DualSelectPage<Self::Record>>;
}

/// Decides whether a catalog entry starts out selected.
///
/// Pure: the answer depends only on the entry, never on call order or page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionPredicate {
    /// The draft carries an explicit id list; membership decides.
    Explicit(HashSet<String>),
    /// No selection was ever made; the managed default with this key is selected.
    ManagedDefault(String),
}

impl SelectionPredicate {
    pub fn new(selection: &MappingSelection, managed_default: &str) -> Self {
        match selection.id_set() {
            Some(ids) => Self::Explicit(ids),
            None => Self::ManagedDefault(managed_default.to_string()),
        }
    }

    pub fn is_selected(&self, entry: &DualSelectEntry<ScimMapping>) -> bool {
        match self {
            Self::Explicit(ids) => ids.contains(&entry.id),
            Self::ManagedDefault(key) => entry
                .record
                .as_ref()
                .is_some_and(|mapping| mapping.is_managed_as(key)),
        }
    }

    /// Ids on `page` that start out selected, in page order.
    pub fn selected_ids<'a>(&self, page: &'a DualSelectPage<ScimMapping>) -> Vec<&'a str> {
        page.entries
            .iter()
            .filter(|entry| self.is_selected(entry))
            .map(|entry| entry.id.as_str())
            .collect()
    }

    /// The predicate as a plain closure, for selectors that take `Fn`.
    pub fn as_fn(&self) -> impl Fn(&DualSelectEntry<ScimMapping>) -> bool + '_ {
        move |entry| self.is_selected(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MANAGED_SCIM_USER;

    fn mapping(pk: &str, managed: Option<&str>) -> DualSelectEntry<ScimMapping> {
        ScimMapping {
            pk: pk.to_string(),
            name: format!("mapping {pk}"),
            managed: managed.map(str::to_string),
            expression: String::new(),
            component: String::new(),
        }
        .into()
    }

    #[test]
    fn test_entry_from_mapping_uses_name_for_both_labels() {
        let entry = mapping("a", None);
        assert_eq!(entry.id, "a");
        assert_eq!(entry.display_label, "mapping a");
        assert_eq!(entry.search_label, "mapping a");
        assert_eq!(entry.record.as_ref().map(|m| m.pk.as_str()), Some("a"));
    }

    #[test]
    fn test_missing_record_is_not_selected() {
        let predicate = SelectionPredicate::ManagedDefault(MANAGED_SCIM_USER.to_string());
        let entry: DualSelectEntry<ScimMapping> = DualSelectEntry::new("b", "Default", None);
        assert!(!predicate.is_selected(&entry));
    }

    #[test]
    fn test_explicit_does_not_need_record() {
        let predicate = SelectionPredicate::new(&MappingSelection::explicit(["b"]), MANAGED_SCIM_USER);
        let entry: DualSelectEntry<ScimMapping> = DualSelectEntry::new("b", "Default", None);
        assert!(predicate.is_selected(&entry));
    }

    #[test]
    fn test_selected_ids_keeps_page_order() {
        let page = DualSelectPage {
            entries: vec![
                mapping("c", None),
                mapping("a", Some(MANAGED_SCIM_USER)),
                mapping("b", None),
            ],
            pagination: Pagination::default(),
        };
        let predicate = SelectionPredicate::new(&MappingSelection::explicit(["b", "c"]), MANAGED_SCIM_USER);
        assert_eq!(predicate.selected_ids(&page), vec!["c", "b"]);

        let predicate = SelectionPredicate::new(&MappingSelection::Unset, MANAGED_SCIM_USER);
        assert_eq!(predicate.selected_ids(&page), vec!["a"]);
    }

    #[test]
    fn test_as_fn() {
        let predicate = SelectionPredicate::new(&MappingSelection::explicit(["a"]), MANAGED_SCIM_USER);
        let select = predicate.as_fn();
        assert!(select(&mapping("a", None)));
        assert!(!select(&mapping("z", Some(MANAGED_SCIM_USER))));
    }
}
