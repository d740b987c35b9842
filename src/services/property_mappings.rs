//! SCIM property mapping selection for the provider form.
//!
//! Two pieces back each mapping field's dual-list selector:
//! - [`ScimMappingsProvider`] pages through the `provider-scim` mapping catalog
//! - [`make_mappings_selector`] decides which catalog entries start selected

use async_trait::async_trait;

use crate::{
    api::{ApiResult, MappingCatalog, MappingQuery},
    dual_select::{DualSelectEntry, DualSelectPage, DualSelectProvider, SelectionPredicate},
    models::{MappingKind, MappingSelection, ProviderDraft, ScimMapping},
};

/// Page size used for every mapping catalog request.
pub const MAPPINGS_PAGE_SIZE: u32 = 20;

/// Catalog ordering: managed defaults sort deterministically against custom mappings.
pub const MAPPINGS_ORDERING: &str = "managed";

/// Pages through SCIM property mappings for the dual-list selector.
///
/// Holds no state besides the injected catalog, so concurrent fetches for
/// different pages or search terms are independent.
#[derive(Debug, Clone)]
pub struct ScimMappingsProvider<C> {
    catalog: C,
}

impl<C: MappingCatalog> ScimMappingsProvider<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Build the catalog query for `(page, search)`.
    ///
    /// Page 0 is treated as page 1; surrounding whitespace is trimmed from the
    /// search and an empty result means no filter.
    pub fn query(page: u32, search: &str) -> MappingQuery {
        let search = search.trim();
        MappingQuery {
            ordering: MAPPINGS_ORDERING.to_string(),
            page: page.max(1),
            page_size: MAPPINGS_PAGE_SIZE,
            search: (!search.is_empty()).then(|| search.to_string()),
        }
    }

    /// Fetch one page of mappings as selector entries.
    ///
    /// Results keep the catalog's order; catalog errors are returned as-is.
    pub async fn fetch(&self, page: u32, search: &str) -> ApiResult<DualSelectPage<ScimMapping>> {
        let query = Self::query(page, search);
        tracing::debug!(
            page = query.page,
            search = ?query.search,
            "Fetching SCIM property mappings"
        );

        let page = self.catalog.list_scim_mappings(&query).await?;

        Ok(DualSelectPage {
            entries: page.results.into_iter().map(DualSelectEntry::from).collect(),
            pagination: page.pagination,
        })
    }
}

#[async_trait]
impl<C: MappingCatalog> DualSelectProvider for ScimMappingsProvider<C> {
    type Record = ScimMapping;

    async fn fetch(&self, page: u32, search: &str) -> ApiResult<DualSelectPage<ScimMapping>> {
        ScimMappingsProvider::fetch(self, page, search).await
    }
}

/// Build the pre-selection predicate for one mapping field.
///
/// With an explicit selection (even an empty one) exactly the listed ids are
/// selected. Without one, the mapping whose managed key equals
/// `managed_default` is selected, so new providers start with the defaults.
pub fn make_mappings_selector(
    selection: &MappingSelection,
    managed_default: &str,
) -> SelectionPredicate {
    SelectionPredicate::new(selection, managed_default)
}

/// Predicate for `kind` on `draft`; `None` is a provider that does not exist yet.
pub fn selector_for(draft: Option<&ProviderDraft>, kind: MappingKind) -> SelectionPredicate {
    match draft {
        Some(draft) => make_mappings_selector(draft.selection(kind), kind.managed_default()),
        None => make_mappings_selector(&MappingSelection::Unset, kind.managed_default()),
    }
}
