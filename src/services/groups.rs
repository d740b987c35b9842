//! Group lookup for the provider's user filter.

use crate::{
    api::{ApiResult, GroupCatalog, GroupQuery},
    models::Group,
};

/// Searches groups by name for the "only sync users within this group" field.
#[derive(Debug, Clone)]
pub struct GroupLookup<C> {
    catalog: C,
}

impl<C: GroupCatalog> GroupLookup<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    /// Groups ordered by name, without member lists.
    ///
    /// `None` lists every group; `Some` filters by the query as typed.
    pub async fn search(&self, query: Option<&str>) -> ApiResult<Vec<Group>> {
        let page = self.catalog.list_groups(&GroupQuery::by_name(query)).await?;
        Ok(page.results)
    }
}

/// Whether `group` is the provider's current filter group.
pub fn is_filter_group(group: &Group, filter_group: Option<&str>) -> bool {
    filter_group == Some(group.pk.as_str())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::models::{Page, Pagination};

    #[derive(Default)]
    struct RecordingCatalog {
        queries: Mutex<Vec<GroupQuery>>,
    }

    #[async_trait]
    impl GroupCatalog for RecordingCatalog {
        async fn list_groups(&self, query: &GroupQuery) -> ApiResult<Page<Group>> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(Page::new(
                vec![group("g-1", "admins"), group("g-2", "staff")],
                Pagination::default(),
            ))
        }
    }

    fn group(pk: &str, name: &str) -> Group {
        Group {
            pk: pk.to_string(),
            name: name.to_string(),
            is_superuser: false,
            parent_name: None,
        }
    }

    #[tokio::test]
    async fn test_search_without_query() {
        let lookup = GroupLookup::new(RecordingCatalog::default());
        let groups = lookup.search(None).await.unwrap();

        assert_eq!(groups.len(), 2);
        let queries = lookup.catalog.queries.lock().unwrap();
        assert_eq!(queries[0].ordering, "name");
        assert!(!queries[0].include_users);
        assert_eq!(queries[0].search, None);
    }

    #[tokio::test]
    async fn test_search_passes_query_through() {
        let lookup = GroupLookup::new(RecordingCatalog::default());
        lookup.search(Some("adm")).await.unwrap();
        lookup.search(Some("")).await.unwrap();

        let queries = lookup.catalog.queries.lock().unwrap();
        assert_eq!(queries[0].search.as_deref(), Some("adm"));
        assert_eq!(queries[1].search.as_deref(), Some(""));
    }

    #[test]
    fn test_is_filter_group() {
        let admins = group("g-1", "admins");
        assert!(is_filter_group(&admins, Some("g-1")));
        assert!(!is_filter_group(&admins, Some("g-2")));
        assert!(!is_filter_group(&admins, None));
    }
}
