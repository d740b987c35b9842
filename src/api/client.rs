//! HTTP client for the identity provider's admin API.
//!
//! Authenticates with a bearer token and talks to the v3 REST endpoints that
//! back the SCIM provider form.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use url::Url;

use super::{ApiError, ApiResult, GroupCatalog, GroupQuery, MappingCatalog, MappingQuery};
use crate::{
    config::ApiConfig,
    models::{Group, Page, ScimMapping},
};

const SCIM_MAPPINGS_PATH: &str = "api/v3/propertymappings/provider/scim/";
const GROUPS_PATH: &str = "api/v3/core/groups/";

/// Client for the admin REST API.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Example
/// ```ignore
/// let client = ApiClient::new(&config.api)?;
/// let page = client
///     .list_scim_mappings(&MappingQuery {
///         ordering: "managed".into(),
///         page: 1,
///         page_size: 20,
///         search: None,
///     })
///     .await?;
/// ```
#[derive(Clone)]
pub struct ApiClient {
    http_client: Client,
    base_url: Url,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Build a client from configuration.
    ///
    /// The bearer token is attached to every request as a sensitive header.
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.token))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let builder = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers);

        #[cfg(feature = "native-http")]
        let builder = builder.danger_accept_invalid_certs(!config.verify_tls);
        #[cfg(not(feature = "native-http"))]
        if !config.verify_tls {
            tracing::warn!(
                "api.verify_tls = false has no effect without the 'native-http' feature"
            );
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: normalize_base_url(&config.base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_page<T, Q>(&self, path: &str, query: &Q) -> ApiResult<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;

        let response = self.http_client.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(%status, path, "Admin API request failed");
            return Err(ApiError::Status { status, body });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MappingCatalog for ApiClient {
    #[tracing::instrument(
        skip(self, query),
        fields(page = query.page, page_size = query.page_size, search = ?query.search)
    )]
    async fn list_scim_mappings(&self, query: &MappingQuery) -> ApiResult<Page<ScimMapping>> {
        self.get_page(SCIM_MAPPINGS_PATH, query).await
    }
}

#[async_trait]
impl GroupCatalog for ApiClient {
    #[tracing::instrument(skip(self, query), fields(search = ?query.search))]
    async fn list_groups(&self, query: &GroupQuery) -> ApiResult<Page<Group>> {
        self.get_page(GROUPS_PATH, query).await
    }
}

/// Parse the base URL and make sure relative joins append to its path.
fn normalize_base_url(raw: &str) -> ApiResult<Url> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param, query_param_is_missing},
    };

    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            token: "test-token".to_string(),
            ..Default::default()
        }
    }

    fn mapping_query(search: Option<&str>) -> MappingQuery {
        MappingQuery {
            ordering: "managed".to_string(),
            page: 1,
            page_size: 20,
            search: search.map(str::to_string),
        }
    }

    fn mappings_body() -> serde_json::Value {
        serde_json::json!({
            "pagination": {
                "next": 0, "previous": 0, "count": 2, "current": 1,
                "total_pages": 1, "start_index": 1, "end_index": 2
            },
            "results": [
                {"pk": "a", "name": "Custom", "managed": null, "expression": "return {}"},
                {"pk": "b", "name": "Default User", "managed": "goauthentik.io/providers/scim/user"}
            ]
        })
    }

    #[test]
    fn test_base_url_normalization() {
        let client = ApiClient::new(&config("https://idp.example.com")).unwrap();
        assert_eq!(client.base_url().as_str(), "https://idp.example.com/");

        let client = ApiClient::new(&config("https://idp.example.com/prefix")).unwrap();
        assert_eq!(client.base_url().as_str(), "https://idp.example.com/prefix/");
        assert_eq!(
            client.base_url().join(SCIM_MAPPINGS_PATH).unwrap().as_str(),
            "https://idp.example.com/prefix/api/v3/propertymappings/provider/scim/"
        );
    }

    #[test]
    fn test_token_with_control_characters() {
        let config = ApiConfig {
            token: "abc\ndef".to_string(),
            ..config("https://idp.example.com")
        };
        let err = ApiClient::new(&config).unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
        assert!(err.status().is_none());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = ApiClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_list_scim_mappings_sends_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/propertymappings/provider/scim/"))
            .and(header("authorization", "Bearer test-token"))
            .and(query_param("ordering", "managed"))
            .and(query_param("page", "1"))
            .and(query_param("page_size", "20"))
            .and(query_param("search", "user"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mappings_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&config(&mock_server.uri())).unwrap();
        let page = client
            .list_scim_mappings(&mapping_query(Some("user")))
            .await
            .unwrap();

        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].pk, "a");
        assert_eq!(page.results[0].expression, "return {}");
        assert_eq!(
            page.results[1].managed.as_deref(),
            Some("goauthentik.io/providers/scim/user")
        );
        assert_eq!(page.pagination.item_count(), 2);
    }

    #[tokio::test]
    async fn test_list_scim_mappings_omits_empty_search() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/propertymappings/provider/scim/"))
            .and(query_param_is_missing("search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(mappings_body()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&config(&mock_server.uri())).unwrap();
        client.list_scim_mappings(&mapping_query(None)).await.unwrap();
    }

    #[tokio::test]
    async fn test_list_groups_sends_query() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/core/groups/"))
            .and(query_param("ordering", "name"))
            .and(query_param("include_users", "false"))
            .and(query_param("search", "admins"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "pagination": {"count": 1, "current": 1, "total_pages": 1},
                "results": [{"pk": "g-1", "name": "admins", "is_superuser": true, "users": []}]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&config(&mock_server.uri())).unwrap();
        let page = client
            .list_groups(&GroupQuery::by_name(Some("admins")))
            .await
            .unwrap();

        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name, "admins");
        assert!(page.results[0].is_superuser);
    }

    #[tokio::test]
    async fn test_auth_failure_surfaces_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_string(r#"{"detail": "Token invalid/expired"}"#),
            )
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&config(&mock_server.uri())).unwrap();
        let err = client
            .list_scim_mappings(&mapping_query(None))
            .await
            .unwrap_err();

        assert!(err.is_auth());
        assert_eq!(err.status(), Some(reqwest::StatusCode::FORBIDDEN));
        assert!(err.to_string().contains("Token invalid/expired"));
    }

    #[tokio::test]
    async fn test_server_error_is_not_auth() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&config(&mock_server.uri())).unwrap();
        let err = client.list_groups(&GroupQuery::by_name(None)).await.unwrap_err();

        assert!(!err.is_auth());
        assert_eq!(
            err.status(),
            Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR)
        );
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&config(&mock_server.uri())).unwrap();
        let err = client
            .list_scim_mappings(&mapping_query(None))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
