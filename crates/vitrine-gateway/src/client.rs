//! HTTP client for the hosted backend's rows and storage APIs.
//!
//! Wraps `reqwest` with backend-specific error handling, API key headers,
//! and typed response deserialization. Row filters and ordering are
//! expressed as query parameters (`published=eq.true`, `order=position.asc`)
//! the way the backend's REST layer expects them.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use uuid::Uuid;

use vitrine_core::item::{Item, ItemPayload, Settings};
use vitrine_core::AppConfig;

use crate::error::GatewayError;
use crate::SettingsPayload;

/// Client for the hosted backend's REST surface.
///
/// Manages the HTTP client, API key, base URL, and the storage bucket for
/// item images. Use [`RestCatalog::new`] in production or
/// [`RestCatalog::with_base_url`] to point at a mock server in tests.
pub struct RestCatalog {
    client: Client,
    base_url: Url,
    bucket: String,
}

impl RestCatalog {
    /// Creates a client from the application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::Api`] for an invalid base
    /// URL.
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        Self::with_base_url(
            &config.backend_api_key,
            config.gateway_timeout_secs,
            &config.backend_url,
            &config.storage_bucket,
        )
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`GatewayError::Api`] if `base_url` is not
    /// a valid URL or `api_key` is not a valid header value.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
        bucket: &str,
    ) -> Result<Self, GatewayError> {
        // The backend expects the key both as `apikey` and as a bearer token.
        let mut headers = HeaderMap::new();
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|e| GatewayError::Api(format!("invalid API key header value: {e}")))?;
        key_value.set_sensitive(true);
        headers.insert("apikey", key_value);
        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|e| GatewayError::Api(format!("invalid API key header value: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vitrine/0.1 (catalog)")
            .default_headers(headers)
            .build()?;

        // Normalise: ensure the base URL ends with exactly one slash so that
        // join() appends path segments instead of replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GatewayError::Api(format!("invalid base URL '{base_url}': {e}")))?;

        Ok(Self {
            client,
            base_url,
            bucket: bucket.to_owned(),
        })
    }

    /// All items ordered by `position` ascending, for the admin surface.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Api`] if the backend returns an error status.
    /// - [`GatewayError::Http`] on network failure.
    /// - [`GatewayError::Deserialize`] if the rows do not match the expected
    ///   shape.
    pub async fn list_items(&self) -> Result<Vec<Item>, GatewayError> {
        let url = self.rows_url("items", &[("select", "*"), ("order", "position.asc")]);
        self.fetch_rows(url, "list_items").await
    }

    /// Published items only, ordered by `position` ascending, for the
    /// public carousel.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`RestCatalog::list_items`].
    pub async fn list_published_items(&self) -> Result<Vec<Item>, GatewayError> {
        let url = self.rows_url(
            "items",
            &[
                ("select", "*"),
                ("published", "eq.true"),
                ("order", "position.asc"),
            ],
        );
        self.fetch_rows(url, "list_published_items").await
    }

    /// The settings singleton.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] when the row is missing; the backend is
    /// responsible for there being exactly one.
    pub async fn get_settings(&self) -> Result<Settings, GatewayError> {
        let url = self.rows_url("settings", &[("select", "*"), ("limit", "1")]);
        let rows: Vec<Settings> = self.fetch_rows(url, "get_settings").await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Api("settings singleton row is missing".to_string()))
    }

    /// Inserts a new item and returns the stored row.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`RestCatalog::list_items`].
    pub async fn insert_item(&self, payload: &ItemPayload) -> Result<Item, GatewayError> {
        let url = self.rows_url("items", &[]);
        let response = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?;
        let rows: Vec<Item> = Self::read_rows(response, "insert_item").await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Api("insert returned no row".to_string()))
    }

    /// Updates an existing item and returns the stored row.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] when no row matches `id`; otherwise the same
    /// taxonomy as [`RestCatalog::list_items`].
    pub async fn update_item(&self, id: Uuid, payload: &ItemPayload) -> Result<Item, GatewayError> {
        let url = self.rows_url("items", &[("id", &format!("eq.{id}"))]);
        let response = self
            .client
            .request(Method::PATCH, url)
            .header("Prefer", "return=representation")
            .json(payload)
            .send()
            .await?;
        let rows: Vec<Item> = Self::read_rows(response, "update_item").await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::Api(format!("no item with id {id}")))
    }

    /// Deletes an item. Deleting an already-absent row is not an error at
    /// the backend, and is not treated as one here.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] / [`GatewayError::Http`] on backend or network
    /// failure.
    pub async fn delete_item(&self, id: Uuid) -> Result<(), GatewayError> {
        let url = self.rows_url("items", &[("id", &format!("eq.{id}"))]);
        let response = self.client.request(Method::DELETE, url).send().await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Sets the `published` flag on an item.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] / [`GatewayError::Http`] on backend or network
    /// failure.
    pub async fn set_published(&self, id: Uuid, published: bool) -> Result<(), GatewayError> {
        let url = self.rows_url("items", &[("id", &format!("eq.{id}"))]);
        let response = self
            .client
            .request(Method::PATCH, url)
            .json(&serde_json::json!({ "published": published }))
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Writes the settings singleton with a merge-duplicates upsert, so the
    /// same row id is overwritten rather than duplicated.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] / [`GatewayError::Http`] on backend or network
    /// failure.
    pub async fn upsert_settings(&self, payload: &SettingsPayload) -> Result<(), GatewayError> {
        let url = self.rows_url("settings", &[]);
        let response = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "resolution=merge-duplicates")
            .json(payload)
            .send()
            .await?;
        Self::check_status(response).await.map(|_| ())
    }

    /// Uploads an image into the items bucket under `key` and returns the
    /// key. Objects are immutable: `x-upsert` is off and a one-hour cache
    /// header is set, matching how the public URLs are served.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Api`] / [`GatewayError::Http`] on backend or network
    /// failure.
    pub async fn upload_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        let url = self.storage_url(&["object", &self.bucket, key]);
        let response = self
            .client
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(key.to_owned())
    }

    /// Publicly resolvable URL for a stored object. Pure URL arithmetic;
    /// no request is made and missing objects simply 404 when fetched.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        self.storage_url(&["object", "public", &self.bucket, path])
            .to_string()
    }

    /// Builds a rows-API URL for `table` with the given query parameters.
    fn rows_url(&self, table: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self
            .base_url
            .join(&format!("rest/v1/{table}"))
            .expect("base URL validated at construction");
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Builds a storage-API URL from path segments. Segments that contain
    /// slashes (object keys like `items/<uuid>-name.jpg`) keep them as path
    /// separators, matching the backend's routing.
    fn storage_url(&self, segments: &[&str]) -> Url {
        let path = segments.join("/");
        self.base_url
            .join(&format!("storage/v1/{path}"))
            .expect("base URL validated at construction")
    }

    async fn fetch_rows<T>(&self, url: Url, context: &str) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self.client.get(url).send().await?;
        Self::read_rows(response, context).await
    }

    async fn read_rows<T>(response: reqwest::Response, context: &str) -> Result<T, GatewayError>
    where
        T: serde::de::DeserializeOwned,
    {
        let body = Self::check_status(response).await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Deserialize {
            context: context.to_string(),
            source: e,
        })
    }

    /// Reads the body, surfacing non-success statuses as [`GatewayError::Api`]
    /// with the backend's own `message` field when the body carries one.
    async fn check_status(response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();
        let body = response.text().await?;
        if status.is_success() {
            return Ok(body);
        }
        Err(GatewayError::Api(Self::api_message(status, &body)))
    }

    fn api_message(status: StatusCode, body: &str) -> String {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(serde_json::Value::as_str)
                    .map(String::from)
            })
            .unwrap_or_else(|| body.trim().to_string());
        format!("{status}: {detail}")
    }
}
