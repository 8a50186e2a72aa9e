//! Typed gateway to the hosted backend that owns persistence, auth, and
//! file storage. Everything here is a remote, fallible service call; the
//! application treats read failures as "no data" and write failures as
//! retryable by the user.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vitrine_core::item::{Item, ItemPayload, ResolvedItem, Settings};

pub mod client;
pub mod error;
pub mod probe;

pub use client::RestCatalog;
pub use error::GatewayError;
pub use probe::{DimensionProber, LatestProbe, OrientationClassifier};

/// Write shape for the settings singleton. Carries the row id so the
/// backend's merge-duplicates upsert overwrites rather than duplicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsPayload {
    pub id: Uuid,
    pub whatsapp_number: String,
    pub whatsapp_message: String,
}

/// The catalog data gateway, as consumed by the pages.
///
/// The server holds an injected `Arc<dyn CatalogGateway>`; production wires
/// in [`RestCatalog`], tests substitute an in-memory fake.
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// All items ordered by position, for the admin surface.
    async fn list_items(&self) -> Result<Vec<Item>, GatewayError>;

    /// Published items ordered by position, for the public carousel.
    async fn list_published_items(&self) -> Result<Vec<Item>, GatewayError>;

    /// The settings singleton.
    async fn get_settings(&self) -> Result<Settings, GatewayError>;

    async fn insert_item(&self, payload: &ItemPayload) -> Result<Item, GatewayError>;

    async fn update_item(&self, id: Uuid, payload: &ItemPayload) -> Result<Item, GatewayError>;

    async fn delete_item(&self, id: Uuid) -> Result<(), GatewayError>;

    async fn set_published(&self, id: Uuid, published: bool) -> Result<(), GatewayError>;

    async fn upsert_settings(&self, payload: &SettingsPayload) -> Result<(), GatewayError>;

    /// Uploads one image into the items bucket; returns the storage key.
    async fn upload_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError>;

    /// Publicly resolvable URL for a stored object. Pure; no request made.
    fn public_url(&self, path: &str) -> String;
}

#[async_trait]
impl CatalogGateway for RestCatalog {
    async fn list_items(&self) -> Result<Vec<Item>, GatewayError> {
        RestCatalog::list_items(self).await
    }

    async fn list_published_items(&self) -> Result<Vec<Item>, GatewayError> {
        RestCatalog::list_published_items(self).await
    }

    async fn get_settings(&self) -> Result<Settings, GatewayError> {
        RestCatalog::get_settings(self).await
    }

    async fn insert_item(&self, payload: &ItemPayload) -> Result<Item, GatewayError> {
        RestCatalog::insert_item(self, payload).await
    }

    async fn update_item(&self, id: Uuid, payload: &ItemPayload) -> Result<Item, GatewayError> {
        RestCatalog::update_item(self, id, payload).await
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), GatewayError> {
        RestCatalog::delete_item(self, id).await
    }

    async fn set_published(&self, id: Uuid, published: bool) -> Result<(), GatewayError> {
        RestCatalog::set_published(self, id, published).await
    }

    async fn upsert_settings(&self, payload: &SettingsPayload) -> Result<(), GatewayError> {
        RestCatalog::upsert_settings(self, payload).await
    }

    async fn upload_image(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        RestCatalog::upload_image(self, key, bytes, content_type).await
    }

    fn public_url(&self, path: &str) -> String {
        RestCatalog::public_url(self, path)
    }
}

/// Resolves items for display: storage keys mapped to public URLs through
/// the gateway, settings contact fields merged in. Derived fresh on every
/// fetch; nothing is cached.
#[must_use]
pub fn resolve_items(
    gateway: &dyn CatalogGateway,
    items: Vec<Item>,
    settings: Option<&Settings>,
) -> Vec<ResolvedItem> {
    items
        .into_iter()
        .map(|item| ResolvedItem::resolve(item, settings, |path| gateway.public_url(path)))
        .collect()
}
