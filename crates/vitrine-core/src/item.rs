use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Hard cap on images per catalog item, enforced before any upload starts.
pub const MAX_IMAGES_PER_ITEM: usize = 10;

/// Advisory per-file size limit stated in the admin UI. Not hard-enforced.
pub const ADVISORY_MAX_FILE_BYTES: u64 = 5 * 1024 * 1024;

/// A catalog item as stored by the hosted backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Price in the smallest currency unit (centavos). Integer to avoid
    /// float rounding.
    pub price_cents: i64,
    /// Legacy primary-image storage key. Mirrors `image_paths[0]` on write;
    /// kept readable for rows predating multi-image support.
    #[serde(default)]
    pub image_path: String,
    /// Ordered storage keys, at most [`MAX_IMAGES_PER_ITEM`] entries.
    #[serde(default)]
    pub image_paths: Vec<String>,
    /// Per-item WhatsApp message override.
    pub whatsapp_message: Option<String>,
    pub published: bool,
    /// Display order, ascending. Not required to be unique.
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Storage keys to display, resolving the legacy single-image field:
    /// `image_paths` when non-empty, otherwise the legacy `image_path` as a
    /// one-element list, otherwise empty.
    #[must_use]
    pub fn effective_image_paths(&self) -> Vec<String> {
        if !self.image_paths.is_empty() {
            self.image_paths.clone()
        } else if self.image_path.is_empty() {
            Vec::new()
        } else {
            vec![self.image_path.clone()]
        }
    }

    #[must_use]
    pub fn has_images(&self) -> bool {
        !self.image_paths.is_empty() || !self.image_path.is_empty()
    }
}

/// Write shape for an item, without server-assigned fields.
///
/// Field names match the backend's column names exactly; this struct is
/// serialized as the request body for inserts and updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemPayload {
    pub title: String,
    pub description: String,
    pub price_cents: i64,
    pub image_path: String,
    pub image_paths: Vec<String>,
    pub whatsapp_message: Option<String>,
    pub published: bool,
    pub position: i32,
}

impl ItemPayload {
    /// Sets the image list, mirroring the first entry into the legacy
    /// `image_path` column (empty string when there are no images).
    #[must_use]
    pub fn with_image_paths(mut self, paths: Vec<String>) -> Self {
        self.image_path = paths.first().cloned().unwrap_or_default();
        self.image_paths = paths;
        self
    }
}

/// The site-wide settings singleton. Exactly one row exists; the backend
/// enforces that, not this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub id: Uuid,
    /// Raw contact number as entered by the admin; normalized to digits
    /// only at link-building time.
    pub whatsapp_number: String,
    /// Default contact text used when an item has no override.
    pub whatsapp_message: String,
    pub updated_at: DateTime<Utc>,
}

/// An [`Item`] with its storage keys resolved to public URLs and the
/// settings contact fields merged in for public display.
///
/// Derived fresh on every fetch and never stored, so there is no cache to
/// invalidate.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedItem {
    #[serde(flatten)]
    pub item: Item,
    /// One publicly resolvable URL per effective image path, order-preserving.
    pub image_urls: Vec<String>,
    /// Contact number from [`Settings`].
    pub whatsapp_number: String,
    /// Default contact text from [`Settings`].
    pub default_whatsapp_message: String,
}

impl ResolvedItem {
    /// Resolves an item's storage keys through `url_for` and merges the
    /// settings contact fields. `settings` may be absent when the settings
    /// read degraded; contact fields are then empty and links are dead,
    /// which is the accepted behavior for unconfigured sites.
    pub fn resolve<F>(item: Item, settings: Option<&Settings>, url_for: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        let image_urls = item
            .effective_image_paths()
            .iter()
            .map(|path| url_for(path))
            .collect();
        Self {
            image_urls,
            whatsapp_number: settings.map(|s| s.whatsapp_number.clone()).unwrap_or_default(),
            default_whatsapp_message: settings
                .map(|s| s.whatsapp_message.clone())
                .unwrap_or_default(),
            item,
        }
    }

    #[must_use]
    pub fn primary_image_url(&self) -> Option<&str> {
        self.image_urls.first().map(String::as_str)
    }

    #[must_use]
    pub fn image_count(&self) -> usize {
        self.image_urls.len()
    }

    /// Per-item contact message, empty when the item carries no override.
    #[must_use]
    pub fn item_message(&self) -> &str {
        self.item.whatsapp_message.as_deref().unwrap_or("")
    }
}

/// Client-side validation failures, raised before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Preencha todos os campos obrigatórios")]
    MissingRequiredField,
    #[error("Máximo de {MAX_IMAGES_PER_ITEM} imagens por item")]
    TooManyImages { count: usize },
    #[error("Arquivo não é uma imagem: {0}")]
    NotAnImage(String),
}

/// Checks the required item fields. `price_cents` is `None` when the form
/// field was empty or unparseable.
///
/// # Errors
///
/// Returns [`ValidationError::MissingRequiredField`] when any of title,
/// description, or price is missing.
pub fn validate_required_fields(
    title: &str,
    description: &str,
    price_cents: Option<i64>,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() || description.trim().is_empty() || price_cents.is_none() {
        return Err(ValidationError::MissingRequiredField);
    }
    Ok(())
}

/// Checks the total image count (already-persisted plus newly staged)
/// against [`MAX_IMAGES_PER_ITEM`].
///
/// # Errors
///
/// Returns [`ValidationError::TooManyImages`] when the combined count
/// exceeds the cap.
pub fn validate_image_count(existing: usize, staged: usize) -> Result<(), ValidationError> {
    let count = existing + staged;
    if count > MAX_IMAGES_PER_ITEM {
        return Err(ValidationError::TooManyImages { count });
    }
    Ok(())
}

/// Checks a staged file's MIME type. Only `image/*` is accepted.
///
/// # Errors
///
/// Returns [`ValidationError::NotAnImage`] for any other content type.
pub fn validate_image_mime(file_name: &str, content_type: &str) -> Result<(), ValidationError> {
    if content_type.starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::NotAnImage(file_name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(image_path: &str, image_paths: Vec<&str>) -> Item {
        Item {
            id: Uuid::new_v4(),
            title: "Faca chef 8\"".to_string(),
            description: "Aço carbono, cabo de ipê".to_string(),
            price_cents: 35_000,
            image_path: image_path.to_string(),
            image_paths: image_paths.into_iter().map(String::from).collect(),
            whatsapp_message: None,
            published: true,
            position: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_settings() -> Settings {
        Settings {
            id: Uuid::new_v4(),
            whatsapp_number: "+55 41 99999-9999".to_string(),
            whatsapp_message: "nesta faca artesanal".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn effective_image_paths_prefers_multi_image_field() {
        let item = make_item("legacy.jpg", vec!["a.jpg", "b.jpg"]);
        assert_eq!(item.effective_image_paths(), vec!["a.jpg", "b.jpg"]);
    }

    #[test]
    fn effective_image_paths_falls_back_to_legacy_field() {
        let item = make_item("legacy.jpg", vec![]);
        assert_eq!(item.effective_image_paths(), vec!["legacy.jpg"]);
    }

    #[test]
    fn effective_image_paths_empty_when_both_fields_empty() {
        let item = make_item("", vec![]);
        assert!(item.effective_image_paths().is_empty());
        assert!(!item.has_images());
    }

    #[test]
    fn resolve_with_no_images_yields_no_urls() {
        let item = make_item("", vec![]);
        let resolved = ResolvedItem::resolve(item, Some(&make_settings()), |path| {
            format!("https://cdn.example.com/{path}")
        });
        assert!(resolved.image_urls.is_empty());
        assert!(resolved.primary_image_url().is_none());
    }

    #[test]
    fn resolve_preserves_image_order() {
        let item = make_item("", vec!["first.jpg", "second.jpg", "third.jpg"]);
        let resolved = ResolvedItem::resolve(item, Some(&make_settings()), |path| {
            format!("https://cdn.example.com/{path}")
        });
        assert_eq!(
            resolved.image_urls,
            vec![
                "https://cdn.example.com/first.jpg",
                "https://cdn.example.com/second.jpg",
                "https://cdn.example.com/third.jpg",
            ]
        );
        assert_eq!(resolved.image_count(), 3);
    }

    #[test]
    fn resolve_without_settings_leaves_contact_fields_empty() {
        let item = make_item("a.jpg", vec![]);
        let resolved = ResolvedItem::resolve(item, None, |p| p.to_string());
        assert_eq!(resolved.whatsapp_number, "");
        assert_eq!(resolved.default_whatsapp_message, "");
    }

    #[test]
    fn item_message_defaults_to_empty() {
        let item = make_item("a.jpg", vec![]);
        let resolved = ResolvedItem::resolve(item, Some(&make_settings()), |p| p.to_string());
        assert_eq!(resolved.item_message(), "");
    }

    #[test]
    fn with_image_paths_mirrors_legacy_field() {
        let payload = ItemPayload {
            title: "t".to_string(),
            description: "d".to_string(),
            price_cents: 100,
            image_path: String::new(),
            image_paths: vec![],
            whatsapp_message: None,
            published: true,
            position: 0,
        };
        let payload = payload.with_image_paths(vec!["x.jpg".to_string(), "y.jpg".to_string()]);
        assert_eq!(payload.image_path, "x.jpg");
        assert_eq!(payload.image_paths.len(), 2);

        let payload = payload.with_image_paths(vec![]);
        assert_eq!(payload.image_path, "");
    }

    #[test]
    fn validate_required_fields_rejects_blank_title() {
        let result = validate_required_fields("  ", "desc", Some(100));
        assert_eq!(result, Err(ValidationError::MissingRequiredField));
    }

    #[test]
    fn validate_required_fields_rejects_missing_price() {
        let result = validate_required_fields("title", "desc", None);
        assert_eq!(result, Err(ValidationError::MissingRequiredField));
    }

    #[test]
    fn validate_required_fields_accepts_complete_input() {
        assert!(validate_required_fields("title", "desc", Some(0)).is_ok());
    }

    #[test]
    fn validate_image_count_allows_exactly_ten() {
        assert!(validate_image_count(7, 3).is_ok());
    }

    #[test]
    fn validate_image_count_rejects_eleven() {
        assert_eq!(
            validate_image_count(7, 4),
            Err(ValidationError::TooManyImages { count: 11 })
        );
    }

    #[test]
    fn validate_image_mime_accepts_image_types() {
        assert!(validate_image_mime("a.png", "image/png").is_ok());
        assert!(validate_image_mime("a.webp", "image/webp").is_ok());
    }

    #[test]
    fn validate_image_mime_rejects_other_types() {
        assert_eq!(
            validate_image_mime("a.pdf", "application/pdf"),
            Err(ValidationError::NotAnImage("a.pdf".to_string()))
        );
    }

    #[test]
    fn item_serde_uses_backend_column_names() {
        let item = make_item("legacy.jpg", vec!["a.jpg"]);
        let json = serde_json::to_value(&item).expect("serialize");
        assert!(json.get("price_cents").is_some());
        assert!(json.get("image_paths").is_some());
        assert!(json.get("whatsapp_message").is_some());
    }

    #[test]
    fn item_deserializes_row_without_image_paths() {
        // Rows created before multi-image support have no image_paths column.
        let json = serde_json::json!({
            "id": "7f2c1c9e-63a4-4f0e-9a3a-1c2d3e4f5a6b",
            "title": "Faca",
            "description": "desc",
            "price_cents": 5000,
            "image_path": "old.jpg",
            "whatsapp_message": null,
            "published": true,
            "position": 0,
            "created_at": "2024-05-01T12:00:00Z",
            "updated_at": "2024-05-01T12:00:00Z"
        });
        let item: Item = serde_json::from_value(json).expect("deserialize");
        assert!(item.image_paths.is_empty());
        assert_eq!(item.effective_image_paths(), vec!["old.jpg"]);
    }
}
