//! Admin surface: item CRUD with multi-image upload, publish toggle, and
//! the settings singleton.
//!
//! Every mutation redirects back to `/admin` with a flash query parameter
//! and the page re-fetches everything (the invalidate-and-reload
//! contract). Write failures leave the stored records untouched and are
//! surfaced as a banner; there is no automatic retry.

use axum::{
    extract::{Multipart, Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use futures::future;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use serde::Deserialize;
use uuid::Uuid;

use vitrine_core::item::{
    validate_image_count, validate_image_mime, validate_required_fields, ItemPayload,
};
use vitrine_gateway::{resolve_items, SettingsPayload};

use super::AppState;
use crate::pages;

/// `GET /admin` — the management page. Reads degrade like the public page;
/// the flash banners come from the redirect query parameters.
pub(super) async fn admin_page(
    State(state): State<AppState>,
    Query(flash): Query<Flash>,
) -> Response {
    let settings = match state.gateway.get_settings().await {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(error = %e, "settings read failed on admin page");
            None
        }
    };
    let items = match state.gateway.list_items().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "items read failed on admin page");
            Vec::new()
        }
    };
    let resolved = resolve_items(state.gateway.as_ref(), items, settings.as_ref());
    let markup = pages::admin::admin_page(
        &resolved,
        settings.as_ref(),
        flash.notice.as_deref(),
        flash.error.as_deref(),
    );
    Html(markup.into_string()).into_response()
}

/// `POST /admin/items` — create.
pub(super) async fn create_item(State(state): State<AppState>, multipart: Multipart) -> Response {
    let form = match ItemForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(message) => return redirect_error(&message),
    };
    match save_item(&state, None, form).await {
        Ok(()) => redirect_notice("Item criado!"),
        Err(message) => redirect_error(&message),
    }
}

/// `POST /admin/items/{id}` — update.
pub(super) async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Response {
    let form = match ItemForm::from_multipart(multipart).await {
        Ok(form) => form,
        Err(message) => return redirect_error(&message),
    };
    match save_item(&state, Some(id), form).await {
        Ok(()) => redirect_notice("Item atualizado!"),
        Err(message) => redirect_error(&message),
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TogglePayload {
    /// Current status as rendered; the handler flips it.
    published: bool,
}

/// `POST /admin/items/{id}/publish`.
pub(super) async fn toggle_published(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(payload): Form<TogglePayload>,
) -> Response {
    let now_published = !payload.published;
    match state.gateway.set_published(id, now_published).await {
        Ok(()) => {
            if now_published {
                redirect_notice("Item publicado!")
            } else {
                redirect_notice("Item despublicado!")
            }
        }
        Err(e) => {
            tracing::error!(error = %e, item_id = %id, "publish toggle failed");
            redirect_error("Erro ao alterar status")
        }
    }
}

/// `POST /admin/items/{id}/delete`.
pub(super) async fn delete_item(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.gateway.delete_item(id).await {
        Ok(()) => redirect_notice("Item excluído!"),
        Err(e) => {
            tracing::error!(error = %e, item_id = %id, "item delete failed");
            redirect_error("Erro ao excluir item")
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SettingsForm {
    id: Uuid,
    whatsapp_number: String,
    #[serde(default)]
    whatsapp_message: String,
}

/// `POST /admin/settings` — upsert the singleton.
pub(super) async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Response {
    let payload = SettingsPayload {
        id: form.id,
        whatsapp_number: form.whatsapp_number,
        whatsapp_message: form.whatsapp_message,
    };
    match state.gateway.upsert_settings(&payload).await {
        Ok(()) => redirect_notice("Configurações salvas!"),
        Err(e) => {
            tracing::error!(error = %e, "settings save failed");
            redirect_error("Erro ao salvar configurações")
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct Flash {
    notice: Option<String>,
    error: Option<String>,
}

fn redirect_notice(message: &str) -> Response {
    redirect_with("notice", message)
}

fn redirect_error(message: &str) -> Response {
    redirect_with("error", message)
}

fn redirect_with(kind: &str, message: &str) -> Response {
    let encoded = utf8_percent_encode(message, NON_ALPHANUMERIC);
    Redirect::to(&format!("/admin?{kind}={encoded}")).into_response()
}

/// One staged upload, fully buffered. Nothing is sent to the backend until
/// the whole form has validated.
#[derive(Debug)]
struct StagedFile {
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

#[derive(Debug, Default)]
struct ItemForm {
    title: String,
    description: String,
    price_cents: Option<i64>,
    whatsapp_message: Option<String>,
    position: i32,
    published: bool,
    /// Already-persisted storage keys carried through the edit form.
    existing_paths: Vec<String>,
    files: Vec<StagedFile>,
}

impl ItemForm {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, String> {
        let mut form = Self::default();

        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!(error = %e, "multipart read failed");
                    return Err("Falha ao ler o formulário".to_string());
                }
            };

            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = read_text(field).await?,
                "description" => form.description = read_text(field).await?,
                "price_cents" => {
                    let raw = read_text(field).await?;
                    form.price_cents = raw.trim().parse::<i64>().ok();
                }
                "whatsapp_message" => {
                    let raw = read_text(field).await?;
                    form.whatsapp_message = if raw.trim().is_empty() { None } else { Some(raw) };
                }
                "position" => {
                    let raw = read_text(field).await?;
                    form.position = raw.trim().parse::<i32>().unwrap_or(0);
                }
                "published" => {
                    // Checkbox: present means checked, whatever the value.
                    let _ = read_text(field).await?;
                    form.published = true;
                }
                "existing_path" => form.existing_paths.push(read_text(field).await?),
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    if file_name.is_empty() {
                        // Browsers submit one empty file field when nothing
                        // was selected.
                        continue;
                    }
                    let content_type = field
                        .content_type()
                        .unwrap_or("application/octet-stream")
                        .to_string();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| {
                            tracing::error!(error = %e, file = %file_name, "file read failed");
                            "Falha ao ler o formulário".to_string()
                        })?
                        .to_vec();
                    form.files.push(StagedFile {
                        name: file_name,
                        content_type,
                        bytes,
                    });
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, String> {
    field.text().await.map_err(|e| {
        tracing::error!(error = %e, "multipart field read failed");
        "Falha ao ler o formulário".to_string()
    })
}

/// Validates, uploads, and persists one item save.
///
/// Validation happens before any network call: required fields, per-file
/// MIME types, and the total image count (persisted plus staged). Uploads
/// then run in parallel and fail fast; the first failure aborts the whole
/// save with nothing persisted. Already-settled uploads stay behind in
/// storage, an accepted leak.
async fn save_item(state: &AppState, id: Option<Uuid>, form: ItemForm) -> Result<(), String> {
    validate_required_fields(&form.title, &form.description, form.price_cents)
        .map_err(|e| e.to_string())?;
    for file in &form.files {
        validate_image_mime(&file.name, &file.content_type).map_err(|e| e.to_string())?;
    }
    validate_image_count(form.existing_paths.len(), form.files.len())
        .map_err(|e| e.to_string())?;

    let uploads = form.files.iter().map(|file| {
        let key = format!("items/{}-{}", Uuid::new_v4(), sanitize_file_name(&file.name));
        let gateway = state.gateway.clone();
        let name = file.name.clone();
        let content_type = file.content_type.clone();
        let bytes = file.bytes.clone();
        async move {
            gateway
                .upload_image(&key, bytes, &content_type)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, file = %name, "image upload failed");
                    format!("Erro no upload de {name}: {e}")
                })
        }
    });
    let new_paths = future::try_join_all(uploads).await?;

    let mut image_paths = form.existing_paths;
    image_paths.extend(new_paths);

    let price_cents = form.price_cents.unwrap_or(0);
    let payload = ItemPayload {
        title: form.title,
        description: form.description,
        price_cents,
        image_path: String::new(),
        image_paths: Vec::new(),
        whatsapp_message: form.whatsapp_message,
        published: form.published,
        position: form.position,
    }
    .with_image_paths(image_paths);

    let result = match id {
        Some(id) => state.gateway.update_item(id, &payload).await,
        None => state.gateway.insert_item(&payload).await,
    };
    result.map(|_| ()).map_err(|e| {
        tracing::error!(error = %e, "item save failed");
        "Erro ao salvar item".to_string()
    })
}

/// Keeps storage keys predictable: alphanumerics, dots, dashes, and
/// underscores pass through, everything else becomes a dash.
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_file_name_passes_safe_names_through() {
        assert_eq!(sanitize_file_name("faca_chef-01.jpg"), "faca_chef-01.jpg");
    }

    #[test]
    fn sanitize_file_name_replaces_unsafe_characters() {
        assert_eq!(sanitize_file_name("faca nova (1).jpg"), "faca-nova--1-.jpg");
        assert_eq!(sanitize_file_name("açaí.png"), "a-a-.png");
    }

    #[test]
    fn redirect_flash_percent_encodes_the_message() {
        let response = redirect_error("Erro ao salvar item");
        let location = response
            .headers()
            .get(axum::http::header::LOCATION)
            .expect("location header")
            .to_str()
            .expect("ascii");
        assert_eq!(location, "/admin?error=Erro%20ao%20salvar%20item");
    }
}
