//! Public surface: the carousel page and the gallery fragment.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use maud::Markup;
use futures::stream::{self, StreamExt};
use serde::Deserialize;
use uuid::Uuid;

use vitrine_core::gallery::GalleryState;
use vitrine_core::item::{ResolvedItem, Settings};
use vitrine_core::Orientation;
use vitrine_gateway::resolve_items;

use super::AppState;
use crate::pages;

/// Concurrency for probing card images on the public page.
const CARD_PROBE_CONCURRENCY: usize = 8;

/// `GET /` — the public carousel.
///
/// Both reads degrade independently: a failed settings read renders dead
/// contact links, a failed items read renders the empty state. Neither is
/// surfaced to the visitor.
pub(super) async fn catalog_page(State(state): State<AppState>) -> Response {
    let settings = fetch_settings(&state).await;
    let items = match state.gateway.list_published_items().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "items read failed; rendering empty catalog");
            Vec::new()
        }
    };

    let resolved = resolve_items(state.gateway.as_ref(), items, settings.as_ref());
    let orientations = probe_card_orientations(&state, &resolved).await;
    render(pages::catalog::catalog_page(&resolved, &orientations))
}

fn render(markup: Markup) -> Response {
    Html(markup.into_string()).into_response()
}

/// Probes each card's primary image for its orientation, order-preserving.
/// A failed probe classifies as `None` and the card uses the default
/// aspect bucket.
async fn probe_card_orientations(
    state: &AppState,
    items: &[ResolvedItem],
) -> Vec<Option<Orientation>> {
    let jobs: Vec<_> = items
        .iter()
        .map(|item| {
            (
                state.prober.clone(),
                item.primary_image_url().map(ToOwned::to_owned),
            )
        })
        .collect();
    stream::iter(jobs.into_iter().map(|(prober, url)| {
        async move {
            let url = url?;
            match prober.probe(&url).await {
                Ok(dims) => Some(dims.orientation()),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "card image probe failed");
                    None
                }
            }
        }
    }))
    .buffered(CARD_PROBE_CONCURRENCY)
    .collect()
    .await
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct GalleryQuery {
    /// Index the client is currently showing. Clamped into range.
    index: Option<usize>,
    /// One of `next`, `prev`, `goto`, `swipe`; absent renders the current
    /// index without a transition.
    action: Option<String>,
    /// Target index for `goto`.
    target: Option<usize>,
    /// Horizontal finger travel in pixels for `swipe` (end minus start).
    swipe_dx: Option<f32>,
    /// Comma-separated indices whose image failed to load on the client.
    /// Once reported, those indices render the placeholder permanently.
    broken: Option<String>,
}

/// `GET /items/{id}/gallery` — the modal gallery fragment.
///
/// Reconstructs the gallery at the client's index, applies at most one
/// transition primitive, and renders the settled state; the client owns
/// the visual fade.
pub(super) async fn gallery_fragment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<GalleryQuery>,
) -> Response {
    let settings = fetch_settings(&state).await;
    let items = match state.gateway.list_published_items().await {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, item_id = %id, "items read failed for gallery");
            Vec::new()
        }
    };

    let Some(item) = items.into_iter().find(|item| item.id == id) else {
        return (
            StatusCode::NOT_FOUND,
            Html(pages::catalog::gallery_not_found().into_string()),
        )
            .into_response();
    };
    let resolved = ResolvedItem::resolve(item, settings.as_ref(), |path| {
        state.gateway.public_url(path)
    });

    let Some(mut gallery) =
        GalleryState::with_active(resolved.image_urls.clone(), query.index.unwrap_or(0))
    else {
        // No images at all: the state machine is never entered.
        return render(pages::catalog::gallery_empty(&resolved));
    };

    if let Some(broken) = &query.broken {
        for index in broken.split(',').filter_map(|raw| raw.trim().parse().ok()) {
            gallery.mark_broken(index);
        }
    }

    let started = match (query.action.as_deref(), query.target, query.swipe_dx) {
        (Some("next"), _, _) => gallery.next(),
        (Some("prev"), _, _) => gallery.prev(),
        (Some("goto"), Some(target), _) => gallery.go_to(target),
        (Some("swipe"), _, Some(delta_x)) => gallery.on_swipe_end(delta_x),
        _ => false,
    };
    if started {
        gallery.finish();
    }

    let orientation = state.classifier.classify(gallery.active_url()).await;
    render(pages::catalog::gallery_fragment(&resolved, &gallery, orientation))
}

async fn fetch_settings(state: &AppState) -> Option<Settings> {
    match state.gateway.get_settings().await {
        Ok(settings) => Some(settings),
        Err(e) => {
            tracing::warn!(error = %e, "settings read failed; rendering without contact data");
            None
        }
    }
}
