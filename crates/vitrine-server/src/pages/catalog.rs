//! Public catalog page and the item gallery fragment.

use maud::{html, Markup};

use vitrine_core::gallery::GalleryState;
use vitrine_core::item::ResolvedItem;
use vitrine_core::money::format_brl;
use vitrine_core::orientation::{aspect_class, modal_height_class};
use vitrine_core::whatsapp;
use vitrine_core::Orientation;

use super::{image_placeholder, layout};

/// Width estimate for the thumbnail strip viewport, used to precompute the
/// scroll offset the client applies.
const THUMB_STRIP_WIDTH: f32 = 320.0;

/// The public carousel page. `orientations` is index-aligned with `items`
/// (the probed orientation of each primary image, `None` when pending or
/// failed).
pub fn catalog_page(items: &[ResolvedItem], orientations: &[Option<Orientation>]) -> Markup {
    layout(
        "Cutelaria Karvat — Facas Artesanais",
        html! {
            header class="brand" {
                h2 { "Cutelaria Karvat" }
                h1 { "Facas Artesanais" }
                p class="muted" { "Qualidade artesanal, feitas à mão com precisão" }
            }
            @if items.is_empty() {
                div class="placeholder" { "Nenhum item disponível no momento." }
            } @else {
                section class="grid" {
                    @for (index, item) in items.iter().enumerate() {
                        (card(item, orientations.get(index).copied().flatten()))
                    }
                }
            }
            (social_footer())
        },
    )
}

fn card(item: &ResolvedItem, orientation: Option<Orientation>) -> Markup {
    // Per-item contact message variant: fixed greeting plus the item's own
    // message, title never appended.
    let wa = whatsapp::item_link(&item.whatsapp_number, item.item_message());
    html! {
        article class="card" {
            a href=(format!("/items/{}/gallery", item.item.id)) {
                div class={ "media " (aspect_class(orientation)) } {
                    @if let Some(url) = item.primary_image_url() {
                        img src=(url) alt=(item.item.title) loading="lazy";
                        @if item.image_count() > 1 {
                            span class="badge" { (item.image_count()) " fotos" }
                        }
                    } @else {
                        (image_placeholder())
                    }
                }
            }
            div class="body" {
                h3 { (item.item.title) }
                p class="muted" { (item.item.description) }
                p {
                    span class="price" { (format_brl(item.item.price_cents)) }
                    " "
                    a class="wa-button" href=(wa) target="_blank" rel="noopener noreferrer" {
                        "WhatsApp"
                    }
                }
            }
        }
    }
}

/// The gallery fragment for an item modal: image stage, counter, arrows,
/// thumbnail strip. Every control is a link back into this fragment with a
/// transition action; the swipe handler posts `action=swipe&swipe_dx=<px>`.
pub fn gallery_fragment(
    item: &ResolvedItem,
    state: &GalleryState,
    orientation: Option<Orientation>,
) -> Markup {
    let index = state.active_index();
    let base = format!("/items/{}/gallery", item.item.id);
    // The failure set rides along on every link so a broken index stays
    // broken across transitions.
    let broken = state.broken_indices();
    let broken_param = if broken.is_empty() {
        String::new()
    } else {
        let list: Vec<String> = broken.iter().map(ToString::to_string).collect();
        format!("&broken={}", list.join(","))
    };
    // Site-level contact variant: settings template with the item title
    // appended.
    let wa = whatsapp::catalog_link(
        &item.whatsapp_number,
        &item.default_whatsapp_message,
        &item.item.title,
    );
    let scroll_offset = state.thumbnail_scroll_offset(THUMB_STRIP_WIDTH);

    html! {
        section class="gallery" data-item=(item.item.id) data-index=(index) {
            h2 { (item.item.title) }
            div class={ "stage " (modal_height_class(orientation)) }
                data-swipe-endpoint=(format!("{base}?index={index}&action=swipe{broken_param}")) {
                @if state.shows_placeholder(index) {
                    (image_placeholder())
                } @else {
                    img src=(state.active_url())
                        alt=(format!("{} - Imagem {}", item.item.title, index + 1));
                }
                @if state.len() > 1 {
                    span class="counter" { (index + 1) " / " (state.len()) }
                    a class="nav-arrow prev" href=(format!("{base}?index={index}&action=prev{broken_param}")) { "‹" }
                    a class="nav-arrow next" href=(format!("{base}?index={index}&action=next{broken_param}")) { "›" }
                }
            }
            @if state.len() > 1 {
                div class="thumbs" data-scroll-offset=(scroll_offset) {
                    @for (i, url) in state.images().iter().enumerate() {
                        a class=(if i == index { "active" } else { "" })
                            href=(format!("{base}?index={index}&action=goto&target={i}{broken_param}")) {
                            @if state.shows_placeholder(i) {
                                (image_placeholder())
                            } @else {
                                img src=(url) alt=(format!("Thumbnail {}", i + 1));
                            }
                        }
                    }
                }
            }
            p { (item.item.description) }
            p class="price" { (format_brl(item.item.price_cents)) }
            a class="wa-button" href=(wa) target="_blank" rel="noopener noreferrer" {
                "Conversar no WhatsApp"
            }
        }
    }
}

/// Gallery fragment for an item with no images at all: the state machine is
/// never constructed, the placeholder renders directly.
pub fn gallery_empty(item: &ResolvedItem) -> Markup {
    html! {
        section class="gallery" data-item=(item.item.id) {
            h2 { (item.item.title) }
            div class="stage stage-default" { (image_placeholder()) }
            p { (item.item.description) }
            p class="price" { (format_brl(item.item.price_cents)) }
        }
    }
}

/// Fragment returned when the requested item is unknown or unpublished.
pub fn gallery_not_found() -> Markup {
    html! {
        section class="gallery" {
            div class="placeholder" { "Item não encontrado." }
        }
    }
}

fn social_footer() -> Markup {
    html! {
        footer {
            p { "Siga-nos nas redes sociais" }
            p {
                a href="https://www.tiktok.com/@cutelaria.karvat" target="_blank" rel="noopener noreferrer" { "TikTok" }
                a href="https://www.instagram.com/wanderleykarvat/" target="_blank" rel="noopener noreferrer" { "Instagram" }
                a href="https://www.youtube.com/@CutelariaKarvat/featured" target="_blank" rel="noopener noreferrer" { "YouTube" }
            }
            p class="muted" { "© 2024 Cutelaria Karvat. Todos os direitos reservados." }
        }
    }
}
