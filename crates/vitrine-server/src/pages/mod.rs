//! HTML rendering. All markup goes through typed maud templates; handlers
//! never concatenate HTML strings.

pub mod admin;
pub mod catalog;

use maud::{html, Markup, DOCTYPE};

/// Site-wide stylesheet, inlined into every page. The `aspect-*` and
/// `stage-*` classes are the layout buckets the orientation classifier
/// selects between; `stage-default` is the bucket for pending/unknown.
const STYLESHEET: &str = "\
:root { color-scheme: dark; }
body { margin: 0; background: #171717; color: #f5f5f5; font-family: system-ui, sans-serif; }
main { max-width: 72rem; margin: 0 auto; padding: 1.5rem; }
a { color: inherit; }
.brand { text-align: center; margin-bottom: 2rem; }
.brand img { width: 8rem; height: 8rem; }
.grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(16rem, 1fr)); gap: 1rem; }
.card { background: #262626; border: 1px solid #404040; border-radius: 1rem; overflow: hidden; }
.card .body { padding: 0.75rem 1rem 1rem; }
.aspect-4-3 { aspect-ratio: 4 / 3; }
.aspect-3-4 { aspect-ratio: 3 / 4; }
.aspect-square { aspect-ratio: 1 / 1; }
.media { position: relative; background: #404040; }
.media img { width: 100%; height: 100%; object-fit: cover; display: block; }
.badge { position: absolute; top: 0.5rem; right: 0.5rem; background: rgba(0,0,0,0.7); border-radius: 999px; padding: 0.1rem 0.6rem; font-size: 0.75rem; }
.placeholder { display: flex; align-items: center; justify-content: center; height: 100%; min-height: 8rem; color: #a3a3a3; }
.price { font-weight: 600; font-size: 1.1rem; }
.wa-button { display: inline-block; background: #16a34a; color: #fff; border-radius: 0.5rem; padding: 0.4rem 0.9rem; text-decoration: none; }
.stage { position: relative; background: #404040; border-radius: 0.75rem; overflow: hidden; }
.stage img { width: 100%; height: 100%; object-fit: cover; transition: opacity 0.15s ease-in-out, transform 0.15s ease-in-out; }
.stage-short { height: 16rem; }
.stage-medium { height: 20rem; }
.stage-tall { height: 26rem; }
.stage-default { height: 22rem; }
.counter { position: absolute; top: 0.5rem; right: 0.5rem; background: rgba(0,0,0,0.5); padding: 0.1rem 0.5rem; border-radius: 0.25rem; font-size: 0.85rem; }
.nav-arrow { position: absolute; top: 50%; transform: translateY(-50%); background: rgba(0,0,0,0.3); color: #fff; padding: 0.4rem 0.7rem; border-radius: 0.5rem; text-decoration: none; }
.nav-arrow.prev { left: 0.5rem; }
.nav-arrow.next { right: 0.5rem; }
.thumbs { display: flex; gap: 0.5rem; margin-top: 1rem; overflow-x: auto; }
.thumbs a { flex-shrink: 0; width: 4rem; height: 4rem; border: 2px solid #525252; border-radius: 0.5rem; overflow: hidden; }
.thumbs a.active { border-color: #3b82f6; }
.thumbs img { width: 100%; height: 100%; object-fit: cover; }
.banner { border-radius: 0.5rem; padding: 0.6rem 1rem; margin-bottom: 1rem; }
.banner.notice { background: #14532d; }
.banner.error { background: #7f1d1d; }
.panel { background: #262626; border: 1px solid #404040; border-radius: 0.75rem; padding: 1rem; margin-bottom: 1.5rem; }
.panel input, .panel textarea { width: 100%; background: #404040; border: 1px solid #525252; color: #f5f5f5; border-radius: 0.4rem; padding: 0.4rem 0.6rem; margin-bottom: 0.6rem; }
.panel button { background: #404040; color: #f5f5f5; border: none; border-radius: 0.4rem; padding: 0.5rem 1rem; cursor: pointer; }
.panel button.primary { background: #16a34a; }
.panel button.danger { background: #dc2626; }
.muted { color: #a3a3a3; font-size: 0.85rem; }
footer { margin-top: 4rem; padding-top: 2rem; border-top: 1px solid #262626; text-align: center; color: #a3a3a3; }
footer a { margin: 0 0.75rem; }
";

/// Shared document shell.
pub fn layout(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="pt-BR" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (maud::PreEscaped(STYLESHEET)) }
            }
            body {
                main { (body) }
            }
        }
    }
}

/// Flash banners rendered from the redirect query parameters.
pub fn flash_banners(notice: Option<&str>, error: Option<&str>) -> Markup {
    html! {
        @if let Some(msg) = notice {
            div class="banner notice" { (msg) }
        }
        @if let Some(msg) = error {
            div class="banner error" { (msg) }
        }
    }
}

/// Placeholder shown wherever an image is missing or failed to load.
pub fn image_placeholder() -> Markup {
    html! {
        div class="placeholder" { "Imagem não encontrada" }
    }
}
