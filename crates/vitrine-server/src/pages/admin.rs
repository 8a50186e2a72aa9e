//! Admin management page: settings form, item list, item forms.

use maud::{html, Markup};

use vitrine_core::item::{ResolvedItem, Settings, ADVISORY_MAX_FILE_BYTES, MAX_IMAGES_PER_ITEM};
use vitrine_core::money::format_brl;

use super::{flash_banners, image_placeholder, layout};

pub fn admin_page(
    items: &[ResolvedItem],
    settings: Option<&Settings>,
    notice: Option<&str>,
    error: Option<&str>,
) -> Markup {
    layout(
        "Administração — Cutelaria Karvat",
        html! {
            header class="brand" {
                h2 { "Cutelaria Karvat" }
                h1 { "Administração" }
            }
            (flash_banners(notice, error))
            (settings_panel(settings))
            section class="panel" {
                h2 { "Novo Item" }
                (item_form("/admin/items", None))
            }
            section {
                h2 { "Itens (" (items.len()) ")" }
                div class="grid" {
                    @for item in items {
                        (item_card(item))
                    }
                }
            }
        },
    )
}

fn settings_panel(settings: Option<&Settings>) -> Markup {
    html! {
        section class="panel" {
            h2 { "Configurações WhatsApp" }
            @if let Some(settings) = settings {
                form method="post" action="/admin/settings" {
                    input type="hidden" name="id" value=(settings.id);
                    input type="text" name="whatsapp_number"
                        placeholder="Número (+5541999999999)"
                        value=(settings.whatsapp_number);
                    input type="text" name="whatsapp_message"
                        placeholder="Mensagem padrão"
                        value=(settings.whatsapp_message);
                    button type="submit" { "Salvar Configurações" }
                }
            } @else {
                p class="muted" { "Configurações indisponíveis no momento." }
            }
        }
    }
}

fn item_card(item: &ResolvedItem) -> Markup {
    let id = item.item.id;
    html! {
        article class="card" {
            div class="media aspect-4-3" {
                @if let Some(url) = item.primary_image_url() {
                    img src=(url) alt=(item.item.title);
                } @else {
                    (image_placeholder())
                }
            }
            div class="body" {
                h3 { (item.item.title) }
                p class="muted" { (format_brl(item.item.price_cents)) " · posição " (item.item.position) }
                p {
                    form method="post" action=(format!("/admin/items/{id}/publish")) style="display:inline" {
                        input type="hidden" name="published" value=(item.item.published);
                        button type="submit" {
                            @if item.item.published { "Despublicar" } @else { "Publicar" }
                        }
                    }
                    " "
                    form method="post" action=(format!("/admin/items/{id}/delete")) style="display:inline" {
                        button type="submit" class="danger" { "Excluir" }
                    }
                }
                details {
                    summary { "Editar" }
                    (item_form(&format!("/admin/items/{id}"), Some(item)))
                }
            }
        }
    }
}

/// The item form, shared between create (no `item`) and edit. On edit the
/// already-persisted storage keys ride along as hidden fields; newly staged
/// files are appended after them on save.
fn item_form(action: &str, item: Option<&ResolvedItem>) -> Markup {
    let inner = item.map(|resolved| &resolved.item);
    html! {
        form method="post" action=(action) enctype="multipart/form-data" {
            input type="text" name="title" placeholder="Título"
                value=[inner.map(|i| i.title.clone())];
            textarea name="description" placeholder="Descrição" rows="3" {
                @if let Some(i) = inner { (i.description) }
            }
            input type="number" name="price_cents"
                placeholder="Preço em centavos (ex: 5000 = R$ 50,00)"
                value=[inner.map(|i| i.price_cents)];
            textarea name="whatsapp_message" rows="2"
                placeholder="Mensagem personalizada do WhatsApp (ex: nesta faca artesanal)" {
                @if let Some(i) = inner {
                    @if let Some(msg) = &i.whatsapp_message { (msg) }
                }
            }
            input type="number" name="position" placeholder="Posição (ordem)"
                value=[inner.map(|i| i.position)];
            @if let Some(i) = inner {
                @for path in &i.image_paths {
                    input type="hidden" name="existing_path" value=(path);
                }
            }
            label class="muted" {
                "Imagens (máximo " (MAX_IMAGES_PER_ITEM) "): PNG, JPG ou WEBP, máximo "
                (ADVISORY_MAX_FILE_BYTES / (1024 * 1024)) " MB cada"
            }
            input type="file" name="image" accept="image/*" multiple;
            label {
                input type="checkbox" name="published"
                    checked[inner.is_none_or(|i| i.published)];
                " Publicado"
            }
            button type="submit" class="primary" { "Salvar" }
        }
    }
}
