//! WhatsApp deep-link builders.
//!
//! Two call sites compose the message text differently and both behaviors
//! are kept as-is: [`catalog_link`] uses the site-wide template and appends
//! the item title; [`item_link`] uses a fixed greeting plus the per-item
//! message and never mentions the title. Phone numbers are reduced to
//! digits with no further validation: a malformed number yields a dead
//! link, which is accepted.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Fallback text for [`catalog_link`] when the template is empty.
pub const DEFAULT_INTEREST_TEXT: &str = "Olá! Tenho interesse.";

/// Fixed greeting prefix used by [`item_link`].
pub const ITEM_GREETING_PREFIX: &str = "Olá! Tenho interesse, ";

/// Everything except the characters `encodeURIComponent` leaves bare
/// (alphanumerics and `-_.!~*'()`).
const TEXT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Strips every non-digit character from a raw phone number.
#[must_use]
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Deep link used by the catalog-level contact button: the site-wide
/// message template (or [`DEFAULT_INTEREST_TEXT`] when empty) with
/// `" - Produto: {title}"` appended.
#[must_use]
pub fn catalog_link(phone_raw: &str, template: &str, title: &str) -> String {
    let message = if template.is_empty() {
        DEFAULT_INTEREST_TEXT
    } else {
        template
    };
    build(phone_raw, &format!("{message} - Produto: {title}"))
}

/// Deep link used by the item card and modal buttons: fixed greeting plus
/// the item's own message. An item without an override keeps the trailing
/// separator, matching the shipped behavior. The title is never appended
/// here.
#[must_use]
pub fn item_link(phone_raw: &str, item_message: &str) -> String {
    build(phone_raw, &format!("{ITEM_GREETING_PREFIX}{item_message}"))
}

fn build(phone_raw: &str, text: &str) -> String {
    let digits = normalize_phone(phone_raw);
    let encoded = utf8_percent_encode(text, TEXT_PARAM);
    format!("https://wa.me/{digits}?text={encoded}")
}
