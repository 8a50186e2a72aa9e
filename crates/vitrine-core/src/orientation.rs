//! Orientation classification and the layout buckets derived from it.
//!
//! Classification is pure given pixel dimensions; the async probe that
//! produces dimensions lives in the gateway crate. Consumers map an
//! `Option<Orientation>` (None while a probe is pending or failed) to a
//! discrete CSS class through the lookup tables here.

use serde::{Deserialize, Serialize};

/// Ratio above which an image counts as landscape.
const LANDSCAPE_THRESHOLD: f64 = 1.1;

/// Ratio below which an image counts as portrait.
const PORTRAIT_THRESHOLD: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    Square,
}

impl Orientation {
    /// Classifies pixel dimensions by aspect ratio: `> 1.1` landscape,
    /// `< 0.9` portrait, everything else (both boundaries included) square.
    #[must_use]
    pub fn classify(width: u32, height: u32) -> Self {
        let ratio = f64::from(width) / f64::from(height);
        if ratio > LANDSCAPE_THRESHOLD {
            Orientation::Landscape
        } else if ratio < PORTRAIT_THRESHOLD {
            Orientation::Portrait
        } else {
            Orientation::Square
        }
    }
}

/// Natural pixel dimensions of a probed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

impl ImageDimensions {
    #[must_use]
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    #[must_use]
    pub fn orientation(self) -> Orientation {
        Orientation::classify(self.width, self.height)
    }
}

/// Aspect-ratio container class for catalog cards. Unknown (probe pending
/// or failed) defaults to the landscape 4:3 container.
#[must_use]
pub fn aspect_class(orientation: Option<Orientation>) -> &'static str {
    match orientation {
        Some(Orientation::Portrait) => "aspect-3-4",
        Some(Orientation::Square) => "aspect-square",
        Some(Orientation::Landscape) | None => "aspect-4-3",
    }
}

/// Height bucket for the modal image stage. Unknown gets its own default
/// bucket, taller than the landscape one.
#[must_use]
pub fn modal_height_class(orientation: Option<Orientation>) -> &'static str {
    match orientation {
        Some(Orientation::Portrait) => "stage-tall",
        Some(Orientation::Landscape) => "stage-short",
        Some(Orientation::Square) => "stage-medium",
        None => "stage-default",
    }
}
