//! Async image-dimension probing for orientation-aware layout.
//!
//! [`DimensionProber`] fetches an image and decodes only as far as the
//! header to read its natural pixel size. [`LatestProbe`] keys every probe
//! by the URL it was issued for and discards completions whose URL no
//! longer matches the most recently requested one, so a slow old probe can
//! never overwrite a fast new one.

use std::io::Cursor;
use std::time::Duration;

use image::ImageReader;
use tokio::sync::Mutex;

use vitrine_core::{ImageDimensions, Orientation};

use crate::error::GatewayError;

/// Fetches images and reads their natural dimensions.
pub struct DimensionProber {
    client: reqwest::Client,
}

impl DimensionProber {
    /// Creates a prober with its own HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the client cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent.to_owned())
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` and reads the image's pixel dimensions from its header.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::Http`] on network failure or non-2xx status.
    /// - [`GatewayError::Decode`] when the body is not a readable image.
    pub async fn probe(&self, url: &str) -> Result<ImageDimensions, GatewayError> {
        let response = self.client.get(url).send().await?;
        let response = response.error_for_status()?;
        let bytes = response.bytes().await?;

        let reader = ImageReader::new(Cursor::new(bytes.as_ref()))
            .with_guessed_format()
            .map_err(|e| GatewayError::Decode {
                context: url.to_string(),
                source: image::ImageError::IoError(e),
            })?;
        let (width, height) = reader
            .into_dimensions()
            .map_err(|e| GatewayError::Decode {
                context: url.to_string(),
                source: e,
            })?;
        Ok(ImageDimensions { width, height })
    }
}

/// Probe slot holding at most one classification, keyed by URL.
///
/// `start` registers the newest requested URL and clears the previous
/// result, so consumers see "pending" rather than a stale classification.
/// `complete` stores a result only when its URL still matches.
#[derive(Debug, Default, Clone)]
pub struct LatestProbe {
    latest: Option<String>,
    result: Option<ImageDimensions>,
}

impl LatestProbe {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `url` as the probe in flight, discarding any earlier
    /// result.
    pub fn start(&mut self, url: &str) {
        self.latest = Some(url.to_string());
        self.result = None;
    }

    /// Delivers a completed probe. Returns `false` (and stores nothing)
    /// when `url` is no longer the latest requested one.
    pub fn complete(&mut self, url: &str, dims: ImageDimensions) -> bool {
        if self.latest.as_deref() == Some(url) {
            self.result = Some(dims);
            true
        } else {
            false
        }
    }

    /// The current classification, `None` while pending, failed, or after
    /// a newer `start`.
    #[must_use]
    pub fn current(&self) -> Option<ImageDimensions> {
        self.result
    }

    #[must_use]
    pub fn orientation(&self) -> Option<Orientation> {
        self.result.map(ImageDimensions::orientation)
    }
}

/// A prober plus a shared [`LatestProbe`] slot: the classification surface
/// handed to the page renderers. Probe failures classify as `None` and are
/// logged, never surfaced to the visitor.
pub struct OrientationClassifier {
    prober: DimensionProber,
    slot: Mutex<LatestProbe>,
}

impl OrientationClassifier {
    #[must_use]
    pub fn new(prober: DimensionProber) -> Self {
        Self {
            prober,
            slot: Mutex::new(LatestProbe::new()),
        }
    }

    /// Probes `url` and returns its orientation, or `None` when the probe
    /// failed or a newer request superseded this one while it ran.
    pub async fn classify(&self, url: &str) -> Option<Orientation> {
        self.slot.lock().await.start(url);

        match self.prober.probe(url).await {
            Ok(dims) => {
                let mut slot = self.slot.lock().await;
                if slot.complete(url, dims) {
                    slot.orientation()
                } else {
                    tracing::debug!(url = %url, "discarding stale dimension probe");
                    None
                }
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "image dimension probe failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS_A: ImageDimensions = ImageDimensions {
        width: 1000,
        height: 500,
    };
    const DIMS_B: ImageDimensions = ImageDimensions {
        width: 500,
        height: 1000,
    };

    #[test]
    fn complete_for_latest_url_is_stored() {
        let mut probe = LatestProbe::new();
        probe.start("https://cdn.example.com/a.jpg");
        assert!(probe.complete("https://cdn.example.com/a.jpg", DIMS_A));
        assert_eq!(probe.orientation(), Some(Orientation::Landscape));
    }

    #[test]
    fn stale_completion_is_discarded_not_applied() {
        let mut probe = LatestProbe::new();
        probe.start("https://cdn.example.com/a.jpg");
        probe.start("https://cdn.example.com/b.jpg");

        // The slow old probe finishes after the new one was requested.
        assert!(!probe.complete("https://cdn.example.com/a.jpg", DIMS_A));
        assert_eq!(probe.current(), None);

        assert!(probe.complete("https://cdn.example.com/b.jpg", DIMS_B));
        assert_eq!(probe.orientation(), Some(Orientation::Portrait));
    }

    #[test]
    fn fast_new_probe_is_not_overwritten_by_slow_old_one() {
        let mut probe = LatestProbe::new();
        probe.start("https://cdn.example.com/a.jpg");
        probe.start("https://cdn.example.com/b.jpg");

        assert!(probe.complete("https://cdn.example.com/b.jpg", DIMS_B));
        assert!(!probe.complete("https://cdn.example.com/a.jpg", DIMS_A));
        assert_eq!(probe.current(), Some(DIMS_B));
    }

    #[test]
    fn starting_a_new_probe_clears_the_previous_result() {
        let mut probe = LatestProbe::new();
        probe.start("https://cdn.example.com/a.jpg");
        assert!(probe.complete("https://cdn.example.com/a.jpg", DIMS_A));
        probe.start("https://cdn.example.com/b.jpg");
        assert_eq!(probe.current(), None, "pending probe must not show a stale result");
    }

    #[test]
    fn unstarted_probe_has_no_classification() {
        let probe = LatestProbe::new();
        assert_eq!(probe.current(), None);
        assert_eq!(probe.orientation(), None);
    }
}
