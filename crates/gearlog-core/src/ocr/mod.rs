//! OCR providers: a cloud text-detection client and a deterministic fixture.

mod fixture;
mod vision;

pub use fixture::FixtureOcr;
pub use vision::VisionOcr;

use crate::error::OcrError;
use crate::models::product::ReceiptText;

/// Source of recognized receipt text.
///
/// The parsing pipeline consumes only the [`ReceiptText`] envelope and must
/// not depend on which service produced it. Providers are handed to the
/// orchestrator explicitly - nothing in the pipeline reads the environment
/// to pick one.
#[allow(async_fn_in_trait)]
pub trait OcrProvider: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Recognize text in an encoded image (PNG/JPEG bytes).
    async fn extract_from_bytes(&self, image: &[u8]) -> Result<ReceiptText, OcrError>;
}

/// Download a remote receipt image so it can be handed to a provider.
pub async fn fetch_image(url: &str) -> Result<Vec<u8>, OcrError> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| OcrError::ImageFetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(OcrError::ImageFetch(format!("status {status} fetching {url}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| OcrError::ImageFetch(e.to_string()))?;
    Ok(bytes.to_vec())
}
