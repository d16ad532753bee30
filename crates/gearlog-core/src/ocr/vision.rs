//! Cloud text-detection OCR provider.

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use tracing::debug;

use crate::error::OcrError;
use crate::models::config::OcrConfig;
use crate::models::product::ReceiptText;

use super::OcrProvider;

/// Confidence assumed when the service omits its own estimate.
const DEFAULT_CONFIDENCE: f32 = 0.8;

/// REST client for a cloud text-detection endpoint. Images are submitted
/// base64-encoded; the first annotation of the response carries the full
/// recognized text.
pub struct VisionOcr {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl VisionOcr {
    /// Build from configuration. Fails when no API key is configured.
    pub fn from_config(config: &OcrConfig) -> Result<Self, OcrError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(OcrError::MissingCredential)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key,
        })
    }

    async fn annotate(&self, content: String) -> Result<ReceiptText, OcrError> {
        let body = serde_json::json!({
            "requests": [{
                "image": { "content": content },
                "features": [{ "type": "TEXT_DETECTION", "maxResults": 1 }]
            }]
        });

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(OcrError::Service {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request rejected")
                    .to_string(),
            });
        }

        let payload: AnnotateBatchResponse = response
            .json()
            .await
            .map_err(|e| OcrError::MalformedResponse(e.to_string()))?;

        receipt_text_from_response(payload)
    }
}

fn receipt_text_from_response(payload: AnnotateBatchResponse) -> Result<ReceiptText, OcrError> {
    let first = payload
        .responses
        .into_iter()
        .next()
        .ok_or_else(|| OcrError::MalformedResponse("empty response batch".to_string()))?;

    if let Some(error) = first.error {
        return Err(OcrError::Service {
            status: error.code.unwrap_or(0).clamp(0, u16::MAX as i64) as u16,
            message: error.message,
        });
    }

    // No annotations means a blank image, not a failure.
    let Some(annotation) = first
        .text_annotations
        .into_iter()
        .flatten()
        .next()
    else {
        return Ok(ReceiptText::empty());
    };

    let confidence = annotation.confidence.unwrap_or(DEFAULT_CONFIDENCE);
    Ok(ReceiptText::new(annotation.description, confidence))
}

impl OcrProvider for VisionOcr {
    fn name(&self) -> &'static str {
        "vision"
    }

    async fn extract_from_bytes(&self, image: &[u8]) -> Result<ReceiptText, OcrError> {
        debug!(bytes = image.len(), "submitting image for text detection");
        self.annotate(BASE64.encode(image)).await
    }
}

#[derive(Debug, Deserialize)]
struct AnnotateBatchResponse {
    #[serde(default)]
    responses: Vec<AnnotateResponse>,
}

#[derive(Debug, Deserialize)]
struct AnnotateResponse {
    #[serde(default, rename = "textAnnotations")]
    text_annotations: Option<Vec<TextAnnotation>>,
    #[serde(default)]
    error: Option<ApiStatus>,
}

#[derive(Debug, Deserialize)]
struct TextAnnotation {
    #[serde(default)]
    description: String,
    #[serde(default)]
    confidence: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> Result<ReceiptText, OcrError> {
        receipt_text_from_response(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn full_text_comes_from_first_annotation() {
        let text = parse(
            r#"{"responses": [{"textAnnotations": [
                {"description": "Best Buy\nTotal: $5.00", "confidence": 0.92},
                {"description": "Best"}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(text.raw_text, "Best Buy\nTotal: $5.00");
        assert_eq!(text.confidence, 0.92);
        assert_eq!(text.lines, vec!["Best Buy", "Total: $5.00"]);
    }

    #[test]
    fn missing_confidence_defaults() {
        let text = parse(r#"{"responses": [{"textAnnotations": [{"description": "x"}]}]}"#)
            .unwrap();
        assert_eq!(text.confidence, DEFAULT_CONFIDENCE);
    }

    #[test]
    fn no_annotations_is_empty_text_not_error() {
        let text = parse(r#"{"responses": [{}]}"#).unwrap();
        assert!(text.raw_text.is_empty());
        assert_eq!(text.confidence, 0.0);

        let text = parse(r#"{"responses": [{"textAnnotations": []}]}"#).unwrap();
        assert!(text.lines.is_empty());
    }

    #[test]
    fn service_error_in_body_is_surfaced() {
        let err = parse(
            r#"{"responses": [{"error": {"code": 7, "message": "permission denied"}}]}"#,
        )
        .unwrap_err();
        match err {
            OcrError::Service { status, message } => {
                assert_eq!(status, 7);
                assert_eq!(message, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_batch_is_malformed() {
        let err = parse(r#"{"responses": []}"#).unwrap_err();
        assert!(matches!(err, OcrError::MalformedResponse(_)));
    }
}
