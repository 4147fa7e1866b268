//! Detection parameters and the request/response bodies of the booth API.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::capture::CaptureRecord;

/// Sensitivity parameters for one multi-scale detector pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectionParams {
    /// Shrink ratio between successive pyramid levels
    pub scale_factor: f64,
    /// Overlapping hits required to confirm a candidate
    pub min_neighbors: i32,
}

impl DetectionParams {
    /// Face pass over the full grayscale frame.
    pub const FACE: DetectionParams = DetectionParams {
        scale_factor: 1.3,
        min_neighbors: 5,
    };

    /// Smile pass inside a single face. The search space is one face, so the
    /// neighbor threshold is much stricter than for faces.
    pub const SMILE: DetectionParams = DetectionParams {
        scale_factor: 1.8,
        min_neighbors: 20,
    };

    pub const fn new(scale_factor: f64, min_neighbors: i32) -> Self {
        Self {
            scale_factor,
            min_neighbors,
        }
    }
}

/// Response body of `POST /detect`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectResponse {
    pub smile_detected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectResponse {
    pub fn verdict(smile_detected: bool) -> Self {
        Self {
            smile_detected,
            error: None,
        }
    }

    /// A failed request never carries a positive verdict.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            smile_detected: false,
            error: Some(error.into()),
        }
    }
}

/// Response body of `POST /save`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SaveResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SaveResponse {
    pub fn saved(record: CaptureRecord) -> Self {
        Self {
            success: true,
            filename: Some(record.filename),
            path: Some(record.path),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            filename: None,
            path: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_omits_error_field() {
        let body = serde_json::to_value(DetectResponse::verdict(true)).unwrap();
        assert_eq!(body, json!({ "smile_detected": true }));
    }

    #[test]
    fn test_failed_detect_is_never_positive() {
        let resp = DetectResponse::failed("boom");
        assert!(!resp.smile_detected);
        assert_eq!(
            serde_json::to_value(resp).unwrap(),
            json!({ "smile_detected": false, "error": "boom" })
        );
    }

    #[test]
    fn test_save_response_shapes() {
        let record = CaptureRecord::new("smile_20240101_120000.jpg");
        assert_eq!(
            serde_json::to_value(SaveResponse::saved(record)).unwrap(),
            json!({
                "success": true,
                "filename": "smile_20240101_120000.jpg",
                "path": "images/smile_20240101_120000.jpg"
            })
        );
        assert_eq!(
            serde_json::to_value(SaveResponse::failed("disk full")).unwrap(),
            json!({ "success": false, "error": "disk full" })
        );
    }

    #[test]
    fn test_parameter_sets() {
        assert_eq!(DetectionParams::FACE, DetectionParams::new(1.3, 5));
        assert_eq!(DetectionParams::SMILE, DetectionParams::new(1.8, 20));
    }
}
