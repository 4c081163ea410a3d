//! REST API types for the upload frontend.
//!
//! The response carries everything a chart/metrics view needs in one
//! payload: the long-form observations, per-region describe rows, and the
//! load metadata. Consumers read these; they never write back.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::models::Observation;
use crate::stats::{describe, DescribeRow};
use crate::transform::pipeline::{LoadResult, TableInfo};

/// Response sent to the frontend after an upload is processed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Unique job identifier
    pub job_id: String,

    /// Status: "ready", "warning" (rows were dropped), "error"
    pub status: String,

    /// Long-form observations, sorted ascending by date
    pub observations: Vec<Observation>,

    /// Per-region descriptive statistics
    pub summary: Vec<DescribeRow>,

    /// Metadata about the load
    pub metadata: TableInfo,
}

impl From<LoadResult> for UploadResponse {
    fn from(result: LoadResult) -> Self {
        let dropped = &result.info.dropped;
        let clean = dropped.blank_region == 0
            && dropped.empty_rows == 0
            && dropped.missing_prices == 0;

        UploadResponse {
            job_id: Uuid::new_v4().to_string(),
            status: if clean { "ready" } else { "warning" }.to_string(),
            observations: result.long.0.clone(),
            summary: describe(&result.summary),
            metadata: result.info,
        }
    }
}

/// Create an error response body
pub fn error_response(error: &str) -> Value {
    json!({
        "jobId": Uuid::new_v4().to_string(),
        "status": "error",
        "error": error,
        "observations": [],
        "summary": [],
    })
}
