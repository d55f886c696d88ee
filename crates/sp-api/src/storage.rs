//! Object-storage client for study-material files.
//!
//! Files live in one of three buckets selected by material type. Removal is
//! always best-effort from the caller's point of view: material row deletes
//! proceed even when the storage call fails.

use crate::error::ApiError;

/// Material-type to bucket lookup table. Unknown types fall back to the
/// document bucket.
const BUCKETS: &[(&str, &str)] = &[
    ("image", "study-images"),
    ("video", "study-videos"),
    ("document", "study-documents"),
    ("pdf", "study-documents"),
    ("notes", "study-documents"),
];

pub const DEFAULT_BUCKET: &str = "study-documents";

/// The bucket holding files of the given material type.
pub fn bucket_for_material_type(material_type: &str) -> &'static str {
    let normalized = material_type.to_lowercase();
    BUCKETS
        .iter()
        .find(|(prefix, _)| normalized.starts_with(prefix))
        .map_or(DEFAULT_BUCKET, |(_, bucket)| bucket)
}

/// Thin HTTP client for the object-storage service.
#[derive(Debug, Clone)]
pub struct StorageClient {
    http: reqwest::Client,
    base_url: String,
    service_key: String,
}

impl StorageClient {
    pub fn new(base_url: String, service_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key,
        }
    }

    /// Remove one object. Callers treat failure as non-fatal.
    pub async fn remove_object(&self, bucket: &str, path: &str) -> Result<(), ApiError> {
        let url = format!("{}/object/{bucket}/{path}", self.base_url);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| ApiError::Upstream(format!("storage delete failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ApiError::Upstream(format!(
                "storage delete returned {} for {bucket}/{path}",
                response.status()
            )));
        }

        Ok(())
    }
}
