// SPDX-License-Identifier: MIT

//! GCS storage for uploaded expense documents.
//!
//! The rest of the system only ever sees the returned object URL; file
//! contents are never inspected.

use crate::error::AppError;
use crate::models::DocumentKind;
use google_cloud_storage::client::{Client, ClientConfig};
use google_cloud_storage::http::objects::upload::{Media, UploadObjectRequest, UploadType};
use uuid::Uuid;

/// GCS client wrapper.
pub struct StorageService {
    client: Option<Client>,
    bucket: String,
}

impl StorageService {
    /// Create a storage client using application-default credentials.
    pub async fn new(bucket: &str) -> Result<Self, AppError> {
        let config = ClientConfig::default()
            .with_auth()
            .await
            .map_err(|e| AppError::Storage(format!("Failed to initialize GCS client: {}", e)))?;

        Ok(Self {
            client: Some(Client::new(config)),
            bucket: bucket.to_string(),
        })
    }

    /// Create a mock storage client for testing (offline mode).
    ///
    /// Uploads will return an error if attempted.
    pub fn new_mock() -> Self {
        Self {
            client: None,
            bucket: "test-bucket".to_string(),
        }
    }

    /// Upload a document and return its public URL.
    ///
    /// Objects are namespaced by owner and document kind so bucket-level
    /// listing stays meaningful: `{user_id}/{kind}/{uuid}-{filename}`.
    pub async fn upload_document(
        &self,
        user_id: &str,
        kind: DocumentKind,
        filename: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, AppError> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::Storage("Storage not connected (offline mode)".to_string()))?;

        let object_name = format!(
            "{}/{}/{}-{}",
            user_id,
            kind.as_str(),
            Uuid::new_v4(),
            sanitize_filename(filename)
        );

        let mut media = Media::new(object_name.clone());
        media.content_type = content_type.to_string().into();

        client
            .upload_object(
                &UploadObjectRequest {
                    bucket: self.bucket.clone(),
                    ..Default::default()
                },
                bytes,
                &UploadType::Simple(media),
            )
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {}", e)))?;

        tracing::info!(user_id, object = %object_name, "Document uploaded");

        Ok(format!(
            "https://storage.googleapis.com/{}/{}",
            self.bucket, object_name
        ))
    }
}

/// Keep object names URL- and path-safe.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "document".to_string()
    } else {
        cleaned
    }
}
