use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tokio::sync::RwLock;
use tracing::{info, instrument};

use super::FileStore;
use crate::errors::AppError;

/// Resume files kept in an S3 (or MinIO) bucket, addressed by object key.
pub struct S3FileStore {
    client: S3Client,
    bucket: String,
}

impl S3FileStore {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[async_trait]
impl FileStore for S3FileStore {
    #[instrument(skip(self))]
    async fn fetch(&self, file_ref: &str) -> Result<Bytes, AppError> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(file_ref)
            .send()
            .await
            .map_err(|e| {
                let err = e.into_service_error();
                if err.is_no_such_key() {
                    AppError::NotFound(format!("File {file_ref} not found"))
                } else {
                    AppError::Storage(format!("S3 download failed: {err}"))
                }
            })?;

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?
            .into_bytes();

        info!("Fetched s3://{}/{} ({} bytes)", self.bucket, file_ref, bytes.len());
        Ok(bytes)
    }
}

#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: RwLock<HashMap<String, Bytes>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn put(&self, file_ref: &str, bytes: Bytes) {
        self.files.write().await.insert(file_ref.to_string(), bytes);
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn fetch(&self, file_ref: &str) -> Result<Bytes, AppError> {
        self.files
            .read()
            .await
            .get(file_ref)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("File {file_ref} not found")))
    }
}
