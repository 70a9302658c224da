//! Upload validation and storage for payment receipts and product images.

use crate::errors::ServiceError;
use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Uploads above this size are rejected before touching disk.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

const RECEIPT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "pdf", "webp", "bmp"];
const PRODUCT_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Receipt,
    ProductImage,
}

impl UploadKind {
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Receipt => RECEIPT_EXTENSIONS,
            UploadKind::ProductImage => PRODUCT_IMAGE_EXTENSIONS,
        }
    }
}

/// Lowercased extension of `filename`, if it has one.
fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Validates name and size, returning the normalized extension.
pub fn validate_upload(
    kind: UploadKind,
    filename: &str,
    size: usize,
) -> Result<String, ServiceError> {
    let ext = extension_of(filename).ok_or_else(|| {
        ServiceError::UploadError("File has no extension".to_string())
    })?;

    if !kind.allowed_extensions().contains(&ext.as_str()) {
        return Err(ServiceError::UploadError(format!(
            "File type '{}' not supported. Allowed: {}",
            ext,
            kind.allowed_extensions().join(", ")
        )));
    }

    if size > MAX_UPLOAD_BYTES {
        return Err(ServiceError::UploadError(
            "File too large. Maximum size is 5MB.".to_string(),
        ));
    }

    Ok(ext)
}

/// Strips path separators and oddball characters from a client filename.
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
    cleaned.trim_matches(|c| c == '_' || c == '.').to_string()
}

fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Filesystem store rooted at the configured receipt and product-image
/// directories.
#[derive(Debug, Clone)]
pub struct UploadStore {
    receipt_dir: PathBuf,
    product_image_dir: PathBuf,
}

impl UploadStore {
    pub fn new(receipt_dir: impl Into<PathBuf>, product_image_dir: impl Into<PathBuf>) -> Self {
        Self {
            receipt_dir: receipt_dir.into(),
            product_image_dir: product_image_dir.into(),
        }
    }

    pub async fn ensure_dirs(&self) -> Result<(), ServiceError> {
        tokio::fs::create_dir_all(&self.receipt_dir).await?;
        tokio::fs::create_dir_all(&self.product_image_dir).await?;
        Ok(())
    }

    async fn write_unique(
        &self,
        dir: &Path,
        name_for: impl Fn(&str) -> String,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        // Collisions are unlikely but cheap to retry.
        for _ in 0..4 {
            let filename = name_for(&unique_suffix());
            let path = dir.join(&filename);
            if tokio::fs::try_exists(&path).await? {
                continue;
            }
            tokio::fs::write(&path, bytes).await?;
            if !tokio::fs::try_exists(&path).await? {
                return Err(ServiceError::StorageError(
                    "File missing after write".to_string(),
                ));
            }
            return Ok(filename);
        }
        Err(ServiceError::StorageError(
            "Could not allocate a unique filename".to_string(),
        ))
    }

    /// Stores a payment receipt, returning the stored filename.
    #[instrument(skip(self, bytes), fields(order_code = %order_code, size = bytes.len()))]
    pub async fn store_receipt(
        &self,
        order_code: &str,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        let ext = validate_upload(UploadKind::Receipt, original_filename, bytes.len())?;
        let stamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let code = order_code.to_string();
        let filename = self
            .write_unique(
                &self.receipt_dir,
                move |suffix| format!("receipt_{}_{}_{}.{}", code, stamp, suffix, ext),
                bytes,
            )
            .await?;
        info!(filename = %filename, "Receipt stored");
        Ok(filename)
    }

    /// Stores a product image, returning the stored filename.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn store_product_image(
        &self,
        original_filename: &str,
        bytes: &[u8],
    ) -> Result<String, ServiceError> {
        validate_upload(UploadKind::ProductImage, original_filename, bytes.len())?;
        let safe = sanitize_filename(original_filename);
        let stamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let filename = self
            .write_unique(
                &self.product_image_dir,
                move |suffix| format!("product_{}_{}_{}", stamp, suffix, safe),
                bytes,
            )
            .await?;
        info!(filename = %filename, "Product image stored");
        Ok(filename)
    }

    async fn remove(&self, dir: &Path, filename: &str) {
        // Stored names never contain separators; refuse anything that does.
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            warn!(filename = %filename, "Refusing to remove suspicious filename");
            return;
        }
        let path = dir.join(filename);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => info!(filename = %filename, "Removed stored file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(filename = %filename, error = %e, "Failed to remove stored file"),
        }
    }

    /// Best-effort delete; a missing file is not an error.
    pub async fn remove_receipt(&self, filename: &str) {
        self.remove(&self.receipt_dir, filename).await;
    }

    pub async fn remove_product_image(&self, filename: &str) {
        self.remove(&self.product_image_dir, filename).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_extensions_are_checked_case_insensitively() {
        assert!(validate_upload(UploadKind::Receipt, "r.PDF", 100).is_ok());
        assert!(validate_upload(UploadKind::Receipt, "r.webp", 100).is_ok());
        assert!(validate_upload(UploadKind::Receipt, "r.exe", 100).is_err());
        assert!(validate_upload(UploadKind::Receipt, "noext", 100).is_err());
    }

    #[test]
    fn product_images_reject_pdf_and_bmp() {
        assert!(validate_upload(UploadKind::ProductImage, "p.png", 100).is_ok());
        assert!(validate_upload(UploadKind::ProductImage, "p.pdf", 100).is_err());
        assert!(validate_upload(UploadKind::ProductImage, "p.bmp", 100).is_err());
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(validate_upload(UploadKind::Receipt, "r.png", MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_upload(UploadKind::Receipt, "r.png", MAX_UPLOAD_BYTES + 1).is_err());
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
    }

    #[tokio::test]
    async fn receipt_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("receipts"), dir.path().join("images"));
        store.ensure_dirs().await.unwrap();

        let name = store
            .store_receipt("EF1234", "slip.png", b"fake image bytes")
            .await
            .unwrap();
        assert!(name.starts_with("receipt_EF1234_"));
        assert!(name.ends_with(".png"));

        store.remove_receipt(&name).await;
        // Removing again is a no-op.
        store.remove_receipt(&name).await;
    }
}
