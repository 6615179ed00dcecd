use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use image::ImageReader;
use mime::Mime;
use rp_core::traits::MediaStore;
use rp_core::{AppError, Dimensions, MediaKind, NewMedia};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::debug;

pub struct LocalMediaStore {
    /// Root directory for all uploads (e.g., "./data/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/uploads")
    url_prefix: String,
}

/// Splits a content hash into its two shard directories.
fn shards(media_id: &str) -> Option<(&str, &str)> {
    Some((media_id.get(0..2)?, media_id.get(2..4)?))
}

impl LocalMediaStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// "ab/cd/abcd...hash" under the root.
    fn sharded_path(&self, hash: &str) -> PathBuf {
        let mut path = self.root_path.clone();
        if let Some((first, second)) = shards(hash) {
            path.push(first);
            path.push(second);
        }
        path.push(hash);
        path
    }

    /// Stores an upload and describes it as a media library record.
    pub async fn ingest(
        &self,
        file_name: &str,
        content_type: Option<&str>,
        data: Bytes,
    ) -> rp_core::Result<NewMedia> {
        if data.is_empty() {
            return Err(AppError::ValidationError(format!("`{file_name}` is empty")));
        }

        let mime = content_type
            .and_then(|raw| raw.parse::<Mime>().ok())
            .unwrap_or_else(|| mime_guess::from_path(file_name).first_or_octet_stream());
        let kind = MediaKind::from_mime(&mime);
        let dimensions = match kind {
            MediaKind::Image => image_dimensions(&data),
            _ => None,
        };
        let size = data.len() as u64;

        let media_id = self
            .save_upload(data, mime.essence_str())
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let title = Path::new(file_name)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());

        Ok(NewMedia {
            title,
            url: self.get_url(&media_id),
            alt: None,
            description: None,
            kind,
            size,
            dimensions,
        })
    }
}

fn image_dimensions(data: &[u8]) -> Option<Dimensions> {
    let (width, height) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()?;
    Some(Dimensions { width, height })
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    /// Saves an upload using its SHA-256 hash as the filename.
    /// Identical uploads share one file.
    async fn save_upload(&self, data: Bytes, content_type: &str) -> anyhow::Result<String> {
        let hash = hex::encode(Sha256::digest(&data));
        let target_path = self.sharded_path(&hash);

        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("creating {}", parent.display()))?;
        }

        if fs::try_exists(&target_path).await? {
            debug!(%hash, "upload already stored");
        } else {
            fs::write(&target_path, &data)
                .await
                .with_context(|| format!("writing {}", target_path.display()))?;
            debug!(%hash, content_type, bytes = data.len(), "upload stored");
        }

        Ok(hash)
    }

    fn get_url(&self, media_id: &str) -> String {
        match shards(media_id) {
            Some((first, second)) => {
                format!("{}/{first}/{second}/{media_id}", self.url_prefix)
            }
            None => format!("{}/{media_id}", self.url_prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_err;

    fn png(width: u32, height: u32) -> Bytes {
        let img = image::RgbImage::new(width, height);
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        Bytes::from(out.into_inner())
    }

    #[tokio::test]
    async fn image_upload_is_described_and_sharded() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads/".into());

        let draft = store
            .ingest("sunset.png", Some("image/png"), png(8, 5))
            .await
            .unwrap();

        assert_eq!(draft.title, "sunset");
        assert_eq!(draft.kind, MediaKind::Image);
        assert_eq!(draft.dimensions, Some(Dimensions { width: 8, height: 5 }));
        assert!(draft.url.starts_with("/uploads/"));

        let hash = draft.url.rsplit('/').next().unwrap();
        assert_eq!(hash.len(), 64);
        assert!(dir.path().join(&hash[0..2]).join(&hash[2..4]).join(hash).exists());
    }

    #[tokio::test]
    async fn kind_is_guessed_from_the_name_when_type_is_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads".into());

        let clip = store
            .ingest("intro.mp4", None, Bytes::from_static(b"not really a video"))
            .await
            .unwrap();
        assert_eq!(clip.kind, MediaKind::Video);
        assert_eq!(clip.dimensions, None);

        let doc = store
            .ingest("notes.txt", Some("text/plain"), Bytes::from_static(b"hello"))
            .await
            .unwrap();
        assert_eq!(doc.kind, MediaKind::Document);
        assert_eq!(doc.size, 5);
    }

    #[tokio::test]
    async fn identical_uploads_share_one_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads".into());

        let a = store.save_upload(Bytes::from_static(b"same"), "text/plain").await.unwrap();
        let b = store.save_upload(Bytes::from_static(b"same"), "text/plain").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn empty_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path().to_path_buf(), "/uploads".into());

        let err = assert_err!(store.ingest("blank.png", None, Bytes::new()).await);
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
