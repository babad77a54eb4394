//! Local persistence of fetched profile images.
//!
//! One file per identity: `<assets_root>/uploads/<id>.<ext>`. A new upload
//! truncates and rewrites the file in place; concurrent uploads for the same
//! identity race and the last writer wins.

mod writer;

use writer::AssetWriter;

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fetch::{BodySource, FetchError};
use crate::profile::IdentityId;
use crate::url_model::ImageExtension;

const UPLOADS_DIR: &str = "uploads";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("response body failed after {written} bytes: {source}")]
    Body {
        written: u64,
        #[source]
        source: FetchError,
    },
}

/// A stored asset and the public path that addresses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAsset {
    pub local_path: PathBuf,
    pub public_path: String,
    pub extension: ImageExtension,
    pub bytes: u64,
}

#[derive(Debug, Clone)]
pub struct AssetStore {
    uploads_dir: PathBuf,
    public_base: String,
}

impl AssetStore {
    pub fn new(assets_root: impl AsRef<Path>, public_base: &str) -> Self {
        Self {
            uploads_dir: assets_root.as_ref().join(UPLOADS_DIR),
            public_base: public_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    fn file_name(id: IdentityId, ext: ImageExtension) -> String {
        format!("{id}.{ext}")
    }

    pub fn asset_path(&self, id: IdentityId, ext: ImageExtension) -> PathBuf {
        self.uploads_dir.join(Self::file_name(id, ext))
    }

    /// Value stored on the profile for a persisted asset.
    pub fn public_path(&self, id: IdentityId, ext: ImageExtension) -> String {
        format!(
            "{}/{}/{}",
            self.public_base,
            UPLOADS_DIR,
            Self::file_name(id, ext)
        )
    }

    /// Stream `body` into the identity's asset file.
    ///
    /// The file handle lives only inside this call and is closed on every
    /// return path. On error the file may hold a partial body.
    pub async fn persist<B>(
        &self,
        id: IdentityId,
        ext: ImageExtension,
        body: &mut B,
    ) -> Result<PersistedAsset, PersistError>
    where
        B: BodySource + ?Sized,
    {
        let path = self.asset_path(id, ext);
        let io_err = |source| PersistError::Io {
            path: path.clone(),
            source,
        };

        tokio::fs::create_dir_all(&self.uploads_dir)
            .await
            .map_err(|source| PersistError::Io {
                path: self.uploads_dir.clone(),
                source,
            })?;

        let mut writer = AssetWriter::create(&path).await.map_err(io_err)?;
        loop {
            match body.next_chunk().await {
                Ok(Some(chunk)) => writer.write_chunk(&chunk).await.map_err(io_err)?,
                Ok(None) => break,
                Err(source) => {
                    return Err(PersistError::Body {
                        written: writer.written(),
                        source,
                    });
                }
            }
        }
        let bytes = writer.finish().await.map_err(io_err)?;

        tracing::debug!(identity = id, path = %path.display(), bytes, "asset persisted");
        Ok(PersistedAsset {
            local_path: path,
            public_path: self.public_path(id, ext),
            extension: ext,
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;

    /// Scripted body: yields the queued results in order, then ends.
    struct Scripted(VecDeque<Result<Vec<u8>, FetchError>>);

    impl Scripted {
        fn ok(chunks: &[&[u8]]) -> Self {
            Self(chunks.iter().map(|c| Ok(c.to_vec())).collect())
        }
    }

    #[async_trait]
    impl BodySource for Scripted {
        async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, FetchError> {
            match self.0.pop_front() {
                Some(Ok(c)) => Ok(Some(c)),
                Some(Err(e)) => Err(e),
                None => Ok(None),
            }
        }
    }

    #[test]
    fn paths_are_deterministic() {
        let store = AssetStore::new("/srv/assets/public/images", "/assets/public/images/");
        assert_eq!(
            store.asset_path(42, ImageExtension::Png),
            PathBuf::from("/srv/assets/public/images/uploads/42.png")
        );
        assert_eq!(
            store.public_path(42, ImageExtension::Png),
            "/assets/public/images/uploads/42.png"
        );
    }

    #[tokio::test]
    async fn persist_streams_all_chunks_and_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path(), "/assets");
        let mut body = Scripted::ok(&[b"GIF89a", b"...", b"rest"]);
        let asset = store.persist(3, ImageExtension::Gif, &mut body).await.unwrap();
        assert_eq!(asset.bytes, 13);
        assert_eq!(asset.public_path, "/assets/uploads/3.gif");
        assert_eq!(std::fs::read(&asset.local_path).unwrap(), b"GIF89a...rest");
    }

    #[tokio::test]
    async fn reupload_overwrites_same_path() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path(), "/assets");
        let first = store
            .persist(9, ImageExtension::Jpg, &mut Scripted::ok(&[b"first upload, long"]))
            .await
            .unwrap();
        let second = store
            .persist(9, ImageExtension::Jpg, &mut Scripted::ok(&[b"second"]))
            .await
            .unwrap();
        assert_eq!(first.local_path, second.local_path);
        assert_eq!(std::fs::read(&second.local_path).unwrap(), b"second");
    }

    #[tokio::test]
    async fn body_error_mid_stream_reports_partial_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = AssetStore::new(dir.path(), "/assets");
        let mut body = Scripted(VecDeque::from(vec![
            Ok(b"partial".to_vec()),
            Err(FetchError::NoResponse),
        ]));
        let err = store
            .persist(5, ImageExtension::Png, &mut body)
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::Body { written: 7, .. }));
        // The handle is closed: the path can be reopened and rewritten.
        let again = store
            .persist(5, ImageExtension::Png, &mut Scripted::ok(&[b"ok"]))
            .await
            .unwrap();
        assert_eq!(std::fs::read(&again.local_path).unwrap(), b"ok");
    }

    #[tokio::test]
    async fn unwritable_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let store = AssetStore::new(&blocker, "/assets");
        let err = store
            .persist(1, ImageExtension::Jpg, &mut Scripted::ok(&[b"x"]))
            .await
            .unwrap_err();
        assert!(matches!(err, PersistError::Io { .. }));
    }
}
