//! Sequential writer for one asset file.

use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Owns the open asset file. Dropping it closes the handle, so every early
/// return in the caller releases the file.
pub(crate) struct AssetWriter {
    file: File,
    written: u64,
}

impl AssetWriter {
    /// Open `path` for writing, truncating whatever a previous upload left.
    pub async fn create(path: &Path) -> std::io::Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .await?;
        Ok(Self {
            file,
            written: 0,
        })
    }

    pub async fn write_chunk(&mut self, data: &[u8]) -> std::io::Result<()> {
        self.file.write_all(data).await?;
        self.written += data.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush buffered bytes and close the file. Returns the byte count.
    pub async fn finish(mut self) -> std::io::Result<u64> {
        self.file.flush().await?;
        Ok(self.written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_write_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("7.png");
        let mut w = AssetWriter::create(&path).await.unwrap();
        w.write_chunk(b"hello ").await.unwrap();
        w.write_chunk(b"world").await.unwrap();
        assert_eq!(w.written(), 11);
        assert_eq!(w.finish().await.unwrap(), 11);
        assert_eq!(std::fs::read(&path).unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn create_truncates_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("7.jpg");
        std::fs::write(&path, b"a much longer previous upload").unwrap();
        let mut w = AssetWriter::create(&path).await.unwrap();
        w.write_chunk(b"new").await.unwrap();
        w.finish().await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn create_in_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("1.jpg");
        assert!(AssetWriter::create(&path).await.is_err());
    }
}
