//! Durable JSON storage helpers shared by the session file and the catalog
//! snapshot.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Write a value as JSON, atomically: write to a sibling temp file, then
/// rename over the target so a crash never leaves a partial snapshot.
pub(crate) async fn write_json_atomic<T: Serialize>(
    path: &Path,
    value: &T,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    let bytes = serde_json::to_vec(value).map_err(std::io::Error::other)?;
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, &bytes).await?;
    tokio::fs::rename(&tmp, path).await
}

/// Read a JSON value, treating a missing or malformed file as absence.
pub(crate) async fn read_json_lenient<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read persisted state");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "persisted state is malformed, treating as absent"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");

        write_json_atomic(&path, &vec![1u32, 2, 3]).await.expect("write");
        let back: Option<Vec<u32>> = read_json_lenient(&path).await;
        assert_eq!(back, Some(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let back: Option<Vec<u32>> = read_json_lenient(&dir.path().join("nope.json")).await;
        assert_eq!(back, None);
    }

    #[tokio::test]
    async fn test_malformed_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"{not json").await.expect("write");

        let back: Option<Vec<u32>> = read_json_lenient(&path).await;
        assert_eq!(back, None);
    }

    #[tokio::test]
    async fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/deep/state.json");

        write_json_atomic(&path, &42u32).await.expect("write");
        let back: Option<u32> = read_json_lenient(&path).await;
        assert_eq!(back, Some(42));
    }
}
