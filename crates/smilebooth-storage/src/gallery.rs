//! Gallery listing of stored captures.

use std::path::Path;
use std::time::SystemTime;

use chrono::{DateTime, Local};
use tokio::fs;

use smilebooth_models::{GalleryEntry, IMAGE_URL_DIR};

use crate::error::{StorageError, StorageResult};

/// File name suffixes shown in the gallery (case-sensitive).
pub const GALLERY_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// List image files in `dir`, newest first.
///
/// Ordering uses the file creation time, falling back to modification time
/// where the filesystem has no birth time; ties are broken by name. A
/// missing directory lists as empty.
pub async fn list_gallery(dir: &Path) -> StorageResult<Vec<GalleryEntry>> {
    let mut read_dir = match fs::read_dir(dir).await {
        Ok(rd) => rd,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(StorageError::list_failed(format!(
                "{}: {}",
                dir.display(),
                e
            )))
        }
    };

    let mut entries = Vec::new();
    while let Some(entry) = read_dir.next_entry().await? {
        let Ok(filename) = entry.file_name().into_string() else {
            continue;
        };
        if !is_gallery_image(&filename) {
            continue;
        }

        let meta = entry.metadata().await?;
        if !meta.is_file() {
            continue;
        }
        let created = meta
            .created()
            .or_else(|_| meta.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);

        entries.push(GalleryEntry {
            path: format!("{}/{}", IMAGE_URL_DIR, filename),
            filename,
            created_at: DateTime::<Local>::from(created),
        });
    }

    entries.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.filename.cmp(&a.filename))
    });
    Ok(entries)
}

fn is_gallery_image(filename: &str) -> bool {
    GALLERY_EXTENSIONS.iter().any(|ext| filename.ends_with(ext))
}
