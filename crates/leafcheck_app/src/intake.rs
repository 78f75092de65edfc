use std::fs;
use std::path::Path;

use bytes::Bytes;
use engine_logging::engine_warn;
use leafcheck_core::{IncomingFile, Notice};

/// Guess the media type from the file extension.
pub fn detect_media_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        "avif" => "image/avif",
        "heic" | "heif" => "image/heic",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Reads every path; unreadable ones become notices. Media type checks are
/// left to the state machine.
pub fn read_files(paths: &[impl AsRef<Path>]) -> (Vec<IncomingFile>, Vec<Notice>) {
    let mut files = Vec::with_capacity(paths.len());
    let mut notices = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match fs::read(path) {
            Ok(data) => files.push(
                IncomingFile::new(name, detect_media_type(path), Bytes::from(data))
                    .with_preview(path.display().to_string()),
            ),
            Err(err) => {
                engine_warn!("Failed to read {:?}: {}", path, err);
                notices.push(Notice::unreadable(name, err));
            }
        }
    }

    (files, notices)
}
