use bytes::Bytes;

/// The one document type accepted besides images.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// A file offered for upload, before intake validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingFile {
    pub name: String,
    pub media_type: String,
    pub data: Bytes,
    /// Display-only reference (a path or the plain file name).
    pub preview: String,
}

impl IncomingFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Bytes) -> Self {
        let name = name.into();
        Self {
            preview: name.clone(),
            name,
            media_type: media_type.into(),
            data,
        }
    }

    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = preview.into();
        self
    }
}

/// User-facing notice for a file that was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub file_name: String,
    pub text: String,
}

impl Notice {
    pub fn unsupported(file: &IncomingFile) -> Self {
        Self {
            file_name: file.name.clone(),
            text: format!(
                "{} is not a supported file type ({}). Please upload an image or a PDF.",
                file.name, file.media_type
            ),
        }
    }

    pub fn unreadable(file_name: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        let file_name = file_name.into();
        Self {
            text: format!("{file_name} could not be read: {reason}"),
            file_name,
        }
    }
}

pub fn is_image_media_type(media_type: &str) -> bool {
    essence(media_type)
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Images of any subtype plus PDF documents.
pub fn is_supported_media_type(media_type: &str) -> bool {
    is_image_media_type(media_type) || essence(media_type).eq_ignore_ascii_case(PDF_MEDIA_TYPE)
}

fn essence(media_type: &str) -> &str {
    media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim()
}
