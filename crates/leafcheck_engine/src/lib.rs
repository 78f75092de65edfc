//! Leafcheck engine: payload normalization, analysis calls and effect execution.
mod analysis;
mod engine;
mod export;
mod failure;
mod normalize;
mod prompt;
mod types;

pub use analysis::{
    AnalysisError, AnalysisSettings, Analyzer, GeminiAnalyzer, DEFAULT_ENDPOINT, DEFAULT_MODEL,
};
pub use engine::EngineHandle;
pub use export::{ensure_output_dir, report_filename, PersistError, ReportDocument, ReportExporter};
pub use failure::{categorize, FailureCategory, ERROR_EXCERPT_LEN};
pub use normalize::{
    normalize_payload, scaled_dimensions, NormalizeError, NormalizeSettings, NormalizedPayload,
    DEFAULT_JPEG_QUALITY, DEFAULT_MAX_DIMENSION, NORMALIZED_IMAGE_MEDIA_TYPE,
};
pub use prompt::{response_schema, DIAGNOSIS_PROMPT};
pub use types::{EngineEvent, ItemFailure, Stage};
