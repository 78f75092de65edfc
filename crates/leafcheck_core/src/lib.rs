//! Leafcheck core: item store, diagnosis model and the pure state machine.
mod effect;
mod intake;
mod msg;
mod report;
mod state;
mod store;
mod update;
mod view_model;

pub use effect::Effect;
pub use intake::{
    is_image_media_type, is_supported_media_type, IncomingFile, Notice, PDF_MEDIA_TYPE,
};
pub use msg::Msg;
pub use report::{AnalysisResult, Issue, OverallStatus, Severity, TreatmentStep};
pub use state::AppState;
pub use store::{ItemId, ItemStatus, ItemStore, SourceFile, UploadItem};
pub use update::update;
pub use view_model::{AppViewModel, ItemRowView, SelectedItemView};
