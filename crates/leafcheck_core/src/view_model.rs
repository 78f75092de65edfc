use crate::{AnalysisResult, ItemId, ItemStatus};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub items: Vec<ItemRowView>,
    pub selected: Option<SelectedItemView>,
    pub notices: Vec<String>,
    pub loading_count: usize,
    pub succeeded_count: usize,
    pub failed_count: usize,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRowView {
    pub item_id: ItemId,
    pub name: String,
    pub preview: String,
    pub mime_type: String,
    pub status: ItemStatus,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedItemView {
    pub item_id: ItemId,
    pub name: String,
    pub status: ItemStatus,
    pub result: Option<AnalysisResult>,
    pub error_message: Option<String>,
}
