use crate::view_model::{AppViewModel, ItemRowView, SelectedItemView};
use crate::{intake, IncomingFile, ItemId, ItemStatus, ItemStore, Notice, SourceFile};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    store: ItemStore,
    notices: Vec<Notice>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn view(&self) -> AppViewModel {
        let items: Vec<ItemRowView> = self
            .store
            .items()
            .iter()
            .map(|item| ItemRowView {
                item_id: item.id,
                name: item.source.name.clone(),
                preview: item.preview.clone(),
                mime_type: item.mime_type.clone(),
                status: item.status,
                is_selected: self.store.selected_id() == Some(item.id),
            })
            .collect();

        let count = |status: ItemStatus| items.iter().filter(|row| row.status == status).count();

        AppViewModel {
            loading_count: count(ItemStatus::Loading) + count(ItemStatus::Pending),
            succeeded_count: count(ItemStatus::Succeeded),
            failed_count: count(ItemStatus::Failed),
            selected: self.store.selected().map(|item| SelectedItemView {
                item_id: item.id,
                name: item.source.name.clone(),
                status: item.status,
                result: item.result.clone(),
                error_message: item.error_message.clone(),
            }),
            notices: self.notices.iter().map(|notice| notice.text.clone()).collect(),
            items,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Splits `files` by media type, storing the accepted ones and a notice
    /// for each rejected one.
    pub(crate) fn intake(&mut self, files: Vec<IncomingFile>) -> Vec<(ItemId, SourceFile)> {
        let (accepted, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|file| intake::is_supported_media_type(&file.media_type));

        if !rejected.is_empty() {
            self.notices
                .extend(rejected.iter().map(Notice::unsupported));
            self.mark_dirty();
        }
        if accepted.is_empty() {
            return Vec::new();
        }
        self.mark_dirty();
        self.store.add(accepted)
    }

    pub(crate) fn push_notices(&mut self, notices: Vec<Notice>) {
        if notices.is_empty() {
            return;
        }
        self.notices.extend(notices);
        self.mark_dirty();
    }

    pub(crate) fn clear_notices(&mut self) {
        if !self.notices.is_empty() {
            self.notices.clear();
            self.mark_dirty();
        }
    }

    pub(crate) fn store_mut(&mut self) -> &mut ItemStore {
        &mut self.store
    }
}
