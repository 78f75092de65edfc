use bytes::Bytes;
use engine_logging::{engine_debug, item_log};

use crate::{AnalysisResult, IncomingFile};

pub type ItemId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemStatus {
    #[default]
    Pending,
    Loading,
    Succeeded,
    Failed,
}

impl ItemStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, ItemStatus::Succeeded | ItemStatus::Failed)
    }
}

/// Raw upload: bytes, declared media type and file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub name: String,
    pub media_type: String,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadItem {
    pub id: ItemId,
    pub source: SourceFile,
    pub preview: String,
    pub mime_type: String,
    pub status: ItemStatus,
    pub result: Option<AnalysisResult>,
    pub error_message: Option<String>,
}

/// Ordered collection of upload items plus the current selection.
///
/// All mutation is keyed by [`ItemId`]; writes to an id that is no longer
/// present are silently dropped, so late completions from removed items are
/// harmless.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStore {
    items: Vec<UploadItem>,
    selected: Option<ItemId>,
    next_id: ItemId,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            next_id: 1,
        }
    }
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one `Loading` item per file and returns the new ids with
    /// their sources, in input order.
    pub fn add(&mut self, files: Vec<IncomingFile>) -> Vec<(ItemId, SourceFile)> {
        let mut added = Vec::with_capacity(files.len());
        for file in files {
            let id = self.insert_pending(file);
            if let Some(item) = self.get_mut(id) {
                item.status = ItemStatus::Loading;
                added.push((id, item.source.clone()));
            }
        }
        if self.selected.is_none() {
            self.selected = added.first().map(|(id, _)| *id);
        }
        added
    }

    /// Returns the removed item, if it was present.
    pub fn remove(&mut self, id: ItemId) -> Option<UploadItem> {
        let index = self.items.iter().position(|item| item.id == id)?;
        let removed = self.items.remove(index);
        if self.selected == Some(id) {
            self.selected = self.items.first().map(|item| item.id);
        }
        Some(removed)
    }

    /// Returns true when the item moved to `Succeeded`.
    pub fn set_result(&mut self, id: ItemId, result: AnalysisResult) -> bool {
        let Some(item) = self.loading_item_mut(id) else {
            return false;
        };
        item.status = ItemStatus::Succeeded;
        item.result = Some(result);
        item.error_message = None;
        true
    }

    /// Returns true when the item moved to `Failed`.
    pub fn set_error(&mut self, id: ItemId, message: impl Into<String>) -> bool {
        let Some(item) = self.loading_item_mut(id) else {
            return false;
        };
        item.status = ItemStatus::Failed;
        item.result = None;
        item.error_message = Some(message.into());
        true
    }

    /// Returns true when the selection changed.
    pub fn select(&mut self, id: ItemId) -> bool {
        if self.selected == Some(id) || self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn selected_id(&self) -> Option<ItemId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&UploadItem> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ItemId) -> Option<&UploadItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items(&self) -> &[UploadItem] {
        &self.items
    }

    /// Number of items still waiting on their pipeline.
    pub fn in_flight(&self) -> usize {
        self.items
            .iter()
            .filter(|item| !item.status.is_terminal())
            .count()
    }

    fn insert_pending(&mut self, file: IncomingFile) -> ItemId {
        let id = self.next_id;
        self.next_id += 1;
        self.items.push(UploadItem {
            id,
            mime_type: file.media_type.clone(),
            preview: file.preview,
            source: SourceFile {
                name: file.name,
                media_type: file.media_type,
                data: file.data,
            },
            status: ItemStatus::Pending,
            result: None,
            error_message: None,
        });
        id
    }

    fn get_mut(&mut self, id: ItemId) -> Option<&mut UploadItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    fn loading_item_mut(&mut self, id: ItemId) -> Option<&mut UploadItem> {
        match self.get_mut(id) {
            Some(item) if item.status == ItemStatus::Loading => Some(item),
            Some(item) => {
                item_log!(
                    Debug,
                    id,
                    "ignoring completion for item in state {:?}",
                    item.status
                );
                None
            }
            None => {
                engine_debug!("ignoring completion for removed item_id={}", id);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> IncomingFile {
        IncomingFile::new(name, "image/png", Bytes::from_static(b"png"))
    }

    #[test]
    fn ids_are_never_reused() {
        let mut store = ItemStore::new();
        let first = store.add(vec![file("a.png")]);
        store.remove(first[0].0);
        let second = store.add(vec![file("b.png")]);
        assert_ne!(first[0].0, second[0].0);
    }

    #[test]
    fn items_pass_through_pending_before_loading() {
        let mut store = ItemStore::new();
        let id = store.insert_pending(file("a.png"));
        assert_eq!(store.get(id).unwrap().status, ItemStatus::Pending);
        assert!(!store.set_error(id, "too early"));
    }
}
