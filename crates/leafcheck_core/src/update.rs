use engine_logging::{engine_info, item_log};

use crate::{AppState, Effect, IncomingFile, ItemId, ItemStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::FilesAdded(files) => {
            if files.is_empty() {
                return (state, Vec::new());
            }
            let offered = files.len();
            let added = state.intake(files);
            engine_info!(
                "Intake accepted {} of {} file(s)",
                added.len(),
                offered
            );
            added
                .into_iter()
                .map(|(item_id, file)| Effect::AnalyzeItem { item_id, file })
                .collect()
        }
        Msg::FilesRejected(notices) => {
            state.push_notices(notices);
            Vec::new()
        }
        Msg::ItemRemoved { item_id } => {
            if state.store_mut().remove(item_id).is_some() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ItemSelected { item_id } => {
            if state.store_mut().select(item_id) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ResubmitRequested { item_id } => resubmit(&mut state, item_id),
        Msg::NoticesDismissed => {
            state.clear_notices();
            Vec::new()
        }
        Msg::AnalysisSucceeded { item_id, result } => {
            if state.store_mut().set_result(item_id, result) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AnalysisFailed { item_id, message } => {
            if state.store_mut().set_error(item_id, message) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

/// A failed item is replaced by a fresh item carrying the same source, so the
/// failed entry itself never leaves its terminal state.
fn resubmit(state: &mut AppState, item_id: ItemId) -> Vec<Effect> {
    let store = state.store_mut();
    let Some(item) = store.get(item_id) else {
        return Vec::new();
    };
    if item.status != ItemStatus::Failed {
        item_log!(Debug, item_id, "resubmit ignored in state {:?}", item.status);
        return Vec::new();
    }

    let was_selected = store.selected_id() == Some(item_id);
    let Some(failed) = store.remove(item_id) else {
        return Vec::new();
    };
    let file = IncomingFile::new(failed.source.name, failed.source.media_type, failed.source.data)
        .with_preview(failed.preview);
    let added = store.add(vec![file]);
    if was_selected {
        if let Some((new_id, _)) = added.first() {
            store.select(*new_id);
        }
    }
    state.mark_dirty();

    added
        .into_iter()
        .map(|(new_id, file)| {
            item_log!(Info, new_id, "resubmitted from item_id={}", item_id);
            Effect::AnalyzeItem {
                item_id: new_id,
                file,
            }
        })
        .collect()
}
