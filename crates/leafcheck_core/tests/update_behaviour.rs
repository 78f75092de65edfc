use std::sync::Once;

use bytes::Bytes;
use leafcheck_core::{update, AppState, Effect, IncomingFile, ItemStatus, Msg, Notice};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(engine_logging::initialize_for_tests);
}

fn file(name: &str, media_type: &str) -> IncomingFile {
    IncomingFile::new(name, media_type, Bytes::from(name.as_bytes().to_vec()))
}

fn analyzed_ids(effects: &[Effect]) -> Vec<u64> {
    effects
        .iter()
        .map(|effect| match effect {
            Effect::AnalyzeItem { item_id, .. } => *item_id,
        })
        .collect()
}

#[test]
fn valid_files_are_added_as_loading_and_invalid_ones_rejected() {
    init_logging();
    let files = vec![
        file("leaf.jpg", "image/jpeg"),
        file("notes.txt", "text/plain"),
        file("scan.pdf", "application/pdf"),
        file("archive.zip", "application/zip"),
        file("close-up.png", "image/png"),
    ];

    let (mut state, effects) = update(AppState::new(), Msg::FilesAdded(files));
    let view = state.view();

    assert_eq!(view.items.len(), 3);
    assert!(view.items.iter().all(|row| row.status == ItemStatus::Loading));
    assert_eq!(
        view.items.iter().map(|row| row.name.as_str()).collect::<Vec<_>>(),
        vec!["leaf.jpg", "scan.pdf", "close-up.png"]
    );
    assert_eq!(view.notices.len(), 2);
    assert!(view.notices[0].contains("notes.txt"));
    assert!(view.notices[1].contains("archive.zip"));
    assert_eq!(analyzed_ids(&effects), vec![1, 2, 3]);
    assert_eq!(view.loading_count, 3);
    assert!(state.consume_dirty());
}

#[test]
fn effect_carries_source_bytes_and_media_type() {
    init_logging();
    let (_state, effects) = update(
        AppState::new(),
        Msg::FilesAdded(vec![file("scan.pdf", "application/pdf")]),
    );

    match &effects[..] {
        [Effect::AnalyzeItem { item_id, file }] => {
            assert_eq!(*item_id, 1);
            assert_eq!(file.name, "scan.pdf");
            assert_eq!(file.media_type, "application/pdf");
            assert_eq!(file.data, Bytes::from_static(b"scan.pdf"));
        }
        other => panic!("unexpected effects: {other:?}"),
    }
}

#[test]
fn only_invalid_files_produce_notices_without_items() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::FilesAdded(vec![file("a.doc", "application/msword")]),
    );

    assert!(effects.is_empty());
    assert!(state.view().items.is_empty());
    assert_eq!(state.view().notices.len(), 1);
    assert!(state.view().selected.is_none());
    assert!(state.consume_dirty());
}

#[test]
fn empty_intake_is_ignored() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::FilesAdded(Vec::new()));

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
}

#[test]
fn first_added_item_becomes_selected() {
    init_logging();
    let (state, _) = update(
        AppState::new(),
        Msg::FilesAdded(vec![file("a.jpg", "image/jpeg"), file("b.jpg", "image/jpeg")]),
    );
    assert_eq!(state.view().selected.map(|s| s.item_id), Some(1));

    // A later batch does not steal the selection.
    let (state, _) = update(state, Msg::FilesAdded(vec![file("c.jpg", "image/jpeg")]));
    assert_eq!(state.view().selected.map(|s| s.item_id), Some(1));
}

#[test]
fn platform_rejections_and_dismissal() {
    init_logging();
    let (mut state, effects) = update(
        AppState::new(),
        Msg::FilesRejected(vec![Notice::unreadable("gone.jpg", "not found")]),
    );
    assert!(effects.is_empty());
    assert_eq!(state.view().notices, vec!["gone.jpg could not be read: not found"]);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::NoticesDismissed);
    assert!(state.view().notices.is_empty());
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::NoticesDismissed);
    assert!(!state.consume_dirty());
}
