#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User selected or dropped files.
    FilesAdded(Vec<crate::IncomingFile>),
    /// Files the platform layer could not hand over (e.g. unreadable paths).
    FilesRejected(Vec<crate::Notice>),
    /// User removed an item from the list.
    ItemRemoved { item_id: crate::ItemId },
    /// User picked an item to show its report.
    ItemSelected { item_id: crate::ItemId },
    /// User asked to send a failed item again.
    ResubmitRequested { item_id: crate::ItemId },
    /// User acknowledged the rejection notices.
    NoticesDismissed,
    /// Engine completion with a parsed report.
    AnalysisSucceeded {
        item_id: crate::ItemId,
        result: crate::AnalysisResult,
    },
    /// Engine completion with a user-facing failure message.
    AnalysisFailed {
        item_id: crate::ItemId,
        message: String,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
