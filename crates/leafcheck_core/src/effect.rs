#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Normalize and analyze one item; the outcome comes back as a `Msg`.
    AnalyzeItem {
        item_id: crate::ItemId,
        file: crate::SourceFile,
    },
}
