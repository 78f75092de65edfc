use std::sync::{mpsc, Arc};
use std::thread;

use engine_logging::{engine_error, engine_info, item_log};
use leafcheck_core::{AnalysisResult, ItemId, SourceFile};
use tokio::sync::mpsc as async_mpsc;
use tokio::task::JoinSet;

use crate::{
    normalize_payload, AnalysisSettings, Analyzer, EngineEvent, GeminiAnalyzer, ItemFailure,
    NormalizeSettings, Stage,
};

enum EngineCommand {
    Enqueue { item_id: ItemId, file: SourceFile },
}

/// Runs one independent normalize → analyze pipeline per enqueued item on a
/// single-threaded event loop, reporting each outcome as an [`EngineEvent`].
///
/// Pipelines are never cancelled; dropping the handle stops intake but lets
/// in-flight items finish.
pub struct EngineHandle {
    cmd_tx: async_mpsc::UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(analysis: AnalysisSettings, normalize: NormalizeSettings) -> Self {
        Self::with_analyzer(Arc::new(GeminiAnalyzer::new(analysis)), normalize)
    }

    pub fn with_analyzer(analyzer: Arc<dyn Analyzer>, normalize: NormalizeSettings) -> Self {
        let (cmd_tx, cmd_rx) = async_mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    engine_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(run_loop(analyzer, normalize, cmd_rx, event_tx));
        });

        Self { cmd_tx, event_rx }
    }

    pub fn enqueue(&self, item_id: ItemId, file: SourceFile) {
        if self
            .cmd_tx
            .send(EngineCommand::Enqueue { item_id, file })
            .is_err()
        {
            item_log!(Error, item_id, "engine is not running; item dropped");
        }
    }

    /// Blocks until the next event; `None` once the engine has shut down.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

async fn run_loop(
    analyzer: Arc<dyn Analyzer>,
    normalize: NormalizeSettings,
    mut cmd_rx: async_mpsc::UnboundedReceiver<EngineCommand>,
    event_tx: mpsc::Sender<EngineEvent>,
) {
    let mut in_flight = JoinSet::new();
    loop {
        tokio::select! {
            command = cmd_rx.recv() => {
                let Some(EngineCommand::Enqueue { item_id, file }) = command else {
                    break;
                };
                let analyzer = analyzer.clone();
                let event_tx = event_tx.clone();
                in_flight.spawn(async move {
                    let pipeline_tx = event_tx.clone();
                    // Inner task so a panicking pipeline still yields a completion.
                    let result = tokio::spawn(async move {
                        run_pipeline(analyzer.as_ref(), normalize, item_id, file, &pipeline_tx).await
                    })
                    .await
                    .unwrap_or_else(|err| {
                        item_log!(Error, item_id, "pipeline aborted: {}", err);
                        Err(ItemFailure::Crashed(err.to_string()))
                    });
                    let _ = event_tx.send(EngineEvent::ItemCompleted { item_id, result });
                });
            }
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(err) = joined {
                    engine_error!("Item pipeline panicked: {}", err);
                }
            }
        }
    }

    engine_info!("Engine intake closed; waiting for {} item(s)", in_flight.len());
    while in_flight.join_next().await.is_some() {}
}

async fn run_pipeline(
    analyzer: &dyn Analyzer,
    settings: NormalizeSettings,
    item_id: ItemId,
    file: SourceFile,
    event_tx: &mpsc::Sender<EngineEvent>,
) -> Result<AnalysisResult, ItemFailure> {
    let _ = event_tx.send(EngineEvent::Progress {
        item_id,
        stage: Stage::Normalizing,
    });
    let media_type = file.media_type.clone();
    let data = file.data;
    let payload = tokio::task::spawn_blocking(move || {
        normalize_payload(&data, &media_type, &settings)
    })
    .await
    .map_err(|err| {
        item_log!(Error, item_id, "normalizer task aborted for {}: {}", file.name, err);
        ItemFailure::Crashed(err.to_string())
    })?
    .map_err(|err| {
        item_log!(Warn, item_id, "normalization failed for {}: {}", file.name, err);
        ItemFailure::Normalize(err)
    })?;

    item_log!(
        Info,
        item_id,
        "normalized {} ({} -> {})",
        file.name,
        file.media_type,
        payload.mime_type
    );
    let _ = event_tx.send(EngineEvent::Progress {
        item_id,
        stage: Stage::Analyzing,
    });

    let result = analyzer.analyze(item_id, &payload).await.map_err(|err| {
        let failure = ItemFailure::analysis(err);
        item_log!(Warn, item_id, "analysis failed: {}", failure);
        failure
    })?;

    let violations = result.plan_order_violations();
    if !violations.is_empty() {
        item_log!(
            Warn,
            item_id,
            "treatment steps out of order for: {}",
            violations.join(", ")
        );
    }
    item_log!(
        Info,
        item_id,
        "analysis complete: {:?} with {} issue(s)",
        result.overall_status,
        result.issues.len()
    );
    Ok(result)
}
