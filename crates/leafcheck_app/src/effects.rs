use engine_logging::{engine_debug, engine_info, engine_warn};
use leafcheck_core::{Effect, Msg};
use leafcheck_engine::{EngineEvent, EngineHandle, ItemFailure};

use crate::cli::AppConfig;

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: &AppConfig) -> Self {
        engine_info!(
            "Using model {} at {}",
            config.analysis.model,
            config.analysis.endpoint
        );
        Self {
            engine: EngineHandle::new(config.analysis.clone(), config.normalize),
        }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::AnalyzeItem { item_id, file } => {
                    engine_info!(
                        "AnalyzeItem item_id={} name={} media_type={} bytes={}",
                        item_id,
                        file.name,
                        file.media_type,
                        file.data.len()
                    );
                    self.engine.enqueue(item_id, file);
                }
            }
        }
    }

    /// Blocks until the engine reports something the state machine cares
    /// about. `None` once the engine has gone away.
    pub fn next_msg(&self) -> Option<Msg> {
        loop {
            if let Some(msg) = map_event(self.engine.recv()?) {
                return Some(msg);
            }
        }
    }
}

fn map_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Progress { item_id, stage } => {
            engine_debug!("item_id={} stage={:?}", item_id, stage);
            None
        }
        EngineEvent::ItemCompleted { item_id, result } => Some(match result {
            Ok(result) => Msg::AnalysisSucceeded { item_id, result },
            Err(failure) => {
                engine_warn!("Item {} failed: {}", item_id, failure);
                Msg::AnalysisFailed {
                    item_id,
                    message: failure.user_message(),
                }
            }
        }),
    }
}
