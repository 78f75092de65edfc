use std::process::ExitCode;

use anyhow::Context;
use chrono::Utc;
use engine_logging::{engine_error, engine_info, engine_warn};
use leafcheck_core::{update, AppState, ItemStatus, Msg};
use leafcheck_engine::{ReportDocument, ReportExporter};

use crate::cli::AppConfig;
use crate::effects::EffectRunner;
use crate::{intake, render};

pub fn run_app(config: AppConfig) -> anyhow::Result<ExitCode> {
    let runner = EffectRunner::new(&config);
    let (files, unreadable) = intake::read_files(&config.files);

    let mut state = AppState::new();
    state = dispatch(state, Msg::FilesRejected(unreadable), &runner);
    state = dispatch(state, Msg::FilesAdded(files), &runner);
    report_progress(&mut state);

    while state.store().in_flight() > 0 {
        let Some(msg) = runner.next_msg() else {
            engine_warn!(
                "Engine stopped with {} item(s) still in flight",
                state.store().in_flight()
            );
            break;
        };
        state = dispatch(state, msg, &runner);
        report_progress(&mut state);
    }

    if config.json {
        let json = serde_json::to_string_pretty(&render::render_json(&state))
            .context("failed to serialize results")?;
        println!("{json}");
    } else {
        print!("{}", render::render_text(&state));
    }

    let export_failures = match &config.output_dir {
        Some(dir) => export_reports(
            &state,
            &ReportExporter::new(dir.clone()),
            &Utc::now().to_rfc3339(),
        ),
        None => 0,
    };

    let view = state.view();
    if view.failed_count > 0 || view.succeeded_count == 0 || export_failures > 0 {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn dispatch(state: AppState, msg: Msg, runner: &EffectRunner) -> AppState {
    let (state, effects) = update(state, msg);
    runner.enqueue(effects);
    state
}

fn report_progress(state: &mut AppState) {
    if state.consume_dirty() {
        engine_info!("{}", render::status_line(&state.view()));
    }
}

/// Writes one report per succeeded item; returns how many writes failed.
fn export_reports(state: &AppState, exporter: &ReportExporter, analyzed_utc: &str) -> usize {
    let mut failures = 0;
    for item in state.store().items() {
        let (ItemStatus::Succeeded, Some(report)) = (item.status, &item.result) else {
            continue;
        };
        let document = ReportDocument {
            item_id: item.id,
            source_name: &item.source.name,
            media_type: &item.source.media_type,
            analyzed_utc,
            report,
        };
        match exporter.export(&document, &item.source.data) {
            Ok(path) => {
                engine_info!("item_id={} report written to {}", item.id, path.display());
            }
            Err(err) => {
                engine_error!("item_id={} report export failed: {}", item.id, err);
                failures += 1;
            }
        }
    }
    failures
}
