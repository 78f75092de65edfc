use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, ValueEnum};
use leafcheck_engine::{
    AnalysisSettings, NormalizeSettings, DEFAULT_ENDPOINT, DEFAULT_MAX_DIMENSION, DEFAULT_MODEL,
};

use crate::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(
    name = "leafcheck",
    version,
    about = "Diagnose plant leaf photos and PDFs with a hosted vision model"
)]
pub struct Cli {
    /// Leaf images (jpg, png, webp, ...) or PDF documents to analyze
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// API key for the analysis service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model used for diagnosis
    #[arg(long, env = "LEAFCHECK_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of the analysis service
    #[arg(long, env = "LEAFCHECK_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Longest side, in pixels, images are scaled down to before upload
    #[arg(long, default_value_t = DEFAULT_MAX_DIMENSION, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_dimension: u32,

    /// Write each successful report as JSON into this directory
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Print results as JSON instead of a text report
    #[arg(long)]
    pub json: bool,

    /// Where log output goes
    #[arg(long, value_enum, default_value_t = LogArg::Terminal)]
    pub log: LogArg,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogArg {
    Terminal,
    File,
    Both,
}

impl From<LogArg> for LogDestination {
    fn from(arg: LogArg) -> Self {
        match arg {
            LogArg::Terminal => LogDestination::Terminal,
            LogArg::File => LogDestination::File,
            LogArg::Both => LogDestination::Both,
        }
    }
}

/// Everything the app needs once the command line has been validated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub files: Vec<PathBuf>,
    pub analysis: AnalysisSettings,
    pub normalize: NormalizeSettings,
    pub output_dir: Option<PathBuf>,
    pub json: bool,
}

impl TryFrom<Cli> for AppConfig {
    type Error = anyhow::Error;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let api_key = cli
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        let Some(api_key) = api_key else {
            bail!("missing API key: pass --api-key or set GEMINI_API_KEY");
        };

        Ok(Self {
            files: cli.files,
            analysis: AnalysisSettings {
                endpoint: cli.endpoint,
                model: cli.model,
                api_key,
            },
            normalize: NormalizeSettings {
                max_dimension: cli.max_dimension,
                ..NormalizeSettings::default()
            },
            output_dir: cli.out,
            json: cli.json,
        })
    }
}
