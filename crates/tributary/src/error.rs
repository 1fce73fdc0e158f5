use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Failed to load configuration")]
    Config(#[from] config::ConfigError),

    #[error("Lineage analysis failed: {0}")]
    Analysis(#[from] tributary_common::Error),

    #[error("Failed to encode report as JSON")]
    Json(#[from] serde_json::Error),

    #[error("Unknown demo query: {0}")]
    UnknownQuery(String),
}
