use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Report with indented expressions.
    Text,
    /// Report with box-drawing expression trees.
    Tree,
    /// One JSON document per query.
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_sorted_output")]
    pub sorted_output: bool,
}

fn default_format() -> OutputFormat {
    OutputFormat::Text
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sorted_output() -> bool {
    true
}

impl Settings {
    /// Layers the optional settings file (`path`, else `TRIBUTARY_CONFIG_PATH`,
    /// else `crates/tributary/config/default.toml`) under `TRIBUTARY__*`
    /// environment overrides.
    pub fn new(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let config_file_path = match path {
            Some(path) => path.to_string(),
            None => std::env::var("TRIBUTARY_CONFIG_PATH")
                .unwrap_or_else(|_| "crates/tributary/config/default.toml".to_string()),
        };

        let s = config::Config::builder()
            .add_source(config::File::with_name(&config_file_path).required(path.is_some()))
            .add_source(
                config::Environment::with_prefix("TRIBUTARY")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;
        s.try_deserialize()
    }
}
