use serde::Deserialize;
use std::path::PathBuf;

/// Root application configuration. Loaded from an optional `marketing-mix.toml`
/// and from environment variables with the prefix `MARKETING_MIX__`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_n_weeks")]
    pub n_weeks: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_charts_dir")]
    pub charts_dir: PathBuf,
}

// Default functions
fn default_seed() -> u64 {
    42
}
fn default_n_weeks() -> usize {
    156
}
fn default_data_path() -> PathBuf {
    PathBuf::from("marketing_mix_data.csv")
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}
fn default_charts_dir() -> PathBuf {
    PathBuf::from("plots")
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            n_weeks: default_n_weeks(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            results_dir: default_results_dir(),
            charts_dir: default_charts_dir(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables and optional config file.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("marketing-mix").required(false))
            .add_source(
                config::Environment::with_prefix("MARKETING_MIX")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;
        config.try_deserialize()
    }
}
