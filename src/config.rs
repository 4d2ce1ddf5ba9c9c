use crate::core::FieldOrder;
use crate::models::{MatchWeights, ProfileField};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub catalog: CatalogSettings,
    pub explainer: ExplainerSettings,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSettings {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExplainerSettings {
    pub base_url: String,
    pub api_key: String,
    #[serde(default = "default_explainer_model")]
    pub model: String,
    #[serde(default = "default_explainer_timeout")]
    pub timeout_secs: u64,
}

fn default_explainer_model() -> String {
    "gpt-4".to_string()
}
fn default_explainer_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_max_sessions")]
    pub max_sessions: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_secs: default_session_ttl(),
            max_sessions: default_max_sessions(),
        }
    }
}

fn default_session_ttl() -> u64 {
    1800
}
fn default_max_sessions() -> u64 {
    10_000
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Tolerance factor on the budget ceiling admitting near-budget rows.
    #[serde(default = "default_slack_multiplier")]
    pub slack_multiplier: f64,
    /// Ceiling used when the budget answer is absent or unparsable.
    #[serde(default = "default_budget_ceiling")]
    pub default_budget_ceiling: f64,
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    /// Locked-field count at which collection stops asking. Defaults to
    /// the full field count.
    pub completion_threshold: Option<usize>,
    /// "sequence" or "weighted".
    #[serde(default = "default_field_order")]
    pub field_order: String,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            slack_multiplier: default_slack_multiplier(),
            default_budget_ceiling: default_budget_ceiling(),
            default_top_n: default_top_n(),
            completion_threshold: None,
            field_order: default_field_order(),
        }
    }
}

impl MatchingSettings {
    pub fn field_order(&self) -> FieldOrder {
        FieldOrder::parse(&self.field_order).unwrap_or_else(|| {
            tracing::warn!(
                "Unknown field_order '{}', falling back to sequence",
                self.field_order
            );
            FieldOrder::Sequence
        })
    }

    pub fn completion_threshold(&self) -> usize {
        self.completion_threshold
            .unwrap_or(ProfileField::ALL.len())
    }
}

fn default_slack_multiplier() -> f64 {
    1.2
}
fn default_budget_ceiling() -> f64 {
    45_000.0
}
fn default_top_n() -> usize {
    3
}
fn default_field_order() -> String {
    "sequence".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    /// Per-field weight overrides keyed by display name, e.g.
    /// `"Budget" = 1.5`. Unset fields keep the canonical defaults.
    #[serde(default)]
    pub weights: HashMap<String, f64>,
}

impl ScoringSettings {
    pub fn build_weights(&self) -> MatchWeights {
        MatchWeights::default().with_overrides(&self.weights)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with ADVISOR_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., ADVISOR__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("ADVISOR")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Fold well-known bare environment variables into the config so local
/// setups don't need the full ADVISOR__ prefix for secrets.
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let api_key = env::var("OPENAI_API_KEY")
        .or_else(|_| env::var("ADVISOR__EXPLAINER__API_KEY"))
        .ok();
    let catalog_path = env::var("VEHICLE_CATALOG_PATH").ok();

    let mut builder = Config::builder().add_source(settings);

    if let Some(api_key) = api_key {
        builder = builder.set_override("explainer.api_key", api_key)?;
    }
    if let Some(path) = catalog_path {
        builder = builder.set_override("catalog.path", path)?;
    }

    builder.build()
}
