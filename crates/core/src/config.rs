use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub scan: ScanConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_store_path")]
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Glob patterns skipped during the walk.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    #[serde(default = "default_max_tags")]
    pub max_tags: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            chat_model: default_chat_model(),
            max_tags: default_max_tags(),
        }
    }
}

fn default_store_path() -> String {
    "metadata.json".to_string()
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_chat_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_max_tags() -> usize {
    5
}

pub fn load(path: Option<&str>) -> anyhow::Result<AppConfig> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}
