use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Top-level application settings.
///
/// Loaded from an optional `config/default.toml` file, then overridden by
/// `PMPREP_`-prefixed environment variables (`__` as section separator,
/// e.g. `PMPREP_MONGODB__URI`).
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub mongodb: MongoSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub transcription: TranscriptionSettings,
    pub evaluation: EvaluationSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Directory where submitted audio recordings are stored.
    pub upload_dir: String,
}

/// Speech-to-text service (OpenAI-compatible transcriptions endpoint).
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request timeout in seconds; a timeout counts as an adapter failure.
    pub timeout_secs: u64,
}

/// Answer-scoring service (Anthropic messages endpoint).
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("mongodb.uri", "mongodb://localhost:27017")?
            .set_default("mongodb.database", "pmprep")?
            .set_default("auth.jwt_secret", "change-me")?
            .set_default("auth.token_ttl_secs", 60 * 60 * 24)?
            .set_default("storage.upload_dir", "uploads/audio")?
            .set_default("transcription.base_url", "https://api.openai.com")?
            .set_default("transcription.api_key", "")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.timeout_secs", 60)?
            .set_default("evaluation.base_url", "https://api.anthropic.com")?
            .set_default("evaluation.api_key", "")?
            .set_default("evaluation.model", "claude-3-5-sonnet-20241022")?
            .set_default("evaluation.max_tokens", 1024)?
            .set_default("evaluation.timeout_secs", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("PMPREP").separator("__"))
            .build()?
            .try_deserialize()
    }
}
