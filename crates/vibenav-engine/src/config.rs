use std::path::PathBuf;
use std::time::Duration;

use vibenav_contracts::models::{ModelSelector, ModelTier};
use vibenav_contracts::prompt::DEFAULT_OUTPUT_LANGUAGE;

use crate::credentials::non_empty_env;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GENERATION_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_PROBE_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_CREDENTIAL_SOURCE: &str = "user";
pub const STRUCTURED_CAPABILITY: &str = "structured";

const DEFAULT_TIMEOUT_S: f64 = 120.0;
const MIN_TIMEOUT_S: f64 = 15.0;
const MAX_TIMEOUT_S: f64 = 600.0;

/// Runtime settings, resolved once before the first call.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub api_base: String,
    pub generation_model: String,
    pub probe_model: String,
    pub request_timeout: Duration,
    pub vault_path: PathBuf,
    pub credential_source: String,
    pub host_credential_file: Option<PathBuf>,
    pub output_language: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(non_empty_env)
    }

    /// Resolves every field through `lookup`, which returns trimmed,
    /// non-empty values only.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let selector = ModelSelector::default();
        let api_base = lookup("GEMINI_API_BASE")
            .map(|value| value.trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Self {
            api_base,
            generation_model: resolve_model(
                &selector,
                lookup("VIBENAV_MODEL"),
                ModelTier::Pro,
                DEFAULT_GENERATION_MODEL,
            ),
            probe_model: resolve_model(
                &selector,
                lookup("VIBENAV_PROBE_MODEL"),
                ModelTier::Flash,
                DEFAULT_PROBE_MODEL,
            ),
            request_timeout: timeout_from(lookup("VIBENAV_REQUEST_TIMEOUT").as_deref()),
            vault_path: lookup("VIBENAV_VAULT")
                .map(PathBuf::from)
                .unwrap_or_else(|| default_vault_path(lookup("HOME"))),
            credential_source: lookup("VIBENAV_CREDENTIAL_SOURCE")
                .map(|value| value.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_CREDENTIAL_SOURCE.to_string()),
            host_credential_file: lookup("VIBENAV_HOST_CREDENTIAL_FILE").map(PathBuf::from),
            output_language: lookup("VIBENAV_LANGUAGE")
                .unwrap_or_else(|| DEFAULT_OUTPUT_LANGUAGE.to_string()),
        }
    }

    pub fn with_generation_model(mut self, model: impl Into<String>) -> Self {
        self.generation_model = model.into();
        self
    }
}

fn resolve_model(
    selector: &ModelSelector,
    requested: Option<String>,
    tier: ModelTier,
    fallback: &str,
) -> String {
    match selector.resolve(requested.as_deref(), STRUCTURED_CAPABILITY, tier) {
        Ok(selection) => {
            if let Some(note) = selection.note.as_deref() {
                tracing::warn!(model = %selection.name, note, "model selection fallback");
            }
            selection.name
        }
        Err(reason) => {
            tracing::warn!(%reason, fallback, "no registered model, using built-in default");
            fallback.to_string()
        }
    }
}

fn timeout_from(raw: Option<&str>) -> Duration {
    let seconds = raw
        .and_then(|value| value.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(DEFAULT_TIMEOUT_S)
        .clamp(MIN_TIMEOUT_S, MAX_TIMEOUT_S);
    Duration::from_secs_f64(seconds)
}

fn default_vault_path(home: Option<String>) -> PathBuf {
    home.map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vibenav")
        .join("vault.json")
}
