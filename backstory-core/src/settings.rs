//! World-scoped settings for the backstory generator.
//!
//! Settings live in a TOML file and may be overridden from the environment.
//! A missing file is not an error: every key has a default, and an unset
//! value simply resolves to empty where it is used.

use crate::traits::{FieldMapping, GenrePreset, LogicalField};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, warn};

/// Namespace all settings keys live under.
pub const NAMESPACE: &str = "backstory-generator";

/// Default API root for chat completions.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Models offered by default, with a short description.
pub const KNOWN_MODELS: &[(&str, &str)] = &[
    ("gpt-3.5-turbo", "gpt-3.5-turbo (Fast, Low Cost)"),
    ("gpt-4o-mini", "gpt-4o-mini (Faster GPT-4, Recommended)"),
    (
        "gpt-4.1-nano",
        "gpt-4.1 (Fastest, most cost-effective GPT-4.1 model)",
    ),
];

/// Errors from loading or saving settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid settings file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// All configurable values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Personal OpenAI API key.
    pub openai_key: String,

    /// Model identifier sent with every request.
    pub openai_model: String,

    /// API root, overridable for proxies and tests.
    pub api_base: String,

    /// Show the quick-start guide on startup.
    pub show_welcome_message: bool,

    /// Genre preselected in the form.
    pub genre_preset: GenrePreset,

    /// World or regional lore shared by every backstory.
    pub world_context: String,

    /// Where each character field lives in the actor document.
    pub paths: FieldMapping,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_key: String::new(),
            openai_model: KNOWN_MODELS[0].0.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            show_welcome_message: true,
            genre_preset: GenrePreset::default(),
            world_context: String::new(),
            paths: FieldMapping::default(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults if it does not exist.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no settings file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        let settings = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write settings to a TOML file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        fs::write(path, self.to_toml()?).await?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: Self = toml::from_str(content)?;
        if !settings.is_known_model() {
            warn!(model = %settings.openai_model, "model is not one of the known choices");
        }
        Ok(settings)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Override the key and model from `OPENAI_API_KEY` / `OPENAI_MODEL`.
    pub fn apply_env(self) -> Self {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Override values from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(key) = var("OPENAI_API_KEY") {
            self.openai_key = key;
        }
        if let Some(model) = var("OPENAI_MODEL") {
            self.openai_model = model;
        }
        self
    }

    pub fn is_known_model(&self) -> bool {
        KNOWN_MODELS.iter().any(|(id, _)| *id == self.openai_model)
    }

    /// Read a setting by namespace and key, in string form.
    ///
    /// Keys follow the module's naming: `openaiKey`, `openaiModel`,
    /// `showWelcomeMessage`, `genrePreset`, `worldContext` and
    /// `path.<field>`.
    pub fn get(&self, namespace: &str, key: &str) -> Option<String> {
        if namespace != NAMESPACE {
            return None;
        }
        let value = match key {
            "openaiKey" => self.openai_key.clone(),
            "openaiModel" => self.openai_model.clone(),
            "apiBase" => self.api_base.clone(),
            "showWelcomeMessage" => self.show_welcome_message.to_string(),
            "genrePreset" => self.genre_preset.key().to_string(),
            "worldContext" => self.world_context.clone(),
            other => {
                let field = LogicalField::from_setting_key(other.strip_prefix("path.")?)?;
                self.paths.path(field).to_string()
            }
        };
        Some(value)
    }

    /// A copy safe to print: the API key is masked.
    pub fn redacted(&self) -> Self {
        Self {
            openai_key: mask_key(&self.openai_key),
            ..self.clone()
        }
    }
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.is_empty() {
        return String::new();
    }
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
