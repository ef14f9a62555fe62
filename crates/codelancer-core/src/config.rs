use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use anyhow::{Result, anyhow};

use crate::ai::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::ai::GeminiClient;
use crate::chatbot::Responder;
use crate::faq::FaqList;
use crate::fallback::FallbackResponder;
use crate::forms::FormClient;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const FORMS_URL_ENV: &str = "CODELANCER_FORMS_URL";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base_url: String,
    pub gemini_api_key: Option<String>,
    pub forms_base_url: Option<String>,
    pub faq_path: Option<PathBuf>,
    pub typing_delay_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            gemini_api_key: None,
            forms_base_url: None,
            faq_path: None,
            typing_delay_ms: 1200,
        }
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        let mut config = Self::load_from(&config_path)?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let config_content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| anyhow!("Invalid config file {:?}: {}", path, e))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create config directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Secrets come from the environment, never from disk
        let mut on_disk = self.clone();
        on_disk.gemini_api_key = None;

        let config_content = serde_json::to_string_pretty(&on_disk)?;
        fs::write(path, config_content)?;
        Ok(())
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(FORMS_URL_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, api_key: Option<String>, forms_url: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.gemini_api_key = Some(key);
        }
        if let Some(url) = forms_url.filter(|u| !u.trim().is_empty()) {
            self.forms_base_url = Some(url);
        }
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("codelancer").join("config.json"))
    }

    /// FAQ catalog from `faq_path`, or the built-in one
    pub fn faqs(&self) -> Result<FaqList> {
        match &self.faq_path {
            Some(path) => FaqList::load(path)
                .map_err(|e| anyhow!("Failed to load FAQ catalog {:?}: {}", path, e)),
            None => Ok(FaqList::default()),
        }
    }

    pub fn responder(&self) -> Result<Responder> {
        let fallback = match &self.gemini_api_key {
            Some(key) => {
                let client = GeminiClient::new(key)
                    .with_base_url(&self.api_base_url)
                    .with_model(&self.model);
                FallbackResponder::new(Arc::new(client))
            }
            None => FallbackResponder::disabled(),
        };

        Ok(Responder::new(self.faqs()?, fallback)
            .with_typing_delay(Duration::from_millis(self.typing_delay_ms)))
    }

    pub fn form_client(&self) -> Result<FormClient> {
        self.forms_base_url
            .as_deref()
            .map(FormClient::new)
            .ok_or_else(|| anyhow!("Forms backend not configured. Set {} or forms_base_url", FORMS_URL_ENV))
    }
}
