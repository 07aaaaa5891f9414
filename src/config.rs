//! Configuration management
//!
//! Holds model assignments, the API endpoint, the sheet export URLs, and the
//! session-store location. Persisted as TOML in the platform config
//! directory; first load writes the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Model API endpoint settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Model assignments for the pipeline stages
    #[serde(default)]
    pub models: ModelsConfig,
    /// Published-sheet CSV export URLs for the business profile
    #[serde(default)]
    pub sheets: SheetsConfig,
    /// Session store location
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible chat completions API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    crate::llm::DEFAULT_BASE_URL.to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Model assignments for the pipeline stages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Model for idea generation
    #[serde(default = "default_ideas_model")]
    pub ideas: String,
    /// Model for both calendar assembly stages
    #[serde(default = "default_calendar_model")]
    pub calendar: String,
    /// Model for the post builder
    #[serde(default = "default_post_model")]
    pub post: String,
    /// Model for input summarization
    #[serde(default = "default_summary_model")]
    pub summary: String,
}

fn default_ideas_model() -> String {
    "gpt-4o".to_string()
}

fn default_calendar_model() -> String {
    "gpt-4".to_string()
}

fn default_post_model() -> String {
    "gpt-4".to_string()
}

fn default_summary_model() -> String {
    "gpt-4".to_string()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            ideas: default_ideas_model(),
            calendar: default_calendar_model(),
            post: default_post_model(),
            summary: default_summary_model(),
        }
    }
}

impl ModelsConfig {
    /// Get model for a role name
    pub fn get(&self, role: &str) -> Option<&str> {
        match role.to_lowercase().as_str() {
            "ideas" | "generator" => Some(&self.ideas),
            "calendar" | "schedule" => Some(&self.calendar),
            "post" | "builder" => Some(&self.post),
            "summary" => Some(&self.summary),
            _ => None,
        }
    }

    /// Set model for a role name
    pub fn set(&mut self, role: &str, model: String) -> bool {
        match role.to_lowercase().as_str() {
            "ideas" | "generator" => {
                self.ideas = model;
                true
            }
            "calendar" | "schedule" => {
                self.calendar = model;
                true
            }
            "post" | "builder" => {
                self.post = model;
                true
            }
            "summary" => {
                self.summary = model;
                true
            }
            _ => false,
        }
    }

    /// List all available roles
    pub fn roles() -> &'static [&'static str] {
        &["ideas", "calendar", "post", "summary"]
    }
}

/// CSV export links for the three business-profile tabs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetsConfig {
    #[serde(default)]
    pub primary: String,
    #[serde(default)]
    pub questionnaire: String,
    #[serde(default)]
    pub summaries: String,
}

impl SheetsConfig {
    pub fn set(&mut self, tab: &str, url: String) -> bool {
        match tab.to_lowercase().as_str() {
            "primary" => {
                self.primary = url;
                true
            }
            "questionnaire" => {
                self.questionnaire = url;
                true
            }
            "summaries" => {
                self.summaries = url;
                true
            }
            _ => false,
        }
    }

    pub fn tabs() -> &'static [&'static str] {
        &["primary", "questionnaire", "summaries"]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Session file path; defaults to sessiondata.json in the data directory
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

impl StoreConfig {
    pub fn session_file_path(&self) -> Result<PathBuf> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("sessiondata.json")),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let config_path = config_path()?;

        if config_path.exists() {
            let contents =
                std::fs::read_to_string(&config_path).context("Failed to read config file")?;
            let config: Config =
                toml::from_str(&contents).context("Failed to parse config file")?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = config_path()?;
        let parent = config_path.parent().context("Config path has no parent")?;

        std::fs::create_dir_all(parent).context("Failed to create config directory")?;

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }
}

/// Get the configuration file path
pub fn config_path() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "postplan", "postplan")
        .context("Failed to get project directories")?;
    Ok(base.config_dir().join("config.toml"))
}

/// Get the data directory path
pub fn data_dir() -> Result<PathBuf> {
    let base = directories::ProjectDirs::from("com", "postplan", "postplan")
        .context("Failed to get project directories")?;
    Ok(base.data_dir().to_path_buf())
}

/// Show current configuration
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Model assignments:");
    println!("  ideas:     {}", config.models.ideas);
    println!("  calendar:  {}", config.models.calendar);
    println!("  post:      {}", config.models.post);
    println!("  summary:   {}", config.models.summary);
    println!();
    println!("API base URL: {}", config.api.base_url);
    println!(
        "API key: {}",
        if crate::credentials::has_api_key() {
            "configured"
        } else {
            "NOT SET"
        }
    );
    println!();
    println!("Sheet URLs:");
    for tab in SheetsConfig::tabs() {
        let url = match *tab {
            "primary" => &config.sheets.primary,
            "questionnaire" => &config.sheets.questionnaire,
            _ => &config.sheets.summaries,
        };
        println!(
            "  {:<14} {}",
            format!("{}:", tab),
            if url.is_empty() { "(not set)" } else { url }
        );
    }
    println!();
    println!(
        "Session file: {}",
        config.store.session_file_path()?.display()
    );

    Ok(())
}

/// Set API key
pub fn set_api_key(key: &str) -> Result<()> {
    crate::credentials::set_api_key(key)?;
    println!("API key stored securely.");
    Ok(())
}

/// Set model for a specific role
pub fn set_model(role: &str, model: &str) -> Result<()> {
    let mut config = Config::load()?;

    if !config.models.set(role, model.to_string()) {
        anyhow::bail!(
            "Unknown role '{}'. Available roles: {}",
            role,
            ModelsConfig::roles().join(", ")
        );
    }

    config.save()?;
    println!("Model for '{}' set to: {}", role, model);
    Ok(())
}

/// Get model for a specific role
pub fn get_model(role: &str) -> Result<()> {
    let config = Config::load()?;

    match config.models.get(role) {
        Some(model) => println!("Model for '{}': {}", role, model),
        None => anyhow::bail!(
            "Unknown role '{}'. Available roles: {}",
            role,
            ModelsConfig::roles().join(", ")
        ),
    }

    Ok(())
}

/// List all model assignments
pub fn list_models() -> Result<()> {
    let config = Config::load()?;

    println!("Model assignments:");
    for role in ModelsConfig::roles() {
        if let Some(model) = config.models.get(role) {
            println!("  {:<10} {}", role, model);
        }
    }

    Ok(())
}

/// Set the CSV export URL for a business-profile tab
pub fn set_sheet_url(tab: &str, url: &str) -> Result<()> {
    let mut config = Config::load()?;

    if !config.sheets.set(tab, url.to_string()) {
        anyhow::bail!(
            "Unknown sheet tab '{}'. Available tabs: {}",
            tab,
            SheetsConfig::tabs().join(", ")
        );
    }

    config.save()?;
    println!("Sheet URL for '{}' updated.", tab);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.models.ideas, "gpt-4o");
        assert_eq!(config.models.calendar, "gpt-4");
        assert_eq!(config.api.base_url, crate::llm::DEFAULT_BASE_URL);
        assert!(config.sheets.primary.is_empty());
    }

    #[test]
    fn test_model_roles() {
        let mut models = ModelsConfig::default();
        assert!(models.set("calendar", "gpt-4o".into()));
        assert_eq!(models.get("schedule"), Some("gpt-4o"));
        assert!(!models.set("unknown", "x".into()));
        assert_eq!(models.get("unknown"), None);
    }

    #[test]
    fn test_sparse_toml_fills_defaults() {
        let config: Config = toml::from_str("[models]\nideas = \"gpt-5\"\n").unwrap();
        assert_eq!(config.models.ideas, "gpt-5");
        assert_eq!(config.models.calendar, "gpt-4");
        assert_eq!(config.api.base_url, crate::llm::DEFAULT_BASE_URL);
    }

    #[test]
    fn test_session_file_override() {
        let store = StoreConfig {
            session_file: Some(PathBuf::from("/tmp/custom.json")),
        };
        assert_eq!(
            store.session_file_path().unwrap(),
            PathBuf::from("/tmp/custom.json")
        );
    }

    #[test]
    fn test_sheet_tabs() {
        let mut sheets = SheetsConfig::default();
        assert!(sheets.set("Primary", "https://example.com/pub?output=csv".into()));
        assert!(!sheets.set("other", "x".into()));
        assert!(!sheets.primary.is_empty());
    }
}
