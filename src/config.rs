use crate::cli::GlobalOptions;
use crate::error::{Error, Result};
use crate::tui::theme::Theme;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_API_BASE: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const DEFAULT_LANGUAGE: &str = "en";

/// Settings for the completion service client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub api_base: String,
    pub model: String,
    pub languages: Vec<String>,
    pub timeout: Option<Duration>,
    pub theme: Theme,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_options(options: &GlobalOptions) -> Self {
        Self {
            api_key: options
                .api_key
                .as_deref()
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(str::to_string),
            api_base: options.api_base.trim_end_matches('/').to_string(),
            model: options.model.clone(),
            languages: parse_languages(&options.languages),
            timeout: (options.timeout_secs > 0).then(|| Duration::from_secs(options.timeout_secs)),
            theme: options.theme,
            log_file: options.log_file.clone(),
        }
    }

    /// The completion client needs a key; transcript downloads do not.
    pub fn completion(&self) -> Result<CompletionConfig> {
        let api_key = self.api_key.clone().ok_or(Error::MissingApiKey {
            env_var: API_KEY_ENV,
        })?;

        Ok(CompletionConfig {
            api_key,
            api_base: self.api_base.clone(),
            model: self.model.clone(),
        })
    }
}

fn parse_languages(raw: &str) -> Vec<String> {
    let languages: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(str::to_string)
        .collect();

    if languages.is_empty() {
        vec![DEFAULT_LANGUAGE.to_string()]
    } else {
        languages
    }
}
