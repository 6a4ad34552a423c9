use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

const DEFAULT_SEARCH_URL: &str = "https://www.bing.com/news/search";
const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/110.0.0.0 Safari/537.36";
const DEFAULT_MAX_ARTICLES: usize = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Config {
    pub search_url: String,
    pub tts_url: String,
    pub user_agent: String,
    pub max_articles: usize,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_url: DEFAULT_SEARCH_URL.to_string(),
            tts_url: DEFAULT_TTS_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_articles: DEFAULT_MAX_ARTICLES,
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Every key is optional.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_articles = match lookup("NEWS_MAX_ARTICLES") {
            Some(raw) => {
                let value: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("NEWS_MAX_ARTICLES must be a number, got '{}'", raw))?;
                if value == 0 {
                    anyhow::bail!("NEWS_MAX_ARTICLES must be at least 1");
                }
                value
            }
            None => defaults.max_articles,
        };

        let http_timeout = match lookup("NEWS_HTTP_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(raw.trim().parse().with_context(|| {
                format!("NEWS_HTTP_TIMEOUT_SECS must be a number of seconds, got '{}'", raw)
            })?),
            None => defaults.http_timeout,
        };

        Ok(Self {
            search_url: lookup("NEWS_SEARCH_URL").unwrap_or(defaults.search_url),
            tts_url: lookup("NEWS_TTS_URL").unwrap_or(defaults.tts_url),
            user_agent: lookup("NEWS_USER_AGENT").unwrap_or(defaults.user_agent),
            max_articles,
            http_timeout,
        })
    }

    fn try_load_dotenv() {
        // Try locations in order of preference:

        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/company-news/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("company-news").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - defaults cover every setting
    }
}
