use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://civwiki.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "civlist/0.1 (+https://civwiki.org)";
pub const DEFAULT_LIVE_CATEGORY: &str = "Live Servers";
pub const DEFAULT_INACTIVE_CATEGORY: &str = "Live Servers (Inactive)";
pub const DEFAULT_REPORT_TITLE: &str = "List of Civ Servers ordered by page edits";
pub const DEFAULT_EXCLUSIONS: &str = "Civtoria3,Important non-civ servers,Template:Infobox server,List of civ servers in development";

/// Optional `[wiki]` TOML file holding the endpoint settings that rarely
/// change between runs. Environment variables always win over the file.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct WikiConfig {
    #[serde(default)]
    pub wiki: WikiSection,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct WikiSection {
    pub api_url: Option<String>,
    pub user_agent: Option<String>,
}

impl WikiConfig {
    /// Resolve the wiki API URL: env WIKI_API_URL > config > CivWiki default.
    pub fn api_url(&self) -> String {
        if let Ok(value) = env::var("WIKI_API_URL") {
            let trimmed = value.trim().to_string();
            if !trimmed.is_empty() {
                return trimmed;
            }
        }
        self.wiki
            .api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Resolve user agent: env WIKI_USER_AGENT > config > DEFAULT_USER_AGENT.
    pub fn user_agent(&self) -> String {
        if let Ok(value) = env::var("WIKI_USER_AGENT") {
            let trimmed = value.trim().to_string();
            if !trimmed.is_empty() {
                return trimmed;
            }
        }
        self.wiki
            .user_agent
            .clone()
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string())
    }
}

/// Load and parse a WikiConfig from a TOML file. Returns default if file doesn't exist.
pub fn load_config(config_path: &Path) -> Result<WikiConfig> {
    if !config_path.exists() {
        return Ok(WikiConfig::default());
    }
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("failed to read {}", config_path.display()))?;
    let parsed: WikiConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse {}", config_path.display()))?;
    Ok(parsed)
}

/// Environment-driven run surface. Every field carries the defaults the
/// listing has always been maintained with.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub days_cutoff: u64,
    pub minimum_edits: u64,
    pub live_category: String,
    pub inactive_category: String,
    pub exclusions: Vec<String>,
    pub should_edit_pages: bool,
    pub report_title: String,
}

impl RunConfig {
    pub fn from_env() -> Self {
        Self {
            days_cutoff: env_value_u64("DAYS_CUTOFF", 30),
            minimum_edits: env_value_u64("MINIMUM_EDITS_TO_BE_ACTIVE", 1),
            live_category: env_value("LIVE_SERVERS_CATEGORY", DEFAULT_LIVE_CATEGORY),
            inactive_category: env_value(
                "INACTIVE_LIVE_SERVERS_CATEGORY",
                DEFAULT_INACTIVE_CATEGORY,
            ),
            exclusions: parse_exclusions(&env_value("EXCLUSIONS", DEFAULT_EXCLUSIONS)),
            should_edit_pages: parse_bool(&env_value("SHOULD_EDIT_PAGES", "true")),
            report_title: env_value("REPORT_PAGE_TITLE", DEFAULT_REPORT_TITLE),
        }
    }

    pub fn is_excluded(&self, title: &str) -> bool {
        self.exclusions.iter().any(|name| name == title)
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// CIVLIST_USERNAME/CIVLIST_PASSWORD, falling back to the legacy bare
    /// USERNAME/PASSWORD names. Absence is fatal before any network call.
    pub fn from_env() -> Result<Self> {
        let username = first_env(&["CIVLIST_USERNAME", "USERNAME"]);
        let password = first_env(&["CIVLIST_PASSWORD", "PASSWORD"]);
        match (username, password) {
            (Some(username), Some(password)) => Ok(Self { username, password }),
            _ => bail!(
                "wiki credentials are not configured (set CIVLIST_USERNAME and CIVLIST_PASSWORD)"
            ),
        }
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    })
}

pub fn parse_exclusions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Matches the legacy parsing: anything other than "true" is false.
pub fn parse_bool(raw: &str) -> bool {
    raw.trim().eq_ignore_ascii_case("true")
}

pub(crate) fn env_value(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub(crate) fn env_value_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub(crate) fn env_value_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<usize>().ok())
        .unwrap_or(default)
}
