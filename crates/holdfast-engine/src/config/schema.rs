use holdfast_common::locator::Strategy;
use holdfast_common::roles::RoleAliasTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldfastConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub executor: ExecutorConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub scenario: ScenarioConfig,
    #[serde(default)]
    pub roles: RolesConfig,
    /// Replacement candidate lists, keyed by field name.
    #[serde(default)]
    pub fields: HashMap<String, Vec<Strategy>>,
}

impl Default for HoldfastConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            executor: ExecutorConfig::default(),
            artifacts: ArtifactsConfig::default(),
            browser: BrowserConfig::default(),
            scenario: ScenarioConfig::default(),
            roles: RolesConfig::default(),
            fields: HashMap::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://enterprise02.speechpundit.com".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Bound on resolving one candidate, not the whole intent.
    #[serde(default = "default_candidate_timeout_ms")]
    pub candidate_timeout_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_verify_timeout_ms")]
    pub verify_timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            candidate_timeout_ms: default_candidate_timeout_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            verify_timeout_ms: default_verify_timeout_ms(),
        }
    }
}

impl ExecutorConfig {
    pub fn candidate_timeout(&self) -> Duration {
        Duration::from_millis(self.candidate_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn verify_timeout(&self) -> Duration {
        Duration::from_millis(self.verify_timeout_ms)
    }
}

fn default_candidate_timeout_ms() -> u64 {
    5000
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_verify_timeout_ms() -> u64 {
    3000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_artifact_dir")]
    pub dir: PathBuf,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_artifact_dir(),
        }
    }
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("test-results")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl std::str::FromStr for BrowserKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chromium" | "chrome" => Ok(Self::Chromium),
            "firefox" => Ok(Self::Firefox),
            "webkit" | "safari" => Ok(Self::Webkit),
            other => Err(format!("unknown browser: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    #[serde(default)]
    pub kind: BrowserKind,
    #[serde(default = "default_headless")]
    pub headless: bool,
    /// WebDriver endpoint for firefox/webkit runs.
    #[serde(default)]
    pub webdriver_url: Option<String>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::default(),
            headless: default_headless(),
            webdriver_url: None,
            viewport: Viewport::default(),
        }
    }
}

fn default_headless() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_scenario_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_scenario_timeout_ms(),
        }
    }
}

impl ScenarioConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn default_scenario_timeout_ms() -> u64 {
    180000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RolesConfig {
    /// Merged over the built-in table; entries here win.
    #[serde(default = "RoleAliasTable::empty")]
    pub aliases: RoleAliasTable,
}

impl Default for RolesConfig {
    fn default() -> Self {
        Self {
            aliases: RoleAliasTable::empty(),
        }
    }
}

impl RolesConfig {
    pub fn table(&self) -> RoleAliasTable {
        let mut table = RoleAliasTable::default();
        table.merge(&self.aliases);
        table
    }
}
