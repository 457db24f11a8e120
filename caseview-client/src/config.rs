use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::dashboard::CurrentUser;
use crate::error::{ClientError, ClientResult};

/// Overrides `summary_delay_ms` when set.
pub const SUMMARY_DELAY_ENV: &str = "CASEVIEW_SUMMARY_DELAY_MS";

const DEFAULT_SUMMARY_DELAY_MS: u64 = 1500;
const DEFAULT_NOTIFICATION_TIMEOUT_MS: u64 = 4000;

/// Viewer configuration, loaded from YAML. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Directory the fixture file names below are relative to.
    pub fixtures_dir: PathBuf,
    pub cases_file: String,
    pub sections_file: String,
    pub document_summaries_file: String,
    pub case_summaries_file: String,
    /// Optional seeded task statuses; skipped when the file is absent.
    pub seeded_tasks_file: Option<String>,
    /// Dashboard feeds; each is optional and empty when unreadable.
    pub activity_file: String,
    pub messages_file: String,
    pub tasks_file: String,
    /// Whose dashboard is shown.
    pub current_user: CurrentUser,
    /// Simulated enrichment latency.
    pub summary_delay_ms: u64,
    pub notification_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("fixtures"),
            cases_file: "cases.json".to_string(),
            sections_file: "case-sections.yaml".to_string(),
            document_summaries_file: "ai-document-summaries.json".to_string(),
            case_summaries_file: "ai-case-summaries.json".to_string(),
            seeded_tasks_file: None,
            activity_file: "dashboard-activity.json".to_string(),
            messages_file: "messages-data.json".to_string(),
            tasks_file: "dashboard-tasks-data.json".to_string(),
            current_user: CurrentUser::default(),
            summary_delay_ms: DEFAULT_SUMMARY_DELAY_MS,
            notification_timeout_ms: DEFAULT_NOTIFICATION_TIMEOUT_MS,
        }
    }
}

impl ClientConfig {
    pub fn from_yaml(yaml: &str) -> ClientResult<Self> {
        let config: ClientConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, resolving a relative `fixturesDir` against the
    /// file's own directory. Applies the environment override.
    pub fn load(path: &Path) -> ClientResult<Self> {
        let yaml = std::fs::read_to_string(path).map_err(|e| ClientError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let mut config = Self::from_yaml(&yaml)?;
        if config.fixtures_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.fixtures_dir = parent.join(&config.fixtures_dir);
            }
        }
        config.apply_env()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Apply `CASEVIEW_SUMMARY_DELAY_MS` if present.
    pub fn apply_env(&mut self) -> ClientResult<()> {
        if let Ok(raw) = std::env::var(SUMMARY_DELAY_ENV) {
            self.summary_delay_ms = raw.trim().parse().map_err(|_| {
                ClientError::Config(format!("{} must be a whole number of milliseconds, got '{}'", SUMMARY_DELAY_ENV, raw))
            })?;
        }
        Ok(())
    }

    fn validate(&self) -> ClientResult<()> {
        for (name, value) in [
            ("casesFile", &self.cases_file),
            ("sectionsFile", &self.sections_file),
            ("documentSummariesFile", &self.document_summaries_file),
            ("caseSummariesFile", &self.case_summaries_file),
        ] {
            if value.trim().is_empty() {
                return Err(ClientError::Config(format!("'{}' must not be empty", name)));
            }
        }
        if self.notification_timeout_ms == 0 {
            return Err(ClientError::Config(
                "'notificationTimeoutMs' must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fixture_path(&self, file: &str) -> PathBuf {
        self.fixtures_dir.join(file)
    }

    pub fn summary_delay(&self) -> Duration {
        Duration::from_millis(self.summary_delay_ms)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }
}
