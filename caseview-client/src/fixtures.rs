use caseview_fields::text::{display_text, is_truthy};
use caseview_fields::{parse_sections_any, validate_sections, SectionSchema, SummaryCatalog};
use serde_json::Value;
use std::path::Path;

use crate::case_summary::CaseSummaryCatalog;
use crate::config::ClientConfig;
use crate::dashboard::{Activity, InProgressTask, Message};
use crate::error::{ClientError, ClientResult};
use crate::status::SeededTasks;

/// Everything a case page is built from.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub cases: Vec<Value>,
    pub sections: Vec<SectionSchema>,
    pub document_summaries: SummaryCatalog,
    pub case_summaries: CaseSummaryCatalog,
    pub seeded_tasks: Option<SeededTasks>,
    pub activity: Vec<Activity>,
    pub messages: Vec<Message>,
    pub in_progress_tasks: Vec<InProgressTask>,
}

impl Fixtures {
    /// Cases and sections are required. Summary catalogs, seeded tasks and
    /// dashboard feeds degrade to empty with a warning.
    pub fn load(config: &ClientConfig) -> ClientResult<Self> {
        let cases_path = config.fixture_path(&config.cases_file);
        let cases = match read_json(&cases_path)? {
            Value::Array(cases) => cases,
            _ => {
                return Err(ClientError::NotAnArray {
                    path: cases_path.display().to_string(),
                })
            }
        };

        let sections_path = config.fixture_path(&config.sections_file);
        let sections = parse_sections_any(&read_text(&sections_path)?)?;
        validate_sections(&sections)?;

        let document_summaries = optional(
            &config.fixture_path(&config.document_summaries_file),
            |text| SummaryCatalog::from_json(text).map_err(|e| e.to_string()),
        )
        .unwrap_or_default();

        let case_summaries = optional(
            &config.fixture_path(&config.case_summaries_file),
            |text| CaseSummaryCatalog::from_json(text).map_err(|e| e.to_string()),
        )
        .unwrap_or_default();

        let seeded_tasks = config.seeded_tasks_file.as_deref().and_then(|file| {
            optional(&config.fixture_path(file), |text| {
                serde_json::from_str::<SeededTasks>(text).map_err(|e| e.to_string())
            })
        });

        let activity = optional_list(config, &config.activity_file);
        let messages = optional_list(config, &config.messages_file);
        let in_progress_tasks = optional_list(config, &config.tasks_file);

        tracing::debug!(
            cases = cases.len(),
            sections = sections.len(),
            document_summaries = document_summaries.len(),
            "fixtures loaded"
        );

        Ok(Self {
            cases,
            sections,
            document_summaries,
            case_summaries,
            seeded_tasks,
            activity,
            messages,
            in_progress_tasks,
        })
    }

    /// The record whose `CaseID` displays as `case_id`.
    pub fn find_case(&self, case_id: &str) -> Option<&Value> {
        self.cases
            .iter()
            .find(|case| case.get("CaseID").is_some_and(|id| display_text(id) == case_id))
    }
}

/// Display text of a top-level record field; empty when missing or falsy.
pub fn case_text(record: &Value, key: &str) -> String {
    match record.get(key) {
        Some(value) if is_truthy(value) => display_text(value),
        _ => String::new(),
    }
}

fn read_text(path: &Path) -> ClientResult<String> {
    std::fs::read_to_string(path).map_err(|e| ClientError::Read {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn read_json(path: &Path) -> ClientResult<Value> {
    serde_json::from_str(&read_text(path)?).map_err(|e| ClientError::Json {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn optional_list<T: serde::de::DeserializeOwned>(config: &ClientConfig, file: &str) -> Vec<T> {
    optional(&config.fixture_path(file), |text| {
        serde_json::from_str::<Vec<T>>(text).map_err(|e| e.to_string())
    })
    .unwrap_or_default()
}

fn optional<T>(path: &Path, parse: impl FnOnce(&str) -> Result<T, String>) -> Option<T> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "optional fixture unreadable");
            return None;
        }
    };
    match parse(&text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "optional fixture invalid");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_find_case_by_display_text() {
        let fixtures = Fixtures {
            cases: vec![json!({"CaseID": "CASE-1"}), json!({"CaseID": 42}), json!({})],
            ..Fixtures::default()
        };
        assert!(fixtures.find_case("CASE-1").is_some());
        assert!(fixtures.find_case("42").is_some());
        assert!(fixtures.find_case("CASE-9").is_none());
    }

    #[test]
    fn test_case_text() {
        let record = json!({"Title": "Late results", "Status": null, "Count": 0});
        assert_eq!(case_text(&record, "Title"), "Late results");
        assert_eq!(case_text(&record, "Status"), "");
        assert_eq!(case_text(&record, "Count"), "");
        assert_eq!(case_text(&record, "Missing"), "");
    }

    #[test]
    fn test_missing_required_fixture() {
        let config = ClientConfig {
            fixtures_dir: "/nonexistent/caseview".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(Fixtures::load(&config), Err(ClientError::Read { .. })));
    }
}
