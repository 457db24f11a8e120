use caseview_fields::html::escape_html;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Write;

use crate::loader::LoadState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseMetrics {
    pub data_quality: f64,
    pub ai_confidence: f64,
    pub risk_level: String,
}

/// Generated overview for one case type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseSummary {
    pub summary: String,
    pub metrics: CaseMetrics,
}

impl CaseMetrics {
    /// Tag colour for the risk level.
    pub fn risk_colour(&self) -> &'static str {
        match self.risk_level.as_str() {
            "High" => "red",
            "Medium" => "orange",
            _ => "green",
        }
    }
}

/// Case type → summary, loaded from `{ "<case type>": CaseSummary }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseSummaryCatalog {
    entries: HashMap<String, CaseSummary>,
}

impl CaseSummaryCatalog {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn insert(&mut self, case_type: impl Into<String>, summary: CaseSummary) {
        self.entries.insert(case_type.into(), summary);
    }

    pub fn get(&self, case_type: &str) -> Option<&CaseSummary> {
        self.entries.get(case_type)
    }
}

fn percent(value: Option<f64>) -> String {
    value.map(|v| format!("{}%", v)).unwrap_or_else(|| "%".to_string())
}

/// Summary tile: skeleton placeholders while loading, metrics once ready.
pub fn case_summary_tile(state: &LoadState<Option<CaseSummary>>, out: &mut String) -> std::fmt::Result {
    write!(out, "<aside class=\"cv-tile\" aria-label=\"AI generated summary\">")?;
    match state {
        LoadState::Ready(summary) => {
            let summary = summary.as_ref();
            let metrics = summary.map(|s| &s.metrics);
            write!(out, "<h3>Case summary</h3>")?;
            write!(
                out,
                "<p class=\"cv-tile-text\">{}</p>",
                escape_html(summary.map(|s| s.summary.as_str()).unwrap_or(""))
            )?;
            write!(out, "<div class=\"cv-metrics\">")?;
            write!(
                out,
                "<div><div class=\"cv-metric-label\">Information completedness</div><div class=\"cv-metric\">{}</div></div>",
                percent(metrics.map(|m| m.data_quality))
            )?;
            write!(
                out,
                "<div><div class=\"cv-metric-label\">AI confidence</div><div class=\"cv-metric\">{}</div></div>",
                percent(metrics.map(|m| m.ai_confidence))
            )?;
            write!(
                out,
                "<div><div class=\"cv-metric-label\">Risk level</div><span class=\"cv-tag cv-tag-{}\">{}</span></div>",
                metrics.map(|m| m.risk_colour()).unwrap_or("green"),
                escape_html(metrics.map(|m| m.risk_level.as_str()).unwrap_or(""))
            )?;
            write!(out, "</div>")?;
        }
        LoadState::Idle | LoadState::Loading => {
            write!(out, "<span class=\"cv-skeleton cv-skeleton-heading\"></span>")?;
            for _ in 0..3 {
                write!(out, "<span class=\"cv-skeleton cv-skeleton-line\"></span>")?;
            }
            write!(out, "<div class=\"cv-metrics\" aria-busy=\"true\">")?;
            for _ in 0..3 {
                write!(out, "<div><span class=\"cv-skeleton\"></span><span class=\"cv-skeleton-block\"></span></div>")?;
            }
            write!(out, "</div>")?;
        }
    }
    write!(out, "</aside>")
}
