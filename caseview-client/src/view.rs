use caseview_fields::{render_sections, RenderedSection, SectionSchema};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::case_summary::CaseSummary;
use crate::enrichment::EnrichmentSource;
use crate::fixtures::case_text;
use crate::loader::{DelayedLoad, LoadState};
use crate::page::{render_case_page, render_not_found, PageState};

/// One open case page: its rendered sections plus the two enrichment loads.
///
/// Opening another case restarts both loads, so answers for the previous
/// case never reach the new one.
pub struct CaseView {
    source: Arc<dyn EnrichmentSource>,
    sections: Vec<SectionSchema>,
    case: Option<Value>,
    rendered: Vec<RenderedSection>,
    documents: DelayedLoad<HashMap<String, String>>,
    summary: DelayedLoad<Option<CaseSummary>>,
}

impl CaseView {
    pub fn new(source: Arc<dyn EnrichmentSource>, sections: Vec<SectionSchema>) -> Self {
        Self {
            source,
            sections,
            case: None,
            rendered: Vec::new(),
            documents: DelayedLoad::new("document-summaries"),
            summary: DelayedLoad::new("case-summary"),
        }
    }

    /// Show `case`, or the not-found page for `None`. Must be called from
    /// within a tokio runtime.
    pub fn open(&mut self, case: Option<Value>) {
        let Some(case) = case else {
            self.close();
            return;
        };

        self.rendered = render_sections(&self.sections, Some(&case));
        let names = document_names(&self.rendered);
        if names.is_empty() {
            self.documents.cancel();
        } else {
            let source = Arc::clone(&self.source);
            self.documents
                .start(async move { source.document_summaries(names).await });
        }

        let case_type = case_text(&case, "CaseType");
        let source = Arc::clone(&self.source);
        self.summary
            .start(async move { source.case_summary(case_type).await });

        tracing::debug!(case_id = %case_text(&case, "CaseID"), sections = self.rendered.len(), "case opened");
        self.case = Some(case);
    }

    /// Drop the case and cancel anything still loading.
    pub fn close(&mut self) {
        self.documents.cancel();
        self.summary.cancel();
        self.rendered.clear();
        self.case = None;
    }

    pub fn case(&self) -> Option<&Value> {
        self.case.as_ref()
    }

    pub fn document_state(&self) -> LoadState<HashMap<String, String>> {
        self.documents.snapshot()
    }

    pub fn summary_state(&self) -> LoadState<Option<CaseSummary>> {
        self.summary.snapshot()
    }

    /// Wait for both loads of the current case to settle.
    pub async fn wait_ready(&self) {
        if self.documents.snapshot().is_loading() {
            self.documents.wait().await;
        }
        if self.summary.snapshot().is_loading() {
            self.summary.wait().await;
        }
    }

    /// Rendered sections with document summaries applied when ready.
    pub fn sections(&self) -> Vec<RenderedSection> {
        let mut sections = self.rendered.clone();
        if let LoadState::Ready(summaries) = self.documents.snapshot() {
            for section in &mut sections {
                section.apply_summaries(&summaries);
            }
        }
        sections
    }

    pub fn to_html(&self, requested_id: &str, status: &str) -> String {
        match &self.case {
            Some(case) => render_case_page(
                case,
                &self.rendered,
                &PageState {
                    documents: &self.documents.snapshot(),
                    summary: &self.summary.snapshot(),
                    status,
                },
            ),
            None => render_not_found(requested_id),
        }
    }
}

fn document_names(sections: &[RenderedSection]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for section in sections {
        for name in section.document_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}
