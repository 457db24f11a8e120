use async_trait::async_trait;
use caseview_fields::SummaryCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::case_summary::{CaseSummary, CaseSummaryCatalog};

/// Supplies generated text for a case page.
#[async_trait]
pub trait EnrichmentSource: Send + Sync {
    /// Summaries for the given file names. Names without one are omitted.
    async fn document_summaries(&self, names: Vec<String>) -> HashMap<String, String>;

    async fn case_summary(&self, case_type: String) -> Option<CaseSummary>;
}

/// Answers from static catalogs after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedSource {
    documents: Arc<SummaryCatalog>,
    cases: Arc<CaseSummaryCatalog>,
    delay: Duration,
}

impl SimulatedSource {
    pub fn new(documents: SummaryCatalog, cases: CaseSummaryCatalog, delay: Duration) -> Self {
        Self {
            documents: Arc::new(documents),
            cases: Arc::new(cases),
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl EnrichmentSource for SimulatedSource {
    async fn document_summaries(&self, names: Vec<String>) -> HashMap<String, String> {
        tokio::time::sleep(self.delay).await;
        let found = self.documents.lookup(&names);
        tracing::debug!(requested = names.len(), found = found.len(), "document summaries");
        found
    }

    async fn case_summary(&self, case_type: String) -> Option<CaseSummary> {
        tokio::time::sleep(self.delay).await;
        let summary = self.cases.get(&case_type).cloned();
        if summary.is_none() {
            tracing::debug!(case_type = %case_type, "no case summary for type");
        }
        summary
    }
}
