//! # Caseview client
//!
//! Case information pages and the personal dashboard, assembled from
//! fixtures: configuration, the task status store, simulated enrichment with
//! cancellable delayed loads, notifications and page HTML. Field rendering
//! lives in `caseview_fields`.

pub mod case_summary;
pub mod config;
pub mod dashboard;
pub mod enrichment;
pub mod error;
pub mod fixtures;
pub mod loader;
pub mod notifications;
pub mod page;
pub mod status;
pub mod view;

pub use case_summary::{CaseMetrics, CaseSummary, CaseSummaryCatalog};
pub use config::ClientConfig;
pub use dashboard::{CurrentUser, Dashboard, MessageFilter};
pub use enrichment::{EnrichmentSource, SimulatedSource};
pub use error::{ClientError, ClientResult};
pub use fixtures::Fixtures;
pub use loader::{DelayedLoad, LoadState};
pub use notifications::{Notification, NotificationCenter, NotificationId, NotificationKind};
pub use page::{render_case_page, render_not_found, PageState};
pub use status::{
    clear_task_data, display_status, seed_task_statuses, seed_task_statuses_once,
    InMemoryTaskStatusStore, TaskKey, TaskRecord, TaskStatus, TaskStatusStore,
};
pub use view::CaseView;
