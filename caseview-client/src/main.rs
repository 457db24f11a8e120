use anyhow::{Context, Result};
use caseview_client::{
    display_status, seed_task_statuses_once, CaseView, ClientConfig, Dashboard, Fixtures,
    InMemoryTaskStatusStore, MessageFilter, SimulatedSource,
};
use caseview_fields::{parse_sections_any, validate_sections, FieldsError, SummaryState};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

/// Render case information pages from fixture data.
#[derive(Parser, Debug)]
#[command(name = "caseview", version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the case information page as HTML
    Render {
        #[arg(long)]
        case: String,

        /// YAML configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit the page before summaries arrive
        #[arg(long)]
        no_wait: bool,
    },
    /// Print the case's document table
    Documents {
        #[arg(long)]
        case: String,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Filter rows like the search box
        #[arg(long)]
        query: Option<String>,
    },
    /// Write the signed-in user's dashboard as HTML
    Dashboard {
        #[arg(long)]
        config: Option<PathBuf>,

        /// Inbox tab to show
        #[arg(long, value_enum, default_value_t = MessageFilter::All)]
        messages: MessageFilter,

        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Check section schema files (JSON or YAML)
    Validate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Result<ClientConfig> {
    match path {
        Some(path) => ClientConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display())),
        None => {
            let mut config = ClientConfig::default();
            config.apply_env()?;
            Ok(config)
        }
    }
}

/// Load fixtures and open `case_id`, waiting for enrichment unless told not to.
async fn open_case(config: &ClientConfig, case_id: &str, wait: bool) -> Result<(Fixtures, CaseView)> {
    let fixtures = Fixtures::load(config).context("loading fixtures")?;
    let source = SimulatedSource::new(
        fixtures.document_summaries.clone(),
        fixtures.case_summaries.clone(),
        config.summary_delay(),
    );
    let mut view = CaseView::new(Arc::new(source), fixtures.sections.clone());
    view.open(fixtures.find_case(case_id).cloned());
    if wait {
        view.wait_ready().await;
    }
    Ok((fixtures, view))
}

async fn render(case_id: &str, config: Option<&Path>, out: Option<&Path>, no_wait: bool) -> Result<()> {
    let config = load_config(config)?;
    let (fixtures, view) = open_case(&config, case_id, !no_wait).await?;

    let store = InMemoryTaskStatusStore::new();
    if let Some(seed) = &fixtures.seeded_tasks {
        seed_task_statuses_once(&store, seed, chrono::Utc::now());
    }
    let base_status = view
        .case()
        .map(|case| caseview_client::fixtures::case_text(case, "Status"))
        .unwrap_or_default();
    let status = display_status(&store, case_id, &base_status);

    write_html(&view.to_html(case_id, &status), out)?;
    if view.case().is_none() {
        tracing::warn!(case_id, "case not found");
    }
    Ok(())
}

fn write_html(html: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, html).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), "page written");
        }
        None => println!("{}", html),
    }
    Ok(())
}

fn dashboard(config: Option<&Path>, filter: MessageFilter, out: Option<&Path>) -> Result<()> {
    let config = load_config(config)?;
    let fixtures = Fixtures::load(&config).context("loading fixtures")?;
    let dashboard = Dashboard::build(&fixtures, &config.current_user, filter);
    tracing::debug!(
        user = %dashboard.user.id,
        cases = dashboard.my_cases.len(),
        messages = dashboard.messages.len(),
        "dashboard built"
    );
    write_html(&dashboard.to_html(chrono::Utc::now()), out)
}

async fn documents(case_id: &str, config: Option<&Path>, query: Option<&str>) -> Result<()> {
    let config = load_config(config)?;
    let (_fixtures, view) = open_case(&config, case_id, true).await?;
    if view.case().is_none() {
        anyhow::bail!("Case '{}' not found", case_id);
    }

    for section in view.sections() {
        for block in &section.documents {
            println!("{} / {}", section.title, block.key);
            for row in block.table.filter(query.unwrap_or("")) {
                let summary = match block.table.state() {
                    SummaryState::Loading => "…",
                    SummaryState::Ready => row.summary(),
                };
                println!("  {}\t{}\t{}\t{}\t{}", row.name, row.file_type, row.date, row.url, summary);
            }
        }
    }
    Ok(())
}

fn validate_file(path: &Path) -> Result<(), FieldsError> {
    let content = std::fs::read_to_string(path)?;
    let sections = parse_sections_any(&content)?;
    validate_sections(&sections)
}

fn validate(files: &[PathBuf]) -> i32 {
    let mut exit_code = 0;
    for path in files {
        match validate_file(path) {
            Ok(()) => println!("✓ {} is valid", path.display()),
            Err(e) => {
                eprintln!("✗ {}: {}", path.display(), e);
                exit_code = 1;
            }
        }
    }
    exit_code
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let Args { command } = Args::parse();
    match command {
        Command::Render {
            case,
            config,
            out,
            no_wait,
        } => render(&case, config.as_deref(), out.as_deref(), no_wait).await,
        Command::Documents {
            case,
            config,
            query,
        } => documents(&case, config.as_deref(), query.as_deref()).await,
        Command::Dashboard {
            config,
            messages,
            out,
        } => dashboard(config.as_deref(), messages, out.as_deref()),
        Command::Validate { files } => process::exit(validate(&files)),
    }
}
