use caseview_fields::html::{escape_html, section_to_html, BASE_STYLES};
use caseview_fields::RenderedSection;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Write;

use crate::case_summary::{case_summary_tile, CaseSummary};
use crate::fixtures::case_text;
use crate::loader::LoadState;

const PAGE_STYLES: &str = "body{font-family:'IBM Plex Sans',Arial,sans-serif;margin:0;color:#161616;}\
.cv-case-header{padding:1.5rem 2rem;border-bottom:1px solid #e0e0e0;}\
.cv-case-meta{display:flex;gap:1rem;color:#525252;}\
.cv-status{font-weight:600;}\
.cv-layout{display:grid;grid-template-columns:14rem 1fr;gap:2rem;padding:2rem;}\
.cv-nav ul{list-style:none;padding:0;position:sticky;top:1rem;}\
.cv-nav a{display:block;padding:.25rem 0;color:#0f62fe;text-decoration:none;}\
.cv-tile{background:#f4f4f4;padding:1rem;margin-bottom:2rem;}\
.cv-metrics{display:flex;gap:2rem;}\
.cv-metric{font-size:1.5rem;}\
.cv-metric-label{font-size:.75rem;color:#525252;}\
.cv-tag{padding:.125rem .5rem;border-radius:1rem;}\
.cv-tag-red{background:#ffd7d9;color:#a2191f;}\
.cv-tag-orange{background:#ffd9be;color:#8a3800;}\
.cv-tag-green{background:#a7f0ba;color:#0e6027;}\
.cv-tag-blue{background:#d0e2ff;color:#0043ce;}\
.cv-dashboard{padding:2rem;}\
.cv-dashboard-grid{display:grid;grid-template-columns:repeat(4,1fr);gap:1rem;margin-top:1rem;}\
.cv-panel{background:#f4f4f4;padding:1rem;}\
.cv-card{display:block;background:#fff;padding:1rem;margin-bottom:.5rem;color:inherit;text-decoration:none;}\
.cv-preview{white-space:nowrap;overflow:hidden;text-overflow:ellipsis;color:#525252;}\
.cv-empty{text-align:center;color:#525252;}";

/// Enrichment state for a page render.
pub struct PageState<'a> {
    pub documents: &'a LoadState<HashMap<String, String>>,
    pub summary: &'a LoadState<Option<CaseSummary>>,
    /// Display status for the header, see `status::display_status`.
    pub status: &'a str,
}

pub(crate) fn open_document(out: &mut String, title: &str) -> std::fmt::Result {
    write!(
        out,
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\"><title>{}</title><style>{}{}</style></head><body>",
        escape_html(title),
        BASE_STYLES,
        PAGE_STYLES
    )
}

fn write_case_page(
    out: &mut String,
    case: &Value,
    sections: &[RenderedSection],
    state: &PageState<'_>,
) -> std::fmt::Result {
    let title = case_text(case, "Title");
    let case_id = case_text(case, "CaseID");

    open_document(out, &format!("{} | {}", title, case_id))?;
    write!(out, "<header class=\"cv-case-header\"><h1>{}</h1>", escape_html(&title))?;
    write!(
        out,
        "<p class=\"cv-case-meta\"><span>Case ID: {}</span><span class=\"cv-status\">{}</span></p></header>",
        escape_html(&case_id),
        escape_html(state.status)
    )?;

    write!(out, "<div class=\"cv-layout\"><nav class=\"cv-nav\" aria-label=\"On this page\"><ul>")?;
    for section in sections {
        write!(
            out,
            "<li><a href=\"#{}\">{}</a></li>",
            escape_html(&section.id),
            escape_html(&section.title)
        )?;
    }
    write!(out, "</ul></nav><main>")?;

    case_summary_tile(state.summary, out)?;

    for section in sections {
        match state.documents {
            LoadState::Ready(summaries) if !section.documents.is_empty() => {
                let mut enriched = section.clone();
                enriched.apply_summaries(summaries);
                section_to_html(&enriched, out)?;
            }
            _ => section_to_html(section, out)?,
        }
    }
    write!(out, "</main></div></body></html>")
}

/// Full case information page. Sections arrive already rendered; document
/// summaries are applied once their load is ready.
pub fn render_case_page(case: &Value, sections: &[RenderedSection], state: &PageState<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_case_page(&mut out, case, sections, state);
    out
}

pub fn render_not_found(case_id: &str) -> String {
    let mut out = String::new();
    let _ = open_document(&mut out, "Case not found");
    let _ = write!(
        out,
        "<main class=\"cv-layout\"><h1>Case not found</h1><p>No case matches '{}'.</p></main></body></html>",
        escape_html(case_id)
    );
    out
}
