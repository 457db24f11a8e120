//! HTML emission for rendered fields, sections and document tables.
//! All record text is escaped; no script and no inline event handlers.

use std::fmt::Write;

use crate::documents::{DocumentTable, SummaryState, COLUMNS, SEARCH_PLACEHOLDER};
use crate::render::Rendered;
use crate::section::RenderedSection;

/// Styles for the markup produced here. Pages embed this once.
pub const BASE_STYLES: &str = ".cv-section{margin-bottom:2rem;scroll-margin-top:5rem;}\
.cv-section h2{font-size:1.25rem;margin:0.5rem 0 1rem;font-weight:400;}\
.cv-list{width:100%;border-collapse:collapse;}\
.cv-list th{font-weight:600;width:240px;vertical-align:top;text-align:left;word-wrap:break-word;hyphens:auto;padding:0.5rem 0;}\
.cv-list td{vertical-align:top;word-wrap:break-word;padding:0.5rem 0;}\
.cv-link{color:#0f62fe;text-decoration:underline;}\
.cv-documents{margin-top:1rem;}\
.cv-documents table{width:100%;border-collapse:collapse;}\
.cv-documents th,.cv-documents td{border-bottom:1px solid #e0e0e0;padding:0.5rem;text-align:left;}\
.cv-icon{display:inline-block;width:16px;height:16px;margin-right:0.5rem;flex-shrink:0;}\
.cv-skeleton{display:inline-block;width:90%;height:0.875rem;background:#e8e8e8;border-radius:2px;}";

pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Lines joined by `<br>`, no trailing break.
fn lines_to_html(lines: &[String], out: &mut String) -> std::fmt::Result {
    for (index, line) in lines.iter().enumerate() {
        if index > 0 {
            write!(out, "<br>")?;
        }
        write!(out, "{}", escape_html(line))?;
    }
    Ok(())
}

pub fn rendered_to_html(rendered: &Rendered, out: &mut String) -> std::fmt::Result {
    match rendered {
        Rendered::Text(text) => write!(out, "{}", escape_html(text)),
        Rendered::Lines(lines) => lines_to_html(lines, out),
        Rendered::Link {
            href,
            text,
            external,
        } => {
            let target = if *external {
                " target=\"_blank\" rel=\"noopener noreferrer\""
            } else {
                ""
            };
            write!(
                out,
                "<a class=\"cv-link\" href=\"{}\"{}>{}</a>",
                escape_html(href),
                target,
                escape_html(text)
            )
        }
        Rendered::Documents(table) => document_table_to_html(table, None, out),
    }
}

/// Render a document table. `query` filters rows the way the search box does.
pub fn document_table_to_html(
    table: &DocumentTable,
    query: Option<&str>,
    out: &mut String,
) -> std::fmt::Result {
    let rows = table.filter(query.unwrap_or(""));
    let state = match table.state() {
        SummaryState::Loading => "loading",
        SummaryState::Ready => "ready",
    };

    write!(out, "<div class=\"cv-documents\" data-summary-state=\"{}\">", state)?;
    write!(
        out,
        "<div class=\"cv-toolbar\"><input type=\"search\" placeholder=\"{}\" value=\"{}\"></div>",
        escape_html(SEARCH_PLACEHOLDER),
        escape_html(query.unwrap_or(""))
    )?;
    write!(out, "<table><thead><tr>")?;
    for (key, header) in COLUMNS {
        write!(out, "<th data-column=\"{}\">{}</th>", key, escape_html(header))?;
    }
    write!(out, "</tr></thead><tbody>")?;
    for row in rows {
        write!(out, "<tr id=\"{}\">", escape_html(&row.id))?;
        write!(
            out,
            "<td><span class=\"cv-icon cv-icon-{}\" aria-hidden=\"true\"></span><a href=\"{}\">{}</a></td>",
            row.icon.as_str(),
            escape_html(table.url_for(&row.id)),
            escape_html(&row.name)
        )?;
        write!(out, "<td>{}</td>", escape_html(&row.file_type))?;
        write!(out, "<td>{}</td>", escape_html(&row.date))?;
        match table.state() {
            SummaryState::Loading => {
                write!(out, "<td><span class=\"cv-skeleton\" aria-busy=\"true\"></span></td>")?
            }
            SummaryState::Ready => write!(out, "<td>{}</td>", escape_html(row.summary()))?,
        }
        write!(out, "</tr>")?;
    }
    write!(out, "</tbody></table></div>")
}

pub fn section_to_html(section: &RenderedSection, out: &mut String) -> std::fmt::Result {
    write!(
        out,
        "<section class=\"cv-section\" id=\"{}\"><h2>{}</h2>",
        escape_html(&section.id),
        escape_html(&section.title)
    )?;
    if !section.rows.is_empty() {
        write!(out, "<table class=\"cv-list\"><tbody>")?;
        for row in &section.rows {
            write!(
                out,
                "<tr data-key=\"{}\"><th scope=\"row\">{}</th><td>",
                escape_html(&row.key),
                escape_html(&row.label)
            )?;
            rendered_to_html(&row.value, out)?;
            write!(out, "</td></tr>")?;
        }
        write!(out, "</tbody></table>")?;
    }
    for block in &section.documents {
        write!(out, "<div data-key=\"{}\">", escape_html(&block.key))?;
        document_table_to_html(&block.table, None, out)?;
        write!(out, "</div>")?;
    }
    write!(out, "</section>")
}

/// Concatenated HTML for already-rendered sections.
pub fn sections_to_html(sections: &[RenderedSection]) -> String {
    let mut out = String::new();
    for section in sections {
        // Writing into a String cannot fail.
        let _ = section_to_html(section, &mut out);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & 'Jerry'</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_lines_have_no_trailing_break() {
        let mut out = String::new();
        rendered_to_html(
            &Rendered::Lines(vec!["a".into(), "b".into(), "c".into()]),
            &mut out,
        )
        .unwrap();
        assert_eq!(out, "a<br>b<br>c");
    }

    #[test]
    fn test_external_link_markup() {
        let mut out = String::new();
        rendered_to_html(
            &Rendered::Link {
                href: "https://example.com".into(),
                text: "example.com".into(),
                external: true,
            },
            &mut out,
        )
        .unwrap();
        assert_eq!(
            out,
            "<a class=\"cv-link\" href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">example.com</a>"
        );
    }
}
