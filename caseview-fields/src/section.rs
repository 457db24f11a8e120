use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::documents::DocumentTable;
use crate::render::{render, Rendered};
use crate::resolve::resolve;
use crate::schema::{FieldSchema, SectionSchema};
use crate::text::is_blank;

/// One label/value line of a section's list.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRow {
    pub key: String,
    pub label: String,
    pub value: Rendered,
}

/// A full-width document block appended after the list.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentBlock {
    pub key: String,
    pub table: DocumentTable,
}

/// A section with at least one populated field.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSection {
    pub id: String,
    pub title: String,
    pub rows: Vec<SectionRow>,
    pub documents: Vec<DocumentBlock>,
}

impl RenderedSection {
    /// Distinct file names across every document block.
    pub fn document_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for block in &self.documents {
            for name in block.table.names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    pub fn apply_summaries(&mut self, summaries: &HashMap<String, String>) {
        for block in &mut self.documents {
            block.table.apply_summaries(summaries);
        }
    }
}

/// Anchor id for a section title: lowercase, anything outside
/// `[a-z0-9-]` and whitespace dropped, then whitespace runs to `-`.
///
/// Dropping first keeps a punctuation-only word from leaving two hyphens
/// behind (`"A & B"` is `a-b`).
pub fn section_id(title: &str) -> String {
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").unwrap());
    let disallowed = DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9\s-]").unwrap());

    let lowered = title.to_lowercase();
    let kept = disallowed.replace_all(&lowered, "");
    whitespace.replace_all(&kept, "-").into_owned()
}

/// Lay out a section against a record.
///
/// Returns `None` when no field resolves to a value; there is never an empty
/// heading. Fields whose resolved value is non-empty but whose rendering is
/// `None` are skipped silently.
pub fn render_section(
    section: &SectionSchema,
    record: Option<&Value>,
    explicit_id: Option<&str>,
) -> Option<RenderedSection> {
    let populated: Vec<(&FieldSchema, Value)> = section
        .fields
        .iter()
        .filter_map(|field| {
            resolve(record, field)
                .filter(|value| !is_blank(value))
                .map(|value| (field, value))
        })
        .collect();

    if populated.is_empty() {
        return None;
    }

    let id = explicit_id
        .map(str::to_string)
        .unwrap_or_else(|| section_id(&section.title));

    let (files, regular): (Vec<_>, Vec<_>) = populated
        .into_iter()
        .partition(|(field, _)| field.kind.is_files());

    let rows = regular
        .into_iter()
        .filter_map(|(field, value)| {
            render(&value, field).map(|rendered| SectionRow {
                key: field.key.clone(),
                label: field.label.clone(),
                value: rendered,
            })
        })
        .collect();

    let documents = files
        .into_iter()
        .filter_map(|(field, value)| match render(&value, field) {
            Some(Rendered::Documents(table)) => Some(DocumentBlock {
                key: field.key.clone(),
                table,
            }),
            _ => None,
        })
        .collect();

    Some(RenderedSection {
        id,
        title: section.title.clone(),
        rows,
        documents,
    })
}

/// Render every section in order, dropping the empty ones.
pub fn render_sections(sections: &[SectionSchema], record: Option<&Value>) -> Vec<RenderedSection> {
    sections
        .iter()
        .filter_map(|section| render_section(section, record, None))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;
    use serde_json::json;

    #[test]
    fn test_section_id() {
        assert_eq!(
            section_id("Regulated Organisations & Contacts!"),
            "regulated-organisations-contacts"
        );
        assert_eq!(section_id("  Case   details "), "-case-details-");
        assert_eq!(section_id("Stage 2 - Review"), "stage-2---review");
    }

    #[test]
    fn test_section_id_punctuation_word() {
        assert_eq!(section_id("A & B"), "a-b");
        assert_eq!(section_id("Risks / Issues"), "risks-issues");
        assert_eq!(section_id("Notes (internal) !!"), "notes-internal-");
    }

    #[test]
    fn test_explicit_id_wins() {
        let section = SectionSchema::new(
            "Overview",
            vec![FieldSchema::new("a", "A", FieldKind::Default)],
        );
        let record = json!({"a": "x"});
        let rendered = render_section(&section, Some(&record), Some("top")).unwrap();
        assert_eq!(rendered.id, "top");
    }
}
