//! Document collections: descriptor normalisation, row enrichment and search.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::date;

/// Placeholder dates used when a descriptor carries none, picked by
/// position modulo the pool size so fixtures stay repeatable.
pub const FALLBACK_DATES: [&str; 15] = [
    "2025-11-15",
    "2025-10-22",
    "2025-09-30",
    "2025-08-18",
    "2025-07-05",
    "2025-06-12",
    "2025-05-28",
    "2025-04-10",
    "2025-03-14",
    "2025-02-20",
    "2025-01-08",
    "2024-12-15",
    "2024-11-22",
    "2024-10-30",
    "2024-09-18",
];

pub const SUMMARY_NOT_AVAILABLE: &str = "Document content summary not available";
pub const UNKNOWN_FILE_TYPE: &str = "FILE";
pub const SEARCH_PLACEHOLDER: &str = "Search documents...";

/// Column keys and headers, in display order.
pub const COLUMNS: [(&str, &str); 4] = [
    ("name", "Document name"),
    ("type", "Type"),
    ("date", "Date"),
    ("summary", "AI Summary"),
];

/// A file reference: either a bare name or an object with metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DocumentDescriptor {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        #[serde(rename = "uploadDate", default, skip_serializing_if = "Option::is_none")]
        upload_date: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        date: Option<String>,
    },
}

impl DocumentDescriptor {
    pub fn name(&self) -> &str {
        match self {
            DocumentDescriptor::Name(name) => name,
            DocumentDescriptor::Detailed { name, .. } => name,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            DocumentDescriptor::Name(_) => None,
            DocumentDescriptor::Detailed { url, .. } => url.as_deref().filter(|u| !u.is_empty()),
        }
    }

    /// `uploadDate` wins over `date`; empty strings count as absent.
    pub fn recorded_date(&self) -> Option<&str> {
        match self {
            DocumentDescriptor::Name(_) => None,
            DocumentDescriptor::Detailed {
                upload_date, date, ..
            } => upload_date
                .as_deref()
                .filter(|d| !d.is_empty())
                .or_else(|| date.as_deref().filter(|d| !d.is_empty())),
        }
    }

    /// Lenient conversion from record data. Entries that are neither a string
    /// nor an object with a string `name` are skipped by the caller.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(DocumentDescriptor::Name(name.clone())),
            Value::Object(map) => {
                let name = map.get("name")?.as_str()?.to_string();
                let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
                Some(DocumentDescriptor::Detailed {
                    name,
                    url: text("url"),
                    upload_date: text("uploadDate"),
                    date: text("date"),
                })
            }
            _ => None,
        }
    }
}

/// Icon category derived from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Pdf,
    Word,
    Spreadsheet,
    Csv,
    Jpg,
    Png,
    Txt,
    Archive,
    Audio,
    Video,
    Document,
}

impl FileIcon {
    pub fn for_name(name: &str) -> Self {
        let ext = extension(name).map(str::to_lowercase).unwrap_or_default();
        match ext.as_str() {
            "pdf" => FileIcon::Pdf,
            "doc" | "docx" => FileIcon::Word,
            "xls" | "xlsx" => FileIcon::Spreadsheet,
            "csv" => FileIcon::Csv,
            "jpg" | "jpeg" => FileIcon::Jpg,
            "png" => FileIcon::Png,
            "txt" => FileIcon::Txt,
            "zip" | "rar" => FileIcon::Archive,
            "mp3" => FileIcon::Audio,
            "mp4" | "mov" => FileIcon::Video,
            _ => FileIcon::Document,
        }
    }

    /// Stable class suffix used by the HTML output.
    pub fn as_str(&self) -> &'static str {
        match self {
            FileIcon::Pdf => "pdf",
            FileIcon::Word => "word",
            FileIcon::Spreadsheet => "spreadsheet",
            FileIcon::Csv => "csv",
            FileIcon::Jpg => "jpg",
            FileIcon::Png => "png",
            FileIcon::Txt => "txt",
            FileIcon::Archive => "archive",
            FileIcon::Audio => "audio",
            FileIcon::Video => "video",
            FileIcon::Document => "document",
        }
    }
}

fn extension(name: &str) -> Option<&str> {
    name.rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Uppercased extension, or `FILE` when the name has none.
pub fn file_type_label(name: &str) -> String {
    extension(name)
        .map(str::to_uppercase)
        .unwrap_or_else(|| UNKNOWN_FILE_TYPE.to_string())
}

/// Display date for the row at `index`.
pub fn display_date(descriptor: &DocumentDescriptor, index: usize) -> String {
    let raw = descriptor
        .recorded_date()
        .unwrap_or(FALLBACK_DATES[index % FALLBACK_DATES.len()]);
    if raw == "-" {
        return "-".to_string();
    }
    match date::parse_date_str(raw) {
        Some(d) => date::format_uk(d),
        None => raw.to_string(),
    }
}

/// Whether the summary column shows real text yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryState {
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    /// `doc-<index>`, stable for the lifetime of the table.
    pub id: String,
    pub name: String,
    pub file_type: String,
    pub icon: FileIcon,
    pub date: String,
    pub url: String,
    summary: Option<String>,
}

impl DocumentRow {
    fn new(index: usize, descriptor: &DocumentDescriptor) -> Self {
        let name = descriptor.name().to_string();
        Self {
            id: format!("doc-{}", index),
            file_type: file_type_label(&name),
            icon: FileIcon::for_name(&name),
            date: display_date(descriptor, index),
            url: descriptor.url().unwrap_or("#").to_string(),
            name,
            summary: None,
        }
    }

    /// Summary text once enrichment has run; the placeholder when the
    /// catalog had no entry.
    pub fn summary(&self) -> &str {
        self.summary.as_deref().unwrap_or(SUMMARY_NOT_AVAILABLE)
    }
}

/// The searchable document table for one `files` field.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTable {
    rows: Vec<DocumentRow>,
    state: SummaryState,
}

impl DocumentTable {
    /// Build rows in the `Loading` state. `None` for an empty collection.
    pub fn new(documents: &[DocumentDescriptor]) -> Option<Self> {
        if documents.is_empty() {
            return None;
        }
        let rows = documents
            .iter()
            .enumerate()
            .map(|(index, doc)| DocumentRow::new(index, doc))
            .collect();
        Some(Self {
            rows,
            state: SummaryState::Loading,
        })
    }

    pub fn rows(&self) -> &[DocumentRow] {
        &self.rows
    }

    pub fn state(&self) -> SummaryState {
        self.state
    }

    /// Distinct file names in row order, for summary lookups.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            if !names.contains(&row.name) {
                names.push(row.name.clone());
            }
        }
        names
    }

    /// Attach looked-up summaries and flip to `Ready`.
    pub fn apply_summaries(&mut self, summaries: &HashMap<String, String>) {
        for row in &mut self.rows {
            row.summary = summaries.get(&row.name).cloned();
        }
        self.state = SummaryState::Ready;
    }

    /// Drop summaries and go back to `Loading`, as when the input changes.
    pub fn reset_summaries(&mut self) {
        for row in &mut self.rows {
            row.summary = None;
        }
        self.state = SummaryState::Loading;
    }

    /// Row link target by synthetic id.
    pub fn url_for(&self, row_id: &str) -> &str {
        self.rows
            .iter()
            .find(|row| row.id == row_id)
            .map(|row| row.url.as_str())
            .unwrap_or("#")
    }

    /// Rows whose visible cells contain `query` (case-insensitive).
    ///
    /// The summary column only takes part once it is visible.
    pub fn filter(&self, query: &str) -> Vec<&DocumentRow> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.rows.iter().collect();
        }
        self.rows
            .iter()
            .filter(|row| {
                let mut cells = vec![row.name.as_str(), row.file_type.as_str(), row.date.as_str()];
                if self.state == SummaryState::Ready {
                    cells.push(row.summary());
                }
                cells
                    .iter()
                    .any(|cell| cell.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Name → summary lookup, loaded from `{ "<name>": { "summary": "..." } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryCatalog {
    entries: HashMap<String, SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub summary: String,
}

impl SummaryCatalog {
    pub fn from_json(json: &str) -> crate::FieldsResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, name: impl Into<String>, summary: impl Into<String>) {
        self.entries.insert(
            name.into(),
            SummaryEntry {
                summary: summary.into(),
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|e| e.summary.as_str())
    }

    /// Summaries for the given names; names without an entry are omitted.
    pub fn lookup(&self, names: &[String]) -> HashMap<String, String> {
        names
            .iter()
            .filter_map(|name| self.get(name).map(|s| (name.clone(), s.to_string())))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> DocumentDescriptor {
        DocumentDescriptor::Name(name.to_string())
    }

    #[test]
    fn test_file_type_label() {
        assert_eq!(file_type_label("report.pdf"), "PDF");
        assert_eq!(file_type_label("archive.tar.gz"), "GZ");
        assert_eq!(file_type_label("README"), "FILE");
        assert_eq!(file_type_label("trailing."), "FILE");
    }

    #[test]
    fn test_icons() {
        assert_eq!(FileIcon::for_name("a.PDF"), FileIcon::Pdf);
        assert_eq!(FileIcon::for_name("a.docx"), FileIcon::Word);
        assert_eq!(FileIcon::for_name("a.xls"), FileIcon::Spreadsheet);
        assert_eq!(FileIcon::for_name("a.jpeg"), FileIcon::Jpg);
        assert_eq!(FileIcon::for_name("a.rar"), FileIcon::Archive);
        assert_eq!(FileIcon::for_name("a.mov"), FileIcon::Video);
        assert_eq!(FileIcon::for_name("a.mp3"), FileIcon::Audio);
        assert_eq!(FileIcon::for_name("a.odt"), FileIcon::Document);
        assert_eq!(FileIcon::for_name("noext"), FileIcon::Document);
    }

    #[test]
    fn test_dates_prefer_upload_date() {
        let doc = DocumentDescriptor::Detailed {
            name: "x.pdf".into(),
            url: None,
            upload_date: Some("2023-01-02".into()),
            date: Some("2020-05-06".into()),
        };
        assert_eq!(display_date(&doc, 0), "02/01/2023");

        let doc = DocumentDescriptor::Detailed {
            name: "x.pdf".into(),
            url: None,
            upload_date: None,
            date: Some("2020-05-06".into()),
        };
        assert_eq!(display_date(&doc, 0), "06/05/2020");
    }

    #[test]
    fn test_fallback_dates_cycle() {
        assert_eq!(display_date(&named("a"), 0), "15/11/2025");
        assert_eq!(display_date(&named("a"), 1), "22/10/2025");
        assert_eq!(display_date(&named("a"), 15), "15/11/2025");
        assert_eq!(display_date(&named("a"), 14), "18/09/2024");
    }

    #[test]
    fn test_empty_collection_has_no_table() {
        assert!(DocumentTable::new(&[]).is_none());
    }

    #[test]
    fn test_rows_and_urls() {
        let docs = vec![
            named("report.pdf"),
            DocumentDescriptor::Detailed {
                name: "evidence.zip".into(),
                url: Some("https://files.example/evidence.zip".into()),
                upload_date: None,
                date: None,
            },
        ];
        let table = DocumentTable::new(&docs).unwrap();
        assert_eq!(table.rows()[0].id, "doc-0");
        assert_eq!(table.rows()[1].id, "doc-1");
        assert_eq!(table.url_for("doc-0"), "#");
        assert_eq!(table.url_for("doc-1"), "https://files.example/evidence.zip");
        assert_eq!(table.url_for("doc-9"), "#");
        assert_eq!(table.rows()[1].icon, FileIcon::Archive);
    }

    #[test]
    fn test_summaries_flip_state() {
        let mut table = DocumentTable::new(&[named("report.pdf"), named("other.txt")]).unwrap();
        assert_eq!(table.state(), SummaryState::Loading);

        let mut catalog = SummaryCatalog::default();
        catalog.insert("report.pdf", "Annual compliance report");
        table.apply_summaries(&catalog.lookup(&table.names()));

        assert_eq!(table.state(), SummaryState::Ready);
        assert_eq!(table.rows()[0].summary(), "Annual compliance report");
        assert_eq!(table.rows()[1].summary(), SUMMARY_NOT_AVAILABLE);

        table.reset_summaries();
        assert_eq!(table.state(), SummaryState::Loading);
    }

    #[test]
    fn test_filter_is_pure_and_case_insensitive() {
        let mut table = DocumentTable::new(&[named("Report.pdf"), named("photo.png")]).unwrap();
        assert_eq!(table.filter("").len(), 2);
        assert_eq!(table.filter("  REPORT ").len(), 1);
        assert_eq!(table.filter("png")[0].name, "photo.png");
        assert_eq!(table.filter("2025").len(), 2);

        assert!(table.filter("not available").is_empty());
        table.apply_summaries(&HashMap::new());
        assert_eq!(table.filter("not available").len(), 2);
        assert_eq!(table.rows().len(), 2);
    }

    #[test]
    fn test_descriptor_from_value() {
        let v = serde_json::json!({"name": "a.pdf", "uploadDate": "2024-01-01", "url": 7});
        let doc = DocumentDescriptor::from_value(&v).unwrap();
        assert_eq!(doc.name(), "a.pdf");
        assert_eq!(doc.recorded_date(), Some("2024-01-01"));
        assert_eq!(doc.url(), None);
        assert!(DocumentDescriptor::from_value(&serde_json::json!(3)).is_none());
        assert!(DocumentDescriptor::from_value(&serde_json::json!({"url": "x"})).is_none());
    }

    #[test]
    fn test_catalog_from_json() {
        let catalog =
            SummaryCatalog::from_json(r#"{"a.pdf": {"summary": "First"}, "b.pdf": {"summary": "Second"}}"#)
                .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("a.pdf"), Some("First"));
        assert_eq!(catalog.get("c.pdf"), None);
    }
}
