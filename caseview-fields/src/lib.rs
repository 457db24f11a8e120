//! # Caseview field rendering
//!
//! Declarative field schemas mapped onto loose case records.
//!
//! ## Pipeline
//! - [`resolve()`] extracts a raw value for one field (direct key, dot path, composed fields)
//! - [`render()`] turns a resolved value into a typed [`Rendered`] form
//! - [`render_section()`] lays out a titled group of fields, dropping empty ones
//! - [`DocumentTable`] enriches `files` values into a searchable table
//! - [`html`] writes any of the above as escaped HTML
//!
//! Resolution and rendering are total: missing or malformed data degrades to
//! "render nothing" or "render the raw value", never to an error.
//!
//! ## Example
//! ```ignore
//! use caseview_fields::{parse_sections, render_section};
//!
//! let sections = parse_sections(r#"[{"title": "Contacts", "fields": [
//!     {"key": "email", "label": "Email", "type": "email"}
//! ]}]"#)?;
//! let record = serde_json::json!({"email": "casework@example.org"});
//! let html = caseview_fields::sections_to_html(&sections, Some(&record));
//! ```

pub mod date;
pub mod documents;
pub mod error;
pub mod html;
pub mod render;
pub mod resolve;
pub mod schema;
pub mod section;
pub mod text;
pub mod validator;

pub use documents::{
    DocumentDescriptor, DocumentRow, DocumentTable, FileIcon, SummaryCatalog, SummaryState,
};
pub use error::{FieldsError, FieldsResult};
pub use render::{render, Rendered};
pub use resolve::resolve;
pub use schema::{FieldKind, FieldSchema, SectionSchema};
pub use section::{render_section, render_sections, section_id, RenderedSection};
pub use validator::validate_sections;

/// Parse a section list from JSON.
pub fn parse_sections(json: &str) -> FieldsResult<Vec<SectionSchema>> {
    schema::sections_from_json(json)
}

/// Parse a section list from YAML.
pub fn parse_sections_yaml(yaml: &str) -> FieldsResult<Vec<SectionSchema>> {
    schema::sections_from_yaml(yaml)
}

/// Parse a section list from either format, picking by the first
/// non-whitespace character (`[` means JSON).
pub fn parse_sections_any(content: &str) -> FieldsResult<Vec<SectionSchema>> {
    if content.trim_start().starts_with('[') {
        parse_sections(content)
    } else {
        parse_sections_yaml(content)
    }
}

/// Render every populated section of `record` straight to HTML.
pub fn sections_to_html(sections: &[SectionSchema], record: Option<&serde_json::Value>) -> String {
    html::sections_to_html(&render_sections(sections, record))
}
