use serde_json::Value;

use crate::date;
use crate::documents::{DocumentDescriptor, DocumentTable};
use crate::schema::{FieldKind, FieldSchema};
use crate::text::display_text;

/// Presentational form of one field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Text(String),
    /// Lines separated by explicit breaks, no trailing break.
    Lines(Vec<String>),
    Link {
        href: String,
        text: String,
        /// Opens in a new browsing context without referrer or opener.
        external: bool,
    },
    Documents(DocumentTable),
}

impl Rendered {
    /// Plain-text projection, lines joined with `\n`.
    pub fn plain_text(&self) -> String {
        match self {
            Rendered::Text(text) => text.clone(),
            Rendered::Lines(lines) => lines.join("\n"),
            Rendered::Link { text, .. } => text.clone(),
            Rendered::Documents(table) => table
                .rows()
                .iter()
                .map(|row| row.name.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

/// Map a resolved value to its presentation. `None` means "render nothing".
pub fn render(value: &Value, field: &FieldSchema) -> Option<Rendered> {
    if matches!(value, Value::Null) || matches!(value, Value::String(s) if s.is_empty()) {
        return None;
    }

    match &field.kind {
        FieldKind::Multiline => render_multiline(&display_text(value)),
        FieldKind::Files => render_files(value),
        FieldKind::Address { .. } => render_multiline(&display_text(value).replace(", ", "\n")),
        FieldKind::Email => Some(Rendered::Link {
            href: format!("mailto:{}", display_text(value)),
            text: display_text(value),
            external: false,
        }),
        FieldKind::Url => Some(render_url(&display_text(value))),
        FieldKind::Phone => Some(Rendered::Link {
            href: format!("tel:{}", display_text(value)),
            text: display_text(value),
            external: false,
        }),
        FieldKind::Date => Some(Rendered::Text(date::format_or_raw(value))),
        FieldKind::Array => match value {
            Value::Array(items) => render_array(items),
            other => Some(Rendered::Text(display_text(other))),
        },
        FieldKind::Default
        | FieldKind::Nested { .. }
        | FieldKind::Compose { .. }
        | FieldKind::Unknown(_) => match value {
            Value::Array(items) if items.first().is_some_and(is_scalar) => render_array(items),
            other => Some(Rendered::Text(display_text(other))),
        },
    }
}

/// Anything but objects, arrays and null.
fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_) | Value::Null)
}

fn render_multiline(text: &str) -> Option<Rendered> {
    if text.is_empty() {
        return None;
    }
    let lines = text
        .split("\r\n")
        .flat_map(|chunk| chunk.split('\n'))
        .map(str::to_string)
        .collect();
    Some(Rendered::Lines(lines))
}

fn render_files(value: &Value) -> Option<Rendered> {
    let Value::Array(items) = value else {
        return None;
    };
    let documents: Vec<DocumentDescriptor> = items
        .iter()
        .filter_map(DocumentDescriptor::from_value)
        .collect();
    DocumentTable::new(&documents).map(Rendered::Documents)
}

fn render_url(url: &str) -> Rendered {
    let href = if url.starts_with("http") {
        url.to_string()
    } else {
        format!("https://{}", url)
    };
    Rendered::Link {
        href,
        text: url.to_string(),
        external: true,
    }
}

fn render_array(items: &[Value]) -> Option<Rendered> {
    if items.is_empty() {
        return None;
    }
    Some(Rendered::Lines(items.iter().map(display_text).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn field(kind: FieldKind) -> FieldSchema {
        FieldSchema::new("k", "K", kind)
    }

    fn lines(items: &[&str]) -> Option<Rendered> {
        Some(Rendered::Lines(items.iter().map(|s| s.to_string()).collect()))
    }

    #[test]
    fn test_empty_values_render_nothing() {
        for kind in [FieldKind::Default, FieldKind::Date, FieldKind::Email, FieldKind::Files] {
            assert_eq!(render(&json!(null), &field(kind.clone())), None);
            assert_eq!(render(&json!(""), &field(kind)), None);
        }
    }

    #[test]
    fn test_multiline_splits_crlf_and_lf() {
        assert_eq!(
            render(&json!("one\r\ntwo\nthree"), &field(FieldKind::Multiline)),
            lines(&["one", "two", "three"])
        );
    }

    #[test]
    fn test_address_breaks_on_separator() {
        let kind = FieldKind::Address { compose: None };
        assert_eq!(
            render(&json!("1 High St, Coventry, CV1 2AB"), &field(kind)),
            lines(&["1 High St", "Coventry", "CV1 2AB"])
        );
    }

    #[test]
    fn test_links() {
        assert_eq!(
            render(&json!("a@b.org"), &field(FieldKind::Email)),
            Some(Rendered::Link {
                href: "mailto:a@b.org".into(),
                text: "a@b.org".into(),
                external: false
            })
        );
        assert_eq!(
            render(&json!("01234 567890"), &field(FieldKind::Phone)),
            Some(Rendered::Link {
                href: "tel:01234 567890".into(),
                text: "01234 567890".into(),
                external: false
            })
        );
    }

    #[test]
    fn test_url_gets_scheme_but_keeps_text() {
        assert_eq!(
            render(&json!("example.com"), &field(FieldKind::Url)),
            Some(Rendered::Link {
                href: "https://example.com".into(),
                text: "example.com".into(),
                external: true
            })
        );
        assert_eq!(
            render(&json!("http://plain.example"), &field(FieldKind::Url)),
            Some(Rendered::Link {
                href: "http://plain.example".into(),
                text: "http://plain.example".into(),
                external: true
            })
        );
    }

    #[test]
    fn test_date_formats_or_passes_through() {
        assert_eq!(
            render(&json!("2024-03-05"), &field(FieldKind::Date)),
            Some(Rendered::Text("05/03/2024".into()))
        );
        assert_eq!(
            render(&json!("not-a-date"), &field(FieldKind::Date)),
            Some(Rendered::Text("not-a-date".into()))
        );
    }

    #[test]
    fn test_array_lines_keep_order() {
        assert_eq!(
            render(&json!(["a", "b", "c"]), &field(FieldKind::Array)),
            lines(&["a", "b", "c"])
        );
        assert_eq!(render(&json!([]), &field(FieldKind::Array)), None);
        assert_eq!(
            render(&json!("single"), &field(FieldKind::Array)),
            Some(Rendered::Text("single".into()))
        );
    }

    #[test]
    fn test_default_detects_scalar_lists() {
        assert_eq!(
            render(&json!([1, 2]), &field(FieldKind::Default)),
            lines(&["1", "2"])
        );
        assert_eq!(
            render(&json!([{"a": 1}]), &field(FieldKind::Unknown("chart".into()))),
            Some(Rendered::Text("[object Object]".into()))
        );
        assert_eq!(
            render(&json!(12.0), &field(FieldKind::Default)),
            Some(Rendered::Text("12".into()))
        );
        assert_eq!(
            render(&json!(false), &field(FieldKind::Default)),
            Some(Rendered::Text("false".into()))
        );
    }

    #[test]
    fn test_files_build_table() {
        let rendered = render(&json!(["report.pdf", {"name": "b.docx"}]), &field(FieldKind::Files));
        match rendered {
            Some(Rendered::Documents(table)) => {
                assert_eq!(table.rows().len(), 2);
                assert_eq!(table.rows()[0].file_type, "PDF");
                assert_eq!(table.rows()[1].file_type, "DOCX");
            }
            other => panic!("Expected document table, got {:?}", other),
        }
        assert_eq!(render(&json!([]), &field(FieldKind::Files)), None);
        assert_eq!(render(&json!("report.pdf"), &field(FieldKind::Files)), None);
    }
}
