use std::collections::HashSet;

use crate::error::{FieldsError, FieldsResult};
use crate::schema::{FieldKind, FieldSchema, SectionSchema};
use crate::section::section_id;

/// Check a schema document for mistakes an author would want to hear about.
///
/// Rendering tolerates all of these (a bad field just resolves to nothing),
/// so this is a lint for schema files rather than a gate on rendering.
pub fn validate_sections(sections: &[SectionSchema]) -> FieldsResult<()> {
    if sections.is_empty() {
        return Err(FieldsError::EmptySchema);
    }

    let mut seen_ids = HashSet::new();
    for (index, section) in sections.iter().enumerate() {
        if section.title.trim().is_empty() {
            return Err(FieldsError::MissingTitle { index });
        }
        let id = section_id(&section.title);
        if !seen_ids.insert(id.clone()) {
            return Err(FieldsError::DuplicateSectionId { id });
        }
        validate_section(section)?;
    }
    Ok(())
}

fn validate_section(section: &SectionSchema) -> FieldsResult<()> {
    let mut keys = HashSet::new();
    for field in &section.fields {
        if !keys.insert(field.key.as_str()) {
            return Err(FieldsError::DuplicateKey {
                section: section.title.clone(),
                key: field.key.clone(),
            });
        }
        if field.label.trim().is_empty() {
            return Err(FieldsError::MissingLabel {
                section: section.title.clone(),
                key: field.key.clone(),
            });
        }
        validate_field(&section.title, field)?;
    }
    Ok(())
}

fn validate_field(section: &str, field: &FieldSchema) -> FieldsResult<()> {
    let missing = |property: &str| FieldsError::MissingProperty {
        section: section.to_string(),
        key: field.key.clone(),
        property: property.to_string(),
    };

    match &field.kind {
        FieldKind::Nested { path } => {
            let path = path.as_deref().ok_or_else(|| missing("path"))?;
            if path.split('.').any(str::is_empty) {
                return Err(FieldsError::InvalidPath {
                    key: field.key.clone(),
                    path: path.to_string(),
                });
            }
        }
        FieldKind::Address { compose } | FieldKind::Compose { compose } => {
            match compose {
                Some(names) if !names.is_empty() => {}
                _ => return Err(missing("compose")),
            }
        }
        FieldKind::Unknown(tag) => {
            tracing::warn!(
                section,
                key = %field.key,
                tag = %tag,
                "unknown field type, default rendering will be used"
            );
        }
        FieldKind::Default
        | FieldKind::Multiline
        | FieldKind::Files
        | FieldKind::Email
        | FieldKind::Url
        | FieldKind::Phone
        | FieldKind::Date
        | FieldKind::Array => {}
    }
    Ok(())
}
