//! Field extraction from form schemas.
//!
//! Field-data platforms describe a form as a tree of elements; data-bearing
//! elements carry a `data_name`, and section/repeatable elements nest
//! further elements. This walk flattens that tree into the field-name list
//! the resolver consumes.

use serde_json::Value;

/// A data-bearing field discovered in a form schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    /// Machine name of the field.
    pub data_name: String,
    /// Display label, when present.
    pub label: Option<String>,
}

/// Collect every data-bearing field in a form schema, in document order.
///
/// Accepts either a whole form object (with an `elements` array) or a bare
/// array of elements. Elements without a `data_name` (sections, labels)
/// contribute only their nested elements.
pub fn extract_form_fields(form: &Value) -> Vec<FormField> {
    let mut fields = Vec::new();
    match form {
        Value::Array(elements) => collect_elements(elements, &mut fields),
        Value::Object(_) => {
            if let Some(Value::Array(elements)) = form.get("elements") {
                collect_elements(elements, &mut fields);
            }
        }
        _ => {}
    }
    fields
}

/// Just the field names, for feeding the resolver directly.
pub fn extract_field_names(form: &Value) -> Vec<String> {
    extract_form_fields(form)
        .into_iter()
        .map(|field| field.data_name)
        .collect()
}

fn collect_elements(elements: &[Value], fields: &mut Vec<FormField>) {
    for element in elements {
        if let Some(data_name) = element.get("data_name").and_then(Value::as_str)
            && !data_name.trim().is_empty()
        {
            fields.push(FormField {
                data_name: data_name.to_string(),
                label: element
                    .get("label")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
        if let Some(Value::Array(nested)) = element.get("elements") {
            collect_elements(nested, fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_nested_sections() {
        let form = json!({
            "name": "Bridge Survey",
            "elements": [
                {"type": "TextField", "data_name": "inspector", "label": "Inspector"},
                {
                    "type": "Section",
                    "label": "Measurements",
                    "elements": [
                        {"type": "TextField", "data_name": "slice_length", "label": "Slice Length"},
                        {
                            "type": "Repeatable",
                            "data_name": "readings",
                            "elements": [
                                {"type": "TextField", "data_name": "depth"}
                            ]
                        }
                    ]
                }
            ]
        });
        let names = extract_field_names(&form);
        assert_eq!(names, vec!["inspector", "slice_length", "readings", "depth"]);
    }

    #[test]
    fn accepts_bare_element_array() {
        let elements = json!([
            {"data_name": "notes", "label": "Notes"},
            {"type": "Label", "label": "Heading only"}
        ]);
        let fields = extract_form_fields(&elements);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].label.as_deref(), Some("Notes"));
    }

    #[test]
    fn non_container_values_yield_nothing() {
        assert!(extract_form_fields(&json!("just a string")).is_empty());
        assert!(extract_form_fields(&json!(null)).is_empty());
    }
}
