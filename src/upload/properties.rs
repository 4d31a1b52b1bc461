// src/upload/properties.rs
//! Conversion of extracted task fields into Notion property payloads.

use crate::model::WorkspaceUser;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Maps people names and emails to workspace user ids.
#[derive(Debug, Clone, Default)]
pub struct PeopleDirectory {
    ids: HashMap<String, String>,
}

impl PeopleDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a user under both its name and email. Bots are ignored.
    pub fn add(&mut self, user: &WorkspaceUser) {
        if !user.is_person {
            return;
        }
        for key in [&user.name, &user.email].into_iter().flatten() {
            if !key.is_empty() {
                self.ids.insert(key.clone(), user.id.clone());
            }
        }
    }

    pub fn lookup(&self, name_or_email: &str) -> Option<&str> {
        self.ids.get(name_or_email).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<'a> FromIterator<&'a WorkspaceUser> for PeopleDirectory {
    fn from_iter<I: IntoIterator<Item = &'a WorkspaceUser>>(iter: I) -> Self {
        let mut directory = PeopleDirectory::new();
        for user in iter {
            directory.add(user);
        }
        directory
    }
}

/// Text form of a scalar: strings verbatim, anything else as JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// A scalar or the first element of a list.
fn first_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.first().map(value_text).unwrap_or_default(),
        other => value_text(other),
    }
}

/// A list as-is, or a scalar as a one-element list.
fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_payload(kind: &str, text: String) -> Value {
    json!({ kind: [{ "type": "text", "text": { "content": text } }] })
}

/// Builds the property payload for one task field.
///
/// Returns `None` for blank values, values that cannot be represented in
/// the property's type, and property types that are not writable here.
pub fn build_property_payload(
    kind: &str,
    value: &Value,
    people: &PeopleDirectory,
) -> Option<Value> {
    if is_blank(value) {
        return None;
    }

    match kind {
        "title" | "rich_text" => Some(text_payload(kind, first_text(value))),
        "url" => Some(json!({ "url": value_text(value) })),
        "date" => Some(json!({ "date": { "start": value_text(value) } })),
        "number" => as_number(value).map(|n| json!({ "number": n })),
        "select" | "status" => Some(json!({ kind: { "name": value_text(value) } })),
        "multi_select" => {
            let names: Vec<Value> = as_list(value)
                .into_iter()
                .map(|v| json!({ "name": value_text(v) }))
                .collect();
            Some(json!({ "multi_select": names }))
        }
        "people" => {
            let ids: Vec<Value> = as_list(value)
                .into_iter()
                .filter_map(|v| people.lookup(&value_text(v)))
                .map(|id| json!({ "object": "user", "id": id }))
                .collect();
            (!ids.is_empty()).then(|| json!({ "people": ids }))
        }
        "relation" => {
            let ids: Vec<Value> = as_list(value)
                .into_iter()
                .map(|v| json!({ "id": value_text(v) }))
                .collect();
            Some(json!({ "relation": ids }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn people() -> PeopleDirectory {
        [
            WorkspaceUser {
                id: "u-1".into(),
                name: Some("Ada Lovelace".into()),
                email: Some("ada@example.com".into()),
                is_person: true,
            },
            WorkspaceUser {
                id: "bot-1".into(),
                name: Some("Importer".into()),
                email: None,
                is_person: false,
            },
        ]
        .iter()
        .collect()
    }

    #[test]
    fn directory_indexes_names_and_emails_of_people_only() {
        let dir = people();
        assert_eq!(dir.lookup("Ada Lovelace"), Some("u-1"));
        assert_eq!(dir.lookup("ada@example.com"), Some("u-1"));
        assert_eq!(dir.lookup("Importer"), None);
        assert_eq!(dir.len(), 2);
    }

    #[test]
    fn text_kinds_take_first_list_item() {
        let dir = PeopleDirectory::new();
        assert_eq!(
            build_property_payload("title", &json!(["Pay invoice", "ignored"]), &dir),
            Some(json!({"title": [{"type": "text", "text": {"content": "Pay invoice"}}]}))
        );
        assert_eq!(
            build_property_payload("rich_text", &json!("note"), &dir),
            Some(json!({"rich_text": [{"type": "text", "text": {"content": "note"}}]}))
        );
    }

    #[test]
    fn blank_values_are_dropped() {
        let dir = PeopleDirectory::new();
        for blank in [json!(null), json!(""), json!([])] {
            assert_eq!(build_property_payload("rich_text", &blank, &dir), None);
        }
    }

    #[test]
    fn numbers_parse_or_drop() {
        let dir = PeopleDirectory::new();
        assert_eq!(
            build_property_payload("number", &json!("2.5"), &dir),
            Some(json!({"number": 2.5}))
        );
        assert_eq!(
            build_property_payload("number", &json!(3), &dir),
            Some(json!({"number": 3.0}))
        );
        assert_eq!(build_property_payload("number", &json!("lots"), &dir), None);
    }

    #[test]
    fn choice_kinds() {
        let dir = PeopleDirectory::new();
        assert_eq!(
            build_property_payload("status", &json!("Done"), &dir),
            Some(json!({"status": {"name": "Done"}}))
        );
        assert_eq!(
            build_property_payload("multi_select", &json!("solo"), &dir),
            Some(json!({"multi_select": [{"name": "solo"}]}))
        );
        assert_eq!(
            build_property_payload("multi_select", &json!(["a", "b"]), &dir),
            Some(json!({"multi_select": [{"name": "a"}, {"name": "b"}]}))
        );
    }

    #[test]
    fn people_are_mapped_and_unknowns_dropped() {
        let dir = people();
        assert_eq!(
            build_property_payload("people", &json!(["Ada Lovelace", "Nobody"]), &dir),
            Some(json!({"people": [{"object": "user", "id": "u-1"}]}))
        );
        assert_eq!(build_property_payload("people", &json!("Nobody"), &dir), None);
    }

    #[test]
    fn dates_relations_and_unsupported_kinds() {
        let dir = PeopleDirectory::new();
        assert_eq!(
            build_property_payload("date", &json!("2024-05-01"), &dir),
            Some(json!({"date": {"start": "2024-05-01"}}))
        );
        assert_eq!(
            build_property_payload("relation", &json!("abc"), &dir),
            Some(json!({"relation": [{"id": "abc"}]}))
        );
        assert_eq!(build_property_payload("formula", &json!("x"), &dir), None);
    }
}
