use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::FIELD_NAMES;

/// Key the server uses for messages that belong to no single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Validation messages keyed by form field name.
///
/// Produced by the server when a save is rejected; the form only displays
/// them. The server reports fields in snake_case (`filter_group`), which is
/// folded onto the form's field names (`filterGroup`). Keys that match no
/// field (e.g. `non_field_errors`) are kept as they are.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(form_field_key(field))
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Messages whose key is not one of the form's fields.
    pub fn unattached(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(field, _)| !FIELD_NAMES.contains(&field.as_str()))
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| (field.as_str(), m.as_str()))
            })
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Vec<String>>::deserialize(deserializer)?;
        let mut errors = FieldErrors::default();
        for (field, messages) in raw {
            errors
                .0
                .entry(form_field_key(&field))
                .or_default()
                .extend(messages);
        }
        Ok(errors)
    }
}

/// Form field name for a server-side key, or the key unchanged if it names no field.
fn form_field_key(key: &str) -> String {
    let mut parts = key.split('_');
    let camel = parts.next().unwrap_or_default().to_string()
        + &parts
            .map(|part| {
                let mut chars = part.chars();
                chars
                    .next()
                    .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                    .unwrap_or_default()
            })
            .collect::<String>();

    if FIELD_NAMES.contains(&camel.as_str()) {
        camel
    } else {
        key.to_string()
    }
}
