use serde::{Deserialize, Serialize};

/// A group as returned by the group catalog.
///
/// Only the fields the provider form needs are modelled; anything else in
/// the response is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub pk: String,
    pub name: String,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default)]
    pub parent_name: Option<String>,
}
