//! SCIM provider configuration models.
//!
//! Key concepts:
//! - `ScimMapping`: a property mapping from the remote `provider-scim` catalog
//! - `ProviderDraft`: the in-progress provider configuration being edited
//! - `MappingSelection`: whether a draft has ever carried an explicit mapping list

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Managed key of the default user property mapping for SCIM providers.
pub const MANAGED_SCIM_USER: &str = "goauthentik.io/providers/scim/user";

/// Managed key of the default group property mapping for SCIM providers.
pub const MANAGED_SCIM_GROUP: &str = "goauthentik.io/providers/scim/group";

// =============================================================================
// ScimMapping - Property mapping catalog record
// =============================================================================

/// A SCIM property mapping as returned by the mapping catalog.
///
/// `managed` is set only on system-provided defaults; user-authored mappings
/// leave it empty. Records are read-only from this crate's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScimMapping {
    /// Opaque primary key of the mapping
    pub pk: String,
    /// Display name
    pub name: String,
    /// Managed key identifying a system default (e.g. [`MANAGED_SCIM_USER`])
    #[serde(default)]
    pub managed: Option<String>,
    /// Mapping expression source
    #[serde(default)]
    pub expression: String,
    /// UI component name reported by the server
    #[serde(default)]
    pub component: String,
}

impl ScimMapping {
    /// Whether this mapping is the managed default identified by `key`.
    pub fn is_managed_as(&self, key: &str) -> bool {
        self.managed.as_deref() == Some(key)
    }
}

// =============================================================================
// MappingSelection - Unset vs explicit mapping lists
// =============================================================================

/// The mapping selection carried by a provider draft.
///
/// `Unset` and `Explicit(vec![])` are deliberately distinct: a draft that has
/// never had a selection falls back to managed defaults, while an explicitly
/// empty selection pre-selects nothing.
///
/// On the wire an absent field or `null` is `Unset`; any array is `Explicit`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MappingSelection {
    #[default]
    Unset,
    Explicit(Vec<String>),
}

impl MappingSelection {
    pub fn explicit<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Explicit(ids.into_iter().map(Into::into).collect())
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Explicitly selected ids, or `None` when no selection was ever made.
    pub fn ids(&self) -> Option<&[String]> {
        match self {
            Self::Unset => None,
            Self::Explicit(ids) => Some(ids),
        }
    }

    /// Deduplicated id set for membership tests.
    pub fn id_set(&self) -> Option<HashSet<String>> {
        self.ids().map(|ids| ids.iter().cloned().collect())
    }
}

impl From<Option<Vec<String>>> for MappingSelection {
    fn from(value: Option<Vec<String>>) -> Self {
        match value {
            Some(ids) => Self::Explicit(ids),
            None => Self::Unset,
        }
    }
}

impl Serialize for MappingSelection {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.ids().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MappingSelection {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Vec<String>>::deserialize(deserializer)?.into())
    }
}

// =============================================================================
// MappingKind - which mapping field of the provider
// =============================================================================

/// The two property-mapping fields of a SCIM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    User,
    Group,
}

impl MappingKind {
    /// Managed key of the default mapping pre-selected for new providers.
    pub fn managed_default(&self) -> &'static str {
        match self {
            MappingKind::User => MANAGED_SCIM_USER,
            MappingKind::Group => MANAGED_SCIM_GROUP,
        }
    }

    /// Form field that carries this selection.
    pub fn field_name(&self) -> &'static str {
        match self {
            MappingKind::User => crate::form::FIELD_PROPERTY_MAPPINGS,
            MappingKind::Group => crate::form::FIELD_PROPERTY_MAPPINGS_GROUP,
        }
    }
}

impl std::str::FromStr for MappingKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MappingKind::User),
            "group" => Ok(MappingKind::Group),
            other => Err(format!("unknown mapping kind '{other}' (expected user or group)")),
        }
    }
}

// =============================================================================
// ProviderDraft - provider configuration under edit
// =============================================================================

/// A partial SCIM provider configuration as loaded into the edit form.
///
/// Every field may be missing: a brand-new provider starts as
/// `ProviderDraft::default()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SCIM base URL, usually ending in `/v2`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verify_certificates: Option<bool>,
    /// Bearer token used against the SCIM server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_users_service_account: Option<bool>,
    /// Only users within this group are synced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_group: Option<String>,
    /// User property mapping selection
    #[serde(default, skip_serializing_if = "MappingSelection::is_unset")]
    pub property_mappings: MappingSelection,
    /// Group property mapping selection
    #[serde(default, skip_serializing_if = "MappingSelection::is_unset")]
    pub property_mappings_group: MappingSelection,
}

impl ProviderDraft {
    /// Selection carried for the given mapping field.
    pub fn selection(&self, kind: MappingKind) -> &MappingSelection {
        match kind {
            MappingKind::User => &self.property_mappings,
            MappingKind::Group => &self.property_mappings_group,
        }
    }
}
