//! SCIM provider form composition.
//!
//! Turns a provider draft into a serialisable description of the edit form:
//! field names, labels, initial values with their defaults, and the
//! validation messages to show next to each field. Rendering the description
//! is up to the caller.

mod errors;

pub use errors::*;
use serde::Serialize;

use crate::{
    dual_select::SelectionPredicate,
    models::{MappingKind, ProviderDraft},
    services::selector_for,
};

pub const FIELD_NAME: &str = "name";
pub const FIELD_URL: &str = "url";
pub const FIELD_VERIFY_CERTIFICATES: &str = "verifyCertificates";
pub const FIELD_TOKEN: &str = "token";
pub const FIELD_EXCLUDE_USERS_SERVICE_ACCOUNT: &str = "excludeUsersServiceAccount";
pub const FIELD_FILTER_GROUP: &str = "filterGroup";
pub const FIELD_PROPERTY_MAPPINGS: &str = "propertyMappings";
pub const FIELD_PROPERTY_MAPPINGS_GROUP: &str = "propertyMappingsGroup";

/// Every field the form exposes, in display order.
pub const FIELD_NAMES: [&str; 8] = [
    FIELD_NAME,
    FIELD_URL,
    FIELD_VERIFY_CERTIFICATES,
    FIELD_TOKEN,
    FIELD_EXCLUDE_USERS_SERVICE_ACCOUNT,
    FIELD_FILTER_GROUP,
    FIELD_PROPERTY_MAPPINGS,
    FIELD_PROPERTY_MAPPINGS_GROUP,
];

/// Input widget of a form field with its initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Widget {
    Text {
        value: String,
    },
    Switch {
        checked: bool,
        label: &'static str,
    },
    /// Remote group search; `selected` is the pk of the current group.
    GroupSearch {
        selected: Option<String>,
        blankable: bool,
    },
    /// Dual-list mapping selector fed by the mapping catalog.
    MappingSelect {
        kind: MappingKind,
        managed_default: &'static str,
        available_label: &'static str,
        selected_label: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<&'static str>,
    pub widget: Widget,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSection {
    /// Collapsible group header; `None` for top-level fields.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<&'static str>,
    pub fields: Vec<FieldView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub sections: Vec<FormSection>,
    /// Messages shown above the form because they belong to no field.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl FormView {
    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.sections
            .iter()
            .flat_map(|s| s.fields.iter())
            .find(|f| f.name == name)
    }
}

/// Edit form for a SCIM provider.
///
/// `draft` is `None` while creating a new provider.
#[derive(Debug, Clone, Default)]
pub struct ScimProviderForm {
    draft: Option<ProviderDraft>,
    errors: FieldErrors,
}

impl ScimProviderForm {
    pub fn new(draft: Option<ProviderDraft>, errors: FieldErrors) -> Self {
        Self { draft, errors }
    }

    pub fn draft(&self) -> Option<&ProviderDraft> {
        self.draft.as_ref()
    }

    /// Pre-selection predicate for a mapping field of this draft.
    pub fn selector(&self, kind: MappingKind) -> SelectionPredicate {
        selector_for(self.draft.as_ref(), kind)
    }

    pub fn render(&self) -> FormView {
        let draft = self.draft.as_ref();

        let name = self.field(
            FIELD_NAME,
            Some("Name"),
            true,
            None,
            Widget::Text {
                value: draft.and_then(|d| d.name.clone()).unwrap_or_default(),
            },
        );

        let protocol = vec![
            self.field(
                FIELD_URL,
                Some("URL"),
                true,
                Some("SCIM base url, usually ends in /v2."),
                Widget::Text {
                    value: draft.and_then(|d| d.url.clone()).unwrap_or_default(),
                },
            ),
            self.field(
                FIELD_VERIFY_CERTIFICATES,
                None,
                false,
                None,
                Widget::Switch {
                    checked: draft.and_then(|d| d.verify_certificates).unwrap_or(true),
                    label: "Verify SCIM server's certificates",
                },
            ),
            self.field(
                FIELD_TOKEN,
                Some("Token"),
                true,
                Some(
                    "Token to authenticate with. Currently only bearer authentication is supported.",
                ),
                Widget::Text {
                    value: draft.and_then(|d| d.token.clone()).unwrap_or_default(),
                },
            ),
        ];

        let filtering = vec![
            self.field(
                FIELD_EXCLUDE_USERS_SERVICE_ACCOUNT,
                None,
                false,
                None,
                Widget::Switch {
                    checked: draft
                        .and_then(|d| d.exclude_users_service_account)
                        .unwrap_or(true),
                    label: "Exclude service accounts",
                },
            ),
            self.field(
                FIELD_FILTER_GROUP,
                Some("Group"),
                false,
                Some("Only sync users within the selected group."),
                Widget::GroupSearch {
                    selected: draft.and_then(|d| d.filter_group.clone()),
                    blankable: true,
                },
            ),
        ];

        let mapping = vec![
            self.field(
                FIELD_PROPERTY_MAPPINGS,
                Some("User Property Mappings"),
                false,
                Some("Property mappings used to user mapping."),
                Widget::MappingSelect {
                    kind: MappingKind::User,
                    managed_default: MappingKind::User.managed_default(),
                    available_label: "Available User Property Mappings",
                    selected_label: "Selected User Property Mappings",
                },
            ),
            self.field(
                FIELD_PROPERTY_MAPPINGS_GROUP,
                Some("Group Property Mappings"),
                false,
                Some("Property mappings used to group creation."),
                Widget::MappingSelect {
                    kind: MappingKind::Group,
                    managed_default: MappingKind::Group.managed_default(),
                    available_label: "Available Group Property Mappings",
                    selected_label: "Selected Group Property Mappings",
                },
            ),
        ];

        FormView {
            sections: vec![
                FormSection {
                    header: None,
                    fields: vec![name],
                },
                FormSection {
                    header: Some("Protocol settings"),
                    fields: protocol,
                },
                FormSection {
                    header: Some("User filtering"),
                    fields: filtering,
                },
                FormSection {
                    header: Some("Attribute mapping"),
                    fields: mapping,
                },
            ],
            errors: self
                .errors
                .unattached()
                .map(|(key, message)| match key {
                    NON_FIELD_ERRORS => message.to_string(),
                    key => format!("{key}: {message}"),
                })
                .collect(),
        }
    }

    fn field(
        &self,
        name: &'static str,
        label: Option<&'static str>,
        required: bool,
        help: Option<&'static str>,
        widget: Widget,
    ) -> FieldView {
        FieldView {
            name,
            label,
            required,
            help,
            widget,
            errors: self.errors.get(name).to_vec(),
        }
    }
}
