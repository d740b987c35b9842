//! Admin-side configuration of SCIM provisioning providers.
//!
//! The interesting part is choosing which property mappings start selected
//! in the provider form: an explicit selection on the provider wins, and a
//! provider that never had one falls back to the managed default mappings.
//! See [`services::make_mappings_selector`] and
//! [`services::ScimMappingsProvider`].

pub mod api;
pub mod config;
pub mod dual_select;
pub mod form;
pub mod models;
#[cfg(feature = "cli")]
pub mod observability;
pub mod services;
