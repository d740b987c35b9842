mod groups;
mod property_mappings;

pub use groups::{GroupLookup, is_filter_group};
pub use property_mappings::{
    MAPPINGS_ORDERING, MAPPINGS_PAGE_SIZE, ScimMappingsProvider, make_mappings_selector,
    selector_for,
};
