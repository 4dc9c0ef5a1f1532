//! ID prefixes.
//!
//! IDs are generated by the database as `{prefix}-{8 hex chars}`
//! (see `OcdDb::generate_id`). The prefix makes an ID self-describing in logs
//! and trail files.

pub const PREFIX_DECISION: &str = "dec";
pub const PREFIX_ITEM: &str = "itm";
pub const PREFIX_AUDIT: &str = "aud";

pub const ALL_PREFIXES: [&str; 3] = [PREFIX_DECISION, PREFIX_ITEM, PREFIX_AUDIT];

/// Returns the prefix part of an ID, if it has one we know.
#[must_use]
pub fn prefix_of(id: &str) -> Option<&'static str> {
    let (prefix, rest) = id.split_once('-')?;
    if rest.is_empty() {
        return None;
    }
    ALL_PREFIXES.into_iter().find(|p| *p == prefix)
}
