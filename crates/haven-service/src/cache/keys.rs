//! Cache key construction.
//!
//! Every cached value lives under a key derived here, and every
//! invalidation scope is a glob over the same shapes:
//!
//! | family          | key                                       |
//! |-----------------|-------------------------------------------|
//! | property        | `property:<id>`                           |
//! | user profile    | `user:<id>`                               |
//! | search results  | `search:properties:<fingerprint>`         |
//! | user properties | `user:properties:<user>:<page>:<limit>`   |
//! | user favorites  | `user:favorites:<user>:<page>:<limit>`    |
//! | favorite status | `favorite:status:<user>:<property>`       |

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use haven_core::{HavenError, HavenResult, PageRequest, PropertyId, UserId};
use serde::Serialize;
use serde_json::Value;
use std::fmt::Write as _;

pub const PROPERTY: &str = "property";
pub const USER: &str = "user";
pub const SEARCH_PROPERTIES: &str = "search:properties";
pub const USER_PROPERTIES: &str = "user:properties";
pub const USER_FAVORITES: &str = "user:favorites";
pub const FAVORITE_STATUS: &str = "favorite:status";

#[must_use]
pub fn property(id: PropertyId) -> String {
    format!("{PROPERTY}:{id}")
}

#[must_use]
pub fn user_profile(id: UserId) -> String {
    format!("{USER}:{id}")
}

/// Key for one page of a user's own listings.
#[must_use]
pub fn user_properties(user_id: UserId, page: PageRequest) -> String {
    format!("{USER_PROPERTIES}:{user_id}:{}:{}", page.page, page.limit)
}

/// Key for one page of a user's favorites.
#[must_use]
pub fn user_favorites(user_id: UserId, page: PageRequest) -> String {
    format!("{USER_FAVORITES}:{user_id}:{}:{}", page.page, page.limit)
}

#[must_use]
pub fn favorite_status(user_id: UserId, property_id: PropertyId) -> String {
    format!("{FAVORITE_STATUS}:{user_id}:{property_id}")
}

/// Key for a property search, fingerprinted from its parameters.
pub fn search_properties<Q: Serialize + ?Sized>(query: &Q) -> HavenResult<String> {
    Ok(format!("{SEARCH_PROPERTIES}:{}", fingerprint(query)?))
}

/// Matches every cached search result.
#[must_use]
pub fn all_search_results() -> String {
    format!("{SEARCH_PROPERTIES}:*")
}

/// Matches every cached page of a user's listings.
#[must_use]
pub fn user_properties_pattern(user_id: UserId) -> String {
    format!("{USER_PROPERTIES}:{user_id}:*")
}

/// Matches every cached page of a user's favorites.
#[must_use]
pub fn user_favorites_pattern(user_id: UserId) -> String {
    format!("{USER_FAVORITES}:{user_id}:*")
}

/// Matches every cached favorites page, whoever owns it.
#[must_use]
pub fn all_user_favorites() -> String {
    format!("{USER_FAVORITES}:*")
}

/// Matches every user's favorite-status flag for one listing.
#[must_use]
pub fn favorite_status_for_property_pattern(property_id: PropertyId) -> String {
    format!("{FAVORITE_STATUS}:*:{property_id}")
}

/// Matches every key mentioning `id`, whatever the family.
#[must_use]
pub fn scope_pattern(id: &str) -> String {
    format!("*{id}*")
}

/// Base64 of the canonical JSON form of `query`.
///
/// Object members are emitted in lexicographic name order at every depth
/// and `null` members are dropped, so two queries with the same
/// `(name, value)` pairs always share a fingerprint.
pub fn fingerprint<Q: Serialize + ?Sized>(query: &Q) -> HavenResult<String> {
    let value = serde_json::to_value(query)
        .map_err(|e| HavenError::Cache(format!("Search query is not serializable: {e}")))?;

    let mut canonical = String::new();
    write_canonical(&value, &mut canonical);
    Ok(STANDARD.encode(canonical))
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut members: Vec<(&String, &Value)> =
                map.iter().filter(|(_, v)| !v.is_null()).collect();
            members.sort_by(|a, b| a.0.cmp(b.0));

            out.push('{');
            for (i, (name, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_scalar(&Value::String(name.clone()), out);
                out.push(':');
                write_canonical(member, out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => write_scalar(scalar, out),
    }
}

fn write_scalar(value: &Value, out: &mut String) {
    // Display on a Value is its compact JSON text.
    let _ = write!(out, "{value}");
}
