//! Request handlers, one module per resource.

pub mod appointments;
pub mod health;
pub mod locations;
pub mod users;

/// Raw query string as ordered key/value pairs. Never rejects repeated keys.
pub(crate) type QueryPairs = Vec<(String, String)>;

/// First value given for `key`; later repetitions are ignored.
pub(crate) fn first_query_value(pairs: &[(String, String)], key: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.clone())
}
