//! Delimited id-list codec.
//!
//! Ordered foreign-key lists are stored in a single column as comma-joined
//! integers (`"5,3,7"`). The column is decoded exactly once, when a row is
//! mapped into a record, so records only ever carry typed `Vec`s.

use std::fmt::Display;
use std::str::FromStr;

use crate::error::DomainError;

const SEPARATOR: char = ',';

/// Join ids in order. An empty list encodes as the empty string.
pub fn encode_id_list<I, T>(ids: I) -> String
where
    I: IntoIterator<Item = T>,
    T: Display,
{
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(&SEPARATOR.to_string())
}

/// Parse a delimited list, preserving order.
///
/// Blank input is an empty list. Any member that fails to parse rejects the
/// whole list: dropping one member would silently shift every later position,
/// which breaks lists that are paired by index.
pub fn parse_id_list<T: FromStr>(raw: &str) -> Result<Vec<T>, DomainError> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(SEPARATOR)
        .map(|member| {
            member
                .trim()
                .parse::<T>()
                .map_err(|_| DomainError::malformed_id_list(raw, member))
        })
        .collect()
}
