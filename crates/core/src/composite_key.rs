//! Composite ledger keys.
//!
//! Keys use the platform layout: `\u{0}objectType\u{0}attr1\u{0}attr2\u{0}`.
//! Because every component is terminated by the separator, the key of a partial
//! attribute list is a strict prefix of every full key that extends it, which is
//! what partial-key range queries rely on.

use crate::error::{DomainError, DomainResult};

const SEPARATOR: char = '\u{0}';
const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

fn validate_component(component: &str, what: &str) -> DomainResult<()> {
    if component.contains(SEPARATOR) || component.contains(MAX_UNICODE_RUNE) {
        return Err(DomainError::validation(format!(
            "{what} '{}' contains a reserved character",
            component.escape_debug()
        )));
    }
    Ok(())
}

/// Build a composite key from an object type and its attributes.
///
/// With fewer attributes than the entity defines this yields a partial key,
/// usable as a range-query prefix.
pub fn create_composite_key<S: AsRef<str>>(object_type: &str, attributes: &[S]) -> DomainResult<String> {
    if object_type.is_empty() {
        return Err(DomainError::validation("composite key object type must not be empty"));
    }
    validate_component(object_type, "object type")?;

    let mut key = String::with_capacity(
        2 + object_type.len() + attributes.iter().map(|a| a.as_ref().len() + 1).sum::<usize>(),
    );
    key.push(SEPARATOR);
    key.push_str(object_type);
    key.push(SEPARATOR);
    for attribute in attributes {
        let attribute = attribute.as_ref();
        validate_component(attribute, "attribute")?;
        key.push_str(attribute);
        key.push(SEPARATOR);
    }
    Ok(key)
}

/// Split a composite key back into its object type and attributes.
pub fn split_composite_key(key: &str) -> DomainResult<(String, Vec<String>)> {
    let body = key
        .strip_prefix(SEPARATOR)
        .and_then(|k| k.strip_suffix(SEPARATOR))
        .ok_or_else(|| DomainError::invalid_id(format!("'{}' is not a composite key", key.escape_debug())))?;

    let mut parts = body.split(SEPARATOR).map(str::to_string);
    let object_type = parts
        .next()
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DomainError::invalid_id("composite key has no object type"))?;
    Ok((object_type, parts.collect()))
}
