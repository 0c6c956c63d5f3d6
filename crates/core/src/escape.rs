/// Identifier escaping for ASP output.
///
/// PDDL identifiers may contain `-` and `@`, which are not valid in ASP
/// terms. `_` is used as the escape character, so it is doubled itself.
use std::borrow::Cow;

pub fn escape_asp(identifier: &str) -> Cow<'_, str> {
    if !identifier.contains(['_', '-', '@']) {
        return Cow::Borrowed(identifier);
    }

    let mut escaped = String::with_capacity(identifier.len() + 4);
    for character in identifier.chars() {
        match character {
            '_' => escaped.push_str("__"),
            '-' => escaped.push_str("_h"),
            '@' => escaped.push_str("_a"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// Inverse of [`escape_asp`]. Unknown escape sequences are kept verbatim.
pub fn unescape_asp(identifier: &str) -> Cow<'_, str> {
    if !identifier.contains('_') {
        return Cow::Borrowed(identifier);
    }

    let mut unescaped = String::with_capacity(identifier.len());
    let mut characters = identifier.chars();
    while let Some(character) = characters.next() {
        if character != '_' {
            unescaped.push(character);
            continue;
        }
        match characters.next() {
            Some('_') => unescaped.push('_'),
            Some('h') => unescaped.push('-'),
            Some('a') => unescaped.push('@'),
            Some(other) => {
                unescaped.push('_');
                unescaped.push(other);
            }
            None => unescaped.push('_'),
        }
    }
    Cow::Owned(unescaped)
}
