use std::borrow::Cow;

use thiserror::Error;

use crate::str_ext::StrExt as _;

/// A character outside printable ASCII, found by [`validate`]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{character:?} at position {position} is not printable ASCII")]
pub struct InvalidInput {
    /// Position of the character in the input, counted in `char`s
    pub position: usize,
    /// The offending character
    pub character: char,
}

/// Checks that every character of `text` is printable ASCII (`' '` through `'~'`) or a `\n`
/// line separator.
///
/// Every character is checked individually, so a valid first character does not hide an invalid
/// one later on. The empty string is valid.
///
/// # Errors
/// Returns the first character that is not allowed.
pub fn validate(text: &str) -> Result<(), InvalidInput> {
    match text.first_unprintable() {
        Some((position, character)) => Err(InvalidInput {
            position,
            character,
        }),
        None => Ok(()),
    }
}

/// Converts `\r\n` line breaks (as submitted by HTML forms) to `\n`.
#[must_use]
pub fn normalize_newlines(text: &str) -> Cow<'_, str> {
    if text.contains("\r\n") {
        Cow::Owned(text.replace("\r\n", "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
