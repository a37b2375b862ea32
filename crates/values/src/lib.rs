//! Unit and magnitude helpers for size/width bound strings.
//!
//! Bounds travel through the transform as raw strings ("16px", "1.5em",
//! "-1px"). This crate classifies their units and extracts magnitudes with
//! parseFloat semantics: the longest numeric prefix is taken, and values
//! without one read as NaN so malformed input degrades instead of panicking.

#![forbid(unsafe_code)]

use cssparser::{Parser, ParserInput, Token};

/// Unit of a size or width bound. `Unrecognized` is an explicit variant:
/// for a minimum size it is a hard failure, everywhere else a warning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitKind {
    Px,
    Rem,
    Em,
    Unrecognized,
}

/// Extract the unit from a value string.
///
/// Scans left to right and returns the first occurrence of `px`, `rem` or
/// `em`, trying them in that order at each position, so `1.5rem` reads as
/// rem rather than em.
pub fn find_unit(value: &str) -> UnitKind {
    for (index, _) in value.char_indices() {
        let rest = &value[index..];
        if rest.starts_with("px") {
            return UnitKind::Px;
        }
        if rest.starts_with("rem") {
            return UnitKind::Rem;
        }
        if rest.starts_with("em") {
            return UnitKind::Em;
        }
    }
    UnitKind::Unrecognized
}

/// Parse the leading numeric magnitude of a value string (parseFloat
/// semantics): optional sign, digits with an optional fraction, an optional
/// exponent, anything after the number ignored. `None` when the string does
/// not start with a number.
pub fn leading_magnitude(value: &str) -> Option<f64> {
    let text = value.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let mut digit_count = 0;
    while bytes.get(end).is_some_and(|byte| byte.is_ascii_digit()) {
        end += 1;
        digit_count += 1;
    }
    if bytes.get(end) == Some(&b'.') {
        end += 1;
        while bytes.get(end).is_some_and(|byte| byte.is_ascii_digit()) {
            end += 1;
            digit_count += 1;
        }
    }
    if digit_count == 0 {
        return None;
    }
    // An exponent only counts when at least one digit follows it.
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exponent_end = end + 1;
        if matches!(bytes.get(exponent_end), Some(b'+' | b'-')) {
            exponent_end += 1;
        }
        let exponent_digits_start = exponent_end;
        while bytes
            .get(exponent_end)
            .is_some_and(|byte| byte.is_ascii_digit())
        {
            exponent_end += 1;
        }
        if exponent_end > exponent_digits_start {
            end = exponent_end;
        }
    }
    text.get(..end)?.parse().ok()
}

/// Like [`leading_magnitude`], but reads a missing magnitude as NaN so
/// arithmetic on malformed bounds degrades instead of panicking.
#[inline]
pub fn magnitude_or_nan(value: &str) -> f64 {
    leading_magnitude(value).unwrap_or(f64::NAN)
}

/// Scan a value string for numeric tokens (optionally signed, optionally
/// unit-suffixed) and return their raw text in order. Idents such as the
/// `fluid` marker are skipped.
pub fn scan_dimension_tokens(value: &str) -> Vec<String> {
    let mut input = ParserInput::new(value);
    let mut parser = Parser::new(&mut input);
    let mut tokens: Vec<String> = Vec::new();
    loop {
        let start = parser.position();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };
        if matches!(token, Token::Number { .. } | Token::Dimension { .. }) {
            tokens.push(parser.slice_from(start).to_owned());
        }
    }
    tokens
}

/// Px -> rem conversion against a root font size, both given as raw strings.
pub fn px_to_rem(px: &str, root: &str) -> String {
    let ratio = magnitude_or_nan(px) / magnitude_or_nan(root);
    format!("{ratio}rem")
}
