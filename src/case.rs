//! Conversions between the five key naming conventions.
//!
//! Every configuration key has up to five surface spellings — `UPPER_SNAKE`,
//! `camelCase`, `kebab-case`, `snake_case`, `PascalCase` — and all of them
//! must resolve to the same logical value. These functions are pure, total,
//! and idempotent under their own convention: feeding a function its own
//! output returns that output unchanged. There is no "invalid input" error;
//! malformed strings produce a best-effort result.
//!
//! One caveat, kept deliberately: [`to_camel`] and [`to_pascal`] lowercase
//! the whole input before splitting on separators, so word boundaries that
//! exist only as interior capitals are lost — `to_camel("ApiKey")` is
//! `"apikey"`, not `"apiKey"`. Callers that want round-trips should name
//! keys with explicit separators.

/// Convert a key to `UPPER_SNAKE_CASE` (the environment-store spelling).
///
/// ```
/// use clenv::case::to_upper_snake;
///
/// assert_eq!(to_upper_snake("apiKey"), "API_KEY");
/// assert_eq!(to_upper_snake("my-variable-name"), "MY_VARIABLE_NAME");
/// ```
pub fn to_upper_snake(s: &str) -> String {
    // Already uppercase: only separators need replacing.
    if !s.chars().any(char::is_lowercase) {
        return s.replace(['-', ' '], "_");
    }

    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push('_');
        }
        if c == '-' || c == ' ' {
            out.push('_');
        } else {
            out.push(c.to_ascii_uppercase());
        }
    }
    collapse(&out, '_')
}

/// Convert a key to `camelCase` (the result-object spelling).
///
/// ```
/// use clenv::case::to_camel;
///
/// assert_eq!(to_camel("api-key"), "apiKey");
/// assert_eq!(to_camel("API_KEY"), "apiKey");
/// ```
pub fn to_camel(s: &str) -> String {
    capitalize_after_separators(s, false)
}

/// Convert a key to `kebab-case` (the long-flag spelling).
///
/// ```
/// use clenv::case::to_kebab;
///
/// assert_eq!(to_kebab("apiKey"), "api-key");
/// assert_eq!(to_kebab("API_KEY"), "api-key");
/// ```
pub fn to_kebab(s: &str) -> String {
    separate_words(s, '-')
}

/// Convert a key to `snake_case`.
///
/// ```
/// use clenv::case::to_snake;
///
/// assert_eq!(to_snake("apiKey"), "api_key");
/// assert_eq!(to_snake("api-key"), "api_key");
/// ```
pub fn to_snake(s: &str) -> String {
    separate_words(s, '_')
}

/// Convert a key to `PascalCase`.
///
/// ```
/// use clenv::case::to_pascal;
///
/// assert_eq!(to_pascal("api-key"), "ApiKey");
/// assert_eq!(to_pascal("api_key"), "ApiKey");
/// ```
pub fn to_pascal(s: &str) -> String {
    capitalize_after_separators(s, true)
}

/// Shared lowering for kebab and snake: uppercase letters start a new word,
/// existing separators are normalized to `sep`, everything is lowercased.
fn separate_words(s: &str, sep: char) -> String {
    // Already UPPER_SNAKE: lowercase and swap the separator directly.
    if s.contains('_') && s.chars().all(|c| c.is_uppercase() || c == '_') {
        return s.replace('_', &sep.to_string()).to_lowercase();
    }

    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            out.push(sep);
        }
        if c == '_' || c == '-' || c == ' ' {
            out.push(sep);
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    collapse(&out, sep)
}

/// Shared lowering for camel and pascal. Lowercases the whole input first
/// (losing interior-capital word boundaries), then uppercases the character
/// following each separator run.
fn capitalize_after_separators(s: &str, first_upper: bool) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = first_upper;
    for c in s.to_lowercase().chars() {
        if c == '-' || c == '_' || c == ' ' {
            capitalize_next = true;
        } else if capitalize_next {
            out.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    if !first_upper
        && let Some(first) = out.chars().next()
        && first.is_uppercase()
    {
        out = first.to_lowercase().to_string() + &out[first.len_utf8()..];
    }
    out
}

/// Strip a leading separator and squeeze repeated separators down to one.
fn collapse(s: &str, sep: char) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_sep = true; // also drops the leading separator
    for c in s.chars() {
        if c == sep {
            if !prev_sep {
                out.push(c);
            }
            prev_sep = true;
        } else {
            out.push(c);
            prev_sep = false;
        }
    }
    out
}
