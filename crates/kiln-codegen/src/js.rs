//! Script literal and identifier helpers.

use std::fmt::Write;

/// Render `value` as a double-quoted script string literal.
pub fn quote_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Mangle a display name into an identifier fragment.
///
/// ASCII letters and digits are kept; every other character becomes
/// `_<code point>`. Underscores are mangled too, which keeps the mapping
/// injective.
pub fn mangle_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else {
            let _ = write!(out, "_{}", ch as u32);
        }
    }
    out
}

/// Identifier used by package manifests: mangled, lowercased, dash-separated.
pub fn package_identifier(name: &str) -> String {
    mangle_name(name).to_lowercase().replace(' ', "-")
}

/// Make `text` safe to embed inside a `/* … */` comment.
pub fn comment_safe(text: &str) -> String {
    text.replace("*/", "* /")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quote_string("hello"), "\"hello\"");
        assert_eq!(quote_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(quote_string("line\nbreak"), "\"line\\nbreak\"");
        assert_eq!(quote_string("\u{0007}"), "\"\\u0007\"");
    }

    #[test]
    fn mangles_non_alphanumerics() {
        assert_eq!(mangle_name("Player"), "Player");
        assert_eq!(mangle_name("My Game"), "My_32Game");
        assert_eq!(mangle_name("a_b"), "a_95b");
        assert_ne!(mangle_name("a b"), mangle_name("a_32b"));
    }

    #[test]
    fn package_identifier_is_lowercase() {
        assert_eq!(package_identifier("Super Game"), "super_32game");
    }

    #[test]
    fn comment_safe_breaks_terminators() {
        assert_eq!(comment_safe("a */ b"), "a * / b");
    }
}
