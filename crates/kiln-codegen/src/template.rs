//! Named-placeholder substitution over text templates.
//!
//! [`render`] walks the template once, left to right. At each position the
//! longest matching token is replaced and scanning resumes *after* it, so a
//! replacement value is never scanned again: a value containing another
//! token's text is emitted verbatim. Tokens with no matching pair are left
//! in place.
//!
//! Generated-code templates use the `{{NAME}}` shape. Static runtime assets
//! use comment-shaped markers instead (`<!-- KILN_CODE_FILES -->`).

/// Substitute every `(token, value)` pair into `template` in a single pass.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let first_bytes: Vec<u8> = substitutions
        .iter()
        .filter_map(|(token, _)| token.as_bytes().first().copied())
        .collect();

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while !rest.is_empty() {
        let candidate = rest
            .as_bytes()
            .first()
            .is_some_and(|b| first_bytes.contains(b));
        if candidate {
            if let Some((token, value)) = longest_token_at(rest, substitutions) {
                out.push_str(value);
                rest = &rest[token.len()..];
                continue;
            }
        }
        let mut chars = rest.chars();
        if let Some(ch) = chars.next() {
            out.push(ch);
        }
        rest = chars.as_str();
    }
    out
}

fn longest_token_at<'s>(
    text: &str,
    substitutions: &'s [(&'s str, &'s str)],
) -> Option<(&'s str, &'s str)> {
    substitutions
        .iter()
        .filter(|(token, _)| !token.is_empty() && text.starts_with(token))
        .max_by_key(|(token, _)| token.len())
        .map(|&(token, value)| (token, value))
}

/// List every `{{NAME}}` token still present in `text`, in order of appearance.
///
/// `NAME` is one or more of `A-Z`, `0-9` and `_`.
pub fn unresolved_placeholders(text: &str) -> Vec<String> {
    let mut found = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let name_len = after
            .bytes()
            .take_while(|b| b.is_ascii_uppercase() || b.is_ascii_digit() || *b == b'_')
            .count();
        if name_len > 0 && after[name_len..].starts_with("}}") {
            found.push(format!("{{{{{}}}}}", &after[..name_len]));
            rest = &after[name_len + 2..];
        } else {
            rest = after;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_every_occurrence() {
        let out = render("{{A}} and {{A}}", &[("{{A}}", "x")]);
        assert_eq!(out, "x and x");
    }

    #[test]
    fn replacement_is_not_rescanned() {
        let out = render(
            "{{X}} / {{Y}}",
            &[("{{X}}", "contains {{Y}}"), ("{{Y}}", "y")],
        );
        assert_eq!(out, "contains {{Y}} / y");
    }

    #[test]
    fn rescan_safety_holds_in_either_pair_order() {
        let a = render("{{X}}", &[("{{Y}}", "y"), ("{{X}}", "{{Y}}")]);
        let b = render("{{X}}", &[("{{X}}", "{{Y}}"), ("{{Y}}", "y")]);
        assert_eq!(a, "{{Y}}");
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_token_left_in_place() {
        let out = render("hello {{NAME}}", &[("{{OTHER}}", "x")]);
        assert_eq!(out, "hello {{NAME}}");
    }

    #[test]
    fn longest_token_wins_on_overlap() {
        let out = render(
            "BEHAVIOR_NAME BEHAVIOR_NAME_FULL",
            &[("BEHAVIOR_NAME", "short"), ("BEHAVIOR_NAME_FULL", "long")],
        );
        assert_eq!(out, "short long");
    }

    #[test]
    fn comment_markers_and_unicode() {
        let out = render(
            "<p>é</p><!-- KILN_CODE_FILES --><p>ü</p>",
            &[("<!-- KILN_CODE_FILES -->", "<script></script>")],
        );
        assert_eq!(out, "<p>é</p><script></script><p>ü</p>");
    }

    #[test]
    fn empty_token_is_ignored() {
        assert_eq!(render("abc", &[("", "x")]), "abc");
    }

    #[test]
    fn finds_unresolved_placeholders() {
        let found = unresolved_placeholders("a {{ONE}} b {{two}} c {{THREE_3}} {{");
        assert_eq!(found, vec!["{{ONE}}", "{{THREE_3}}"]);
    }
}
