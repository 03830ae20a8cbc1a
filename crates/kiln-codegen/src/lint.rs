//! Checks over generated text for the markers lenient generation leaves behind.

use kiln_types::{Diagnostic, DiagnosticCode, Diagnostics};

use crate::behavior::UNKNOWN_FUNCTION_SENTINEL;
use crate::property::UNRECOGNIZED_TYPE_MARKER;
use crate::template::unresolved_placeholders;

/// Report every sentinel method name, unrecognized-type marker and leftover
/// `{{NAME}}` placeholder in `code`. `subject` names the checked file.
pub fn lint_generated(code: &str, subject: &str) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();

    let sentinels = code.matches(UNKNOWN_FUNCTION_SENTINEL).count();
    if sentinels > 0 {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::UNMAPPED_FUNCTION_NAME,
                format!("{sentinels} method(s) generated without a mangled name"),
            )
            .with_subject(subject),
        );
    }

    let markers = code.matches(UNRECOGNIZED_TYPE_MARKER).count();
    if markers > 0 {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::UNRECOGNIZED_PROPERTY_TYPE,
                format!("{markers} value(s) of an unrecognized property type"),
            )
            .with_subject(subject),
        );
    }

    for placeholder in unresolved_placeholders(code) {
        diagnostics.push(
            Diagnostic::warning(
                DiagnosticCode::UNRESOLVED_PLACEHOLDER,
                format!("placeholder {placeholder} was never substituted"),
            )
            .with_subject(subject),
        );
    }

    diagnostics
}
