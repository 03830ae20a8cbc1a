use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity.
///
/// Every soft failure is a warning. Hard failures are `Err` values, never
/// diagnostics; strict exports turn warnings into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

/// Pipeline stage a diagnostic belongs to, determined by code range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticStage {
    Codegen,
    Export,
}

/// Numeric diagnostic code (W100–W299).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiagnosticCode(pub u16);

impl DiagnosticCode {
    // ── Codegen (W100–W199) ──
    pub const UNMAPPED_FUNCTION_NAME: Self = Self(100);
    pub const UNRECOGNIZED_PROPERTY_TYPE: Self = Self(101);
    pub const UNRESOLVED_PLACEHOLDER: Self = Self(102);

    // ── Export (W200–W299) ──
    pub const MISSING_RESOURCE_FILE: Self = Self(200);
    pub const MISSING_INCLUDE_FILE: Self = Self(201);
    pub const MISSING_SOURCE_FILE: Self = Self(202);
    pub const MISSING_ICON_FILE: Self = Self(203);

    pub fn stage(self) -> DiagnosticStage {
        match self.0 {
            200..=299 => DiagnosticStage::Export,
            _ => DiagnosticStage::Codegen,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}", self.0)
    }
}

/// A structured report of something that went wrong without stopping the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub stage: DiagnosticStage,
    pub message: String,
    /// File path or symbol name the diagnostic is about.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Diagnostic {
    /// Create a warning.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            code,
            severity: Severity::Warning,
            stage: code.stage(),
            message: message.into(),
            subject: None,
        }
    }

    /// Attach the path or name the diagnostic is about.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "{} [{}] {} ({})", self.code, self.stage, self.message, subject),
            None => write!(f, "{} [{}] {}", self.code, self.stage, self.message),
        }
    }
}

impl fmt::Display for DiagnosticStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Codegen => write!(f, "codegen"),
            Self::Export => write!(f, "export"),
        }
    }
}

/// Diagnostics gathered over one generation or export run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Record a warning about `subject`.
    pub fn warn(
        &mut self,
        code: DiagnosticCode,
        message: impl Into<String>,
        subject: impl Into<String>,
    ) {
        self.push(Diagnostic::warning(code, message).with_subject(subject));
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn has_warnings(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Warning)
    }

    pub fn count(&self, code: DiagnosticCode) -> usize {
        self.items.iter().filter(|d| d.code == code).count()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_stage() {
        assert_eq!(
            DiagnosticCode::UNMAPPED_FUNCTION_NAME.stage(),
            DiagnosticStage::Codegen
        );
        assert_eq!(
            DiagnosticCode::MISSING_INCLUDE_FILE.stage(),
            DiagnosticStage::Export
        );
    }

    #[test]
    fn test_code_display() {
        assert_eq!(format!("{}", DiagnosticCode::UNRECOGNIZED_PROPERTY_TYPE), "W101");
        assert_eq!(format!("{}", DiagnosticCode::MISSING_RESOURCE_FILE), "W200");
    }

    #[test]
    fn test_diagnostic_display_with_subject() {
        let d = Diagnostic::warning(DiagnosticCode::MISSING_INCLUDE_FILE, "include not found")
            .with_subject("libs/foo.js");
        assert_eq!(d.to_string(), "W201 [export] include not found (libs/foo.js)");
    }

    #[test]
    fn test_diagnostics_json_output() {
        let mut diags = Diagnostics::new();
        diags.warn(
            DiagnosticCode::UNMAPPED_FUNCTION_NAME,
            "no mangled name",
            "doStuff",
        );
        let json = serde_json::to_string(&diags).unwrap();
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(json.contains("\"stage\":\"codegen\""));
        assert!(json.contains("\"subject\":\"doStuff\""));
        assert!(diags.has_warnings());
    }

    #[test]
    fn test_diagnostics_count_and_append() {
        let mut a = Diagnostics::new();
        a.warn(DiagnosticCode::MISSING_RESOURCE_FILE, "missing", "a.png");
        let mut b = Diagnostics::new();
        b.warn(DiagnosticCode::MISSING_RESOURCE_FILE, "missing", "b.png");
        b.warn(DiagnosticCode::MISSING_INCLUDE_FILE, "missing", "c.js");
        a.append(b);
        assert_eq!(a.len(), 3);
        assert_eq!(a.count(DiagnosticCode::MISSING_RESOURCE_FILE), 2);
    }

    #[test]
    fn test_empty_diagnostics() {
        let diags = Diagnostics::new();
        assert!(diags.is_empty());
        assert!(!diags.has_warnings());
    }

    #[test]
    fn test_severity_has_only_warning() {
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), "\"warning\"");
        assert!(serde_json::from_str::<Severity>("\"error\"").is_err());
    }
}
