// ABOUTME: Diagnostics accumulator for non-fatal warnings during a pipeline run.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during pipeline stages.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Take ownership of the collected warnings.
    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The image scan reported findings.
    pub fn scan_findings(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ScanFindings, message)
    }

    /// The image scan could not be started or read.
    pub fn scan_unavailable(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ScanUnavailable, message)
    }

    /// No exposure strategy produced an external address.
    pub fn exposure_unresolved(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ExposureUnresolved, message)
    }

    /// An exposure strategy failed and the next one was tried.
    pub fn exposure_fallback(message: impl Into<String>) -> Self {
        Self::new(WarningKind::ExposureFallback, message)
    }
}

/// Categories of warnings that can occur during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Vulnerability scan completed with findings.
    ScanFindings,
    /// Vulnerability scan could not be performed.
    ScanUnavailable,
    /// The service is running but has no external address yet.
    ExposureUnresolved,
    /// An exposure strategy expired and the next one was tried.
    ExposureFallback,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings_in_order() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::scan_findings("scan complete: 2 high"));
        diag.warn(Warning::exposure_unresolved("no address after 6m"));

        assert!(diag.has_warnings());
        let kinds: Vec<_> = diag.warnings().iter().map(|w| w.kind).collect();
        assert_eq!(
            kinds,
            [WarningKind::ScanFindings, WarningKind::ExposureUnresolved]
        );
    }

    #[test]
    fn warning_kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&Warning::scan_unavailable("denied")).unwrap();
        assert_eq!(json, r#"{"kind":"scan_unavailable","message":"denied"}"#);
    }
}
