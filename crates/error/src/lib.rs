//! Shared error envelope for every Flowsint engine crate.
//!
//! Crate-local errors implement [`thiserror::Error`] and convert into
//! [`FlowError`] at crate boundaries via `From`, so callers at the edge of
//! the system (the task runtime, the HTTP layer) only ever need to match on
//! one error type while internal code keeps precise, crate-local enums.

use std::fmt;

mod kind;

pub use kind::ErrorKind;

/// Result type used throughout the Flowsint engine crates.
pub type Result<T> = std::result::Result<T, FlowError>;

/// The error taxonomy from the engine's error handling design: every error
/// that crosses a component boundary carries a [`ErrorKind`], a stable
/// `code` for programmatic handling, and a human-readable `message`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowError {
    kind: ErrorKind,
    code: &'static str,
    message: String,
}

impl FlowError {
    /// `preprocess` of any enricher, or the branch compiler on a malformed
    /// edge. Surfaces as: step -> error; run aborts; `Scan.status = failed`.
    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            code: "VALIDATION_ERROR",
            message: message.into(),
        }
    }

    /// Enricher construction when a required vault secret cannot be
    /// resolved. Same surfacing as `validation`.
    pub fn config(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Config,
            code: "CONFIG_ERROR",
            message: message.into(),
        }
    }

    /// `scan` failing on network/IO. No in-run retry; queue-level retry may
    /// reattempt the whole job.
    pub fn enricher(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Enricher,
            code: "ENRICHER_ERROR",
            message: message.into(),
        }
    }

    /// Node Loader on empty result, or Enricher Registry on unknown name.
    /// Surfaces as HTTP 404 before any job is created.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        let resource = resource.into();
        let id = id.into();
        Self {
            kind: ErrorKind::NotFound,
            code: "NOT_FOUND_ERROR",
            message: format!("{resource} '{id}' not found"),
        }
    }

    /// Orchestrator internal invariant violation. Surfaces as HTTP 500;
    /// `Scan.status = failed`.
    pub fn engine(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Engine,
            code: "ENGINE_ERROR",
            message: message.into(),
        }
    }

    /// The [`ErrorKind`] discriminant for this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The stable, programmatic error code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// The human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// HTTP status code this error maps to, per the external interface's
    /// error payload rules.
    pub fn http_status(&self) -> u16 {
        match self.kind {
            ErrorKind::NotFound => 404,
            ErrorKind::Validation | ErrorKind::Config => 400,
            ErrorKind::Enricher | ErrorKind::Engine => 500,
        }
    }

    /// `true` if the task runtime should mark the owning scan as `failed`
    /// rather than surface a pre-job HTTP error (`NotFound` never reaches
    /// this point because it is raised before a job is created).
    pub fn fails_scan(&self) -> bool {
        !matches!(self.kind, ErrorKind::NotFound)
    }
}

impl fmt::Display for FlowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.code, self.kind, self.message)
    }
}

impl std::error::Error for FlowError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = FlowError::validation("bad field");
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert!(err.fails_scan());
    }

    #[test]
    fn not_found_maps_to_404_and_does_not_fail_a_scan() {
        let err = FlowError::not_found("Enricher", "domain_to_asn");
        assert_eq!(err.http_status(), 404);
        assert!(!err.fails_scan());
        assert_eq!(err.message(), "Enricher 'domain_to_asn' not found");
    }

    #[test]
    fn config_error_names_the_missing_secret() {
        let err = FlowError::config("missing required secret 'PDCP_API_KEY'");
        assert!(err.message().contains("PDCP_API_KEY"));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn engine_error_maps_to_500() {
        let err = FlowError::engine("invariant violated");
        assert_eq!(err.http_status(), 500);
        assert!(err.fails_scan());
    }

    #[test]
    fn display_includes_code_and_message() {
        let err = FlowError::enricher("non-JSON response");
        let text = err.to_string();
        assert!(text.contains("ENRICHER_ERROR"));
        assert!(text.contains("non-JSON response"));
    }
}
