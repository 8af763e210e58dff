use std::fmt;

/// Discriminant for the five error kinds named in the engine's error
/// handling design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Raised by `preprocess` of any enricher, or the branch compiler on a
    /// malformed flow graph.
    Validation,
    /// Raised by enricher construction when a required vault secret is
    /// missing.
    Config,
    /// Raised by `scan` on a transient network/IO failure.
    Enricher,
    /// Raised by the Node Loader on an empty result, or the Enricher
    /// Registry on an unknown name.
    NotFound,
    /// Raised by the Orchestrator on an internal invariant violation.
    Engine,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::Config => "config",
            Self::Enricher => "enricher",
            Self::NotFound => "not_found",
            Self::Engine => "engine",
        };
        f.write_str(s)
    }
}
