//! Loader error types

use thiserror::Error;

/// Errors surfaced while turning a symbol reference into an invoked handler
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Module loaded but does not carry the requested export
    #[error("QWIK {reference} does not export {export}")]
    MissingExport {
        /// Full absolute symbol reference
        reference: String,
        /// Missing export name (`default` when the fragment is empty)
        export: String,
    },

    /// Dynamic import rejected
    #[error("Failed to import {url}: {source}")]
    ModuleLoad {
        /// Module URL that was requested
        url: String,
        /// Rejection reported by the module host
        #[source]
        source: ImportError,
    },

    /// The resolved handler itself failed
    #[error("Handler {reference} failed: {source}")]
    Handler {
        /// Full absolute symbol reference
        reference: String,
        /// Error returned by the handler
        #[source]
        source: anyhow::Error,
    },

    /// Reference could not be joined onto its base URL
    #[error("Invalid symbol reference '{reference}': {source}")]
    InvalidReference {
        /// Raw reference as read from the attribute
        reference: String,
        /// URL parser failure
        #[source]
        source: url::ParseError,
    },

    /// Container base attribute could not be resolved
    #[error("Invalid container base '{base}': {source}")]
    InvalidBase {
        /// Raw base attribute value
        base: String,
        /// URL parser failure
        #[source]
        source: url::ParseError,
    },
}

/// Loader result
pub type LoaderResult<T> = Result<T, LoaderError>;

/// Rejections produced by a module host's `import`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// Nothing is served at this URL
    #[error("Module not found: {0}")]
    NotFound(String),

    /// Module top-level evaluation failed
    #[error("Module {url} failed to evaluate: {message}")]
    Evaluation {
        /// Module URL
        url: String,
        /// Failure description
        message: String,
    },

    /// Transport-level failure
    #[error("Network error loading {url}: {message}")]
    Network {
        /// Module URL
        url: String,
        /// Failure description
        message: String,
    },
}
