use thiserror::Error;

/// Errors returned by the clustering algorithms and the hull stage.
///
/// Every variant is raised before any computation starts, so a failed call
/// leaves no partial state behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A scalar parameter is outside its valid domain.
    #[error("invalid configuration {name}: {message}")]
    InvalidConfiguration {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: &'static str,
    },

    /// Requested cluster count (or minimum cluster size) is incompatible with the point set.
    #[error("invalid cluster count: requested {requested}, but point set has {n_items} points")]
    InvalidClusterCount {
        /// Requested number of clusters.
        requested: usize,
        /// Number of points in the input.
        n_items: usize,
    },
}

impl Error {
    /// Whether this error reports an out-of-domain configuration value.
    ///
    /// Currently true for every variant; kept as a method so callers do not
    /// have to match on the variant list.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidConfiguration { .. } | Error::InvalidClusterCount { .. }
        )
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;
