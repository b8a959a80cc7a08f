/// Alias for `Result<T, FlockError>`.
pub type FlockResult<T> = Result<T, FlockError>;

/// Failures of the construction paths. Ticking a flock never fails.
#[derive(Debug, thiserror::Error)]
pub enum FlockError {
    /// A configuration value is out of its accepted range.
    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        /// Dotted path of the offending field, e.g. `boid.max_speed`.
        field: &'static str,
        /// What is wrong with the value.
        reason: String,
    },

    /// Packed state arrays hold `[x, y, z, vx, vy, vz]` per boid.
    #[error("states length must be a multiple of 6, got {0}")]
    StateLength(usize),

    /// A packed state contains NaN or an infinity.
    #[error("state of boid {index} contains a non-finite value")]
    NonFiniteState {
        /// Index of the boid within the packed array.
        index: usize,
    },

    /// A JSON document could not be parsed or written.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// A config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
