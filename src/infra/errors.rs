// src/infra/errors.rs — Error types for burnish

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BurnishError {
    // Rewrite collaborator errors (non-fatal to a run; recorded per-strategy)
    #[error("Rewrite failed: {message}")]
    Rewrite { message: String },

    #[error("Rewrite timed out after {limit_ms}ms")]
    RewriteTimeout { limit_ms: u64 },

    #[error("Rewrite command exited with {status}: {stderr}")]
    RewriteCommand { status: String, stderr: String },

    // User / configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown mode '{0}'")]
    UnknownMode(String),

    // Infra
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BurnishError {
    /// True for failures that abort a single strategy application but never
    /// the run itself.
    pub fn is_strategy_local(&self) -> bool {
        matches!(
            self,
            BurnishError::Rewrite { .. }
                | BurnishError::RewriteTimeout { .. }
                | BurnishError::RewriteCommand { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_errors_are_strategy_local() {
        assert!(BurnishError::Rewrite {
            message: "boom".into()
        }
        .is_strategy_local());
        assert!(BurnishError::RewriteTimeout { limit_ms: 500 }.is_strategy_local());
        assert!(!BurnishError::Config("bad".into()).is_strategy_local());
    }

    #[test]
    fn test_display_messages() {
        let e = BurnishError::RewriteTimeout { limit_ms: 30_000 };
        assert_eq!(e.to_string(), "Rewrite timed out after 30000ms");
        let e = BurnishError::UnknownMode("speedy".into());
        assert_eq!(e.to_string(), "Unknown mode 'speedy'");
    }
}
