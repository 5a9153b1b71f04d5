// src/rewrite/mod.rs — Text-rewrite collaborator boundary
//
// The engine never talks to a language model itself. Strategies compose an
// instruction string and hand it, with the current text, to an injected
// Rewriter. The CLI ships a subprocess-backed implementation so any LLM CLI
// or shell filter can serve as the collaborator.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::infra::errors::BurnishError;

/// The injected text-rewrite collaborator. May fail; callers fall back to the
/// unmodified text for that strategy.
#[async_trait]
pub trait Rewriter: Send + Sync {
    async fn rewrite(&self, text: &str, instructions: &str) -> Result<String, BurnishError>;
}

/// Decorator adding a hard per-call timeout. A transform that hangs is
/// otherwise not preemptible, since cancellation is only checked at iteration
/// boundaries.
pub struct TimeoutRewriter {
    inner: Arc<dyn Rewriter>,
    limit: Duration,
}

impl TimeoutRewriter {
    pub fn new(inner: Arc<dyn Rewriter>, limit: Duration) -> Self {
        Self { inner, limit }
    }
}

#[async_trait]
impl Rewriter for TimeoutRewriter {
    async fn rewrite(&self, text: &str, instructions: &str) -> Result<String, BurnishError> {
        match tokio::time::timeout(self.limit, self.inner.rewrite(text, instructions)).await {
            Ok(result) => result,
            Err(_) => Err(BurnishError::RewriteTimeout {
                limit_ms: self.limit.as_millis() as u64,
            }),
        }
    }
}

/// Pipes text through an external command: text on stdin, instructions in the
/// `BURNISH_INSTRUCTIONS` environment variable, rewritten text on stdout.
pub struct CommandRewriter {
    program: String,
    args: Vec<String>,
}

impl CommandRewriter {
    /// Parse a whitespace-separated command line.
    pub fn new(command_line: &str) -> Result<Self, BurnishError> {
        let mut parts = command_line.split_whitespace().map(str::to_owned);
        let program = parts
            .next()
            .ok_or_else(|| BurnishError::Config("empty rewrite command".into()))?;
        Ok(Self {
            program,
            args: parts.collect(),
        })
    }
}

#[async_trait]
impl Rewriter for CommandRewriter {
    async fn rewrite(&self, text: &str, instructions: &str) -> Result<String, BurnishError> {
        tracing::debug!(program = %self.program, "invoking rewrite command");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("BURNISH_INSTRUCTIONS", instructions)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
            // Close stdin so the child sees EOF
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(BurnishError::RewriteCommand {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
