//! Number poller: asks the model about 0, 1, 2, ... forever.
//!
//! Iterations are strictly sequential. A model failure ends the loop and is
//! handed back to the caller; cancellation is only observed between calls.

use crate::services::{ProviderError, TextProvider};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum PollerError {
    #[error("generation failed for number {counter}: {source}")]
    Generation {
        counter: u64,
        #[source]
        source: ProviderError,
    },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Prompt sent on the iteration whose counter is `counter`.
pub fn prompt_for(counter: u64) -> String {
    format!("Tell me about the number {}.", counter)
}

pub struct NumberPoller {
    provider: Arc<dyn TextProvider>,
    interval: Duration,
}

impl NumberPoller {
    pub fn new(provider: Arc<dyn TextProvider>, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// Run until `shutdown` is cancelled or the provider fails.
    ///
    /// Each iteration generates, writes the text as one line to `out`, sleeps
    /// one interval, then advances the counter. Returns the number of
    /// completed iterations on cancellation.
    pub async fn run<W: Write>(
        &self,
        out: &mut W,
        shutdown: CancellationToken,
    ) -> Result<u64, PollerError> {
        let mut counter: u64 = 0;

        loop {
            if shutdown.is_cancelled() {
                return Ok(counter);
            }

            let prompt = prompt_for(counter);

            let response = match self.provider.generate(&prompt).await {
                Ok(response) => response,
                Err(source) => {
                    tracing::error!(counter, error = %source, "Generation failed, stopping");
                    return Err(PollerError::Generation { counter, source });
                }
            };

            tracing::debug!(counter, response_len = response.text.len(), "Generation completed");

            writeln!(out, "{}", response.text)?;
            out.flush()?;

            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!(iterations = counter + 1, "Poller cancelled");
                    return Ok(counter + 1);
                }
                _ = tokio::time::sleep(self.interval) => {}
            }

            counter += 1;
        }
    }
}
