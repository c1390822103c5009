use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use crate::config::DEFAULT_PROBE_MODEL;
use crate::credentials::Credential;
use crate::provider::{StructuredProvider, StructuredRequest};

pub const PROBE_PROMPT: &str = "Connection Test";

/// Cheap round trip that tells whether a credential can reach the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProbe {
    model: String,
}

impl Default for ConnectionProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_MODEL)
    }
}

impl ConnectionProbe {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// True iff the provider answered with any text. Never fails: errors,
    /// empty answers and even a panicking provider all read as `false`.
    pub fn probe(&self, provider: &dyn StructuredProvider, credential: &Credential) -> bool {
        let started = Instant::now();
        let request = StructuredRequest::text(self.model.clone(), PROBE_PROMPT);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            provider.generate_structured(credential, &request)
        }));
        let elapsed_ms = started.elapsed().as_millis() as u64;
        let valid = match outcome {
            Ok(Ok(response)) => response.non_empty_text().is_some(),
            Ok(Err(err)) => {
                tracing::info!(
                    provider = provider.name(),
                    credential = %credential.fingerprint(),
                    error = %err,
                    "probe rejected"
                );
                false
            }
            Err(_) => {
                tracing::warn!(
                    provider = provider.name(),
                    credential = %credential.fingerprint(),
                    "provider panicked during probe"
                );
                false
            }
        };
        tracing::info!(
            provider = provider.name(),
            model = %self.model,
            credential = %credential.fingerprint(),
            valid,
            elapsed_ms,
            "connection probe finished"
        );
        valid
    }
}
