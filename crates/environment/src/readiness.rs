use alloy_provider::{Provider, ProviderBuilder};

/// A cheap, repeatable probe deciding whether a component is up.
#[async_trait::async_trait]
pub trait Readiness: Send + Sync {
    /// A short name for logs and failure reports.
    fn name(&self) -> &str;

    /// Returns whether the component currently reports ready.
    ///
    /// `Ok(false)` means "not ready yet"; an error means the probe observed
    /// something no amount of waiting will fix.
    async fn ready(&self) -> Result<bool, ReadinessError>;
}

/// A readiness probe observed a well-formed but wrong response.
#[derive(Debug, thiserror::Error)]
#[error("readiness probe {probe}: {message}")]
pub struct ReadinessError {
    /// The probe that failed.
    pub probe: String,
    /// What it observed.
    pub message: String,
}

/// RPC readiness: the component is up once a lightweight read-only call
/// returns a well-formed response.
///
/// Connection refused and every other transport or protocol error mean "not
/// ready yet" — infrastructure that is still booting fails in many ways and
/// none of them should abort the poll loop. Only a well-formed response is
/// used to decide.
#[derive(Debug, Clone)]
pub struct RpcReadiness {
    name: String,
    url: String,
    expected_chain_id: Option<u64>,
}

impl RpcReadiness {
    /// Returns a probe against the given RPC URL.
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        Self { name: format!("rpc:{url}"), url, expected_chain_id: None }
    }

    /// Additionally requires the endpoint to report the given chain id. A
    /// healthy endpoint on the wrong chain is a harness misconfiguration, not
    /// a boot transient, and fails the probe outright.
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.expected_chain_id = Some(chain_id);
        self
    }
}

#[async_trait::async_trait]
impl Readiness for RpcReadiness {
    fn name(&self) -> &str {
        &self.name
    }

    async fn ready(&self) -> Result<bool, ReadinessError> {
        let provider = match ProviderBuilder::new().connect(&self.url).await {
            Ok(provider) => provider,
            Err(err) => {
                tracing::trace!(target: "ops::environment", probe = %self.name, %err, "endpoint not reachable yet");
                return Ok(false);
            }
        };

        let chain_id = match provider.get_chain_id().await {
            Ok(chain_id) => chain_id,
            Err(err) => {
                tracing::trace!(target: "ops::environment", probe = %self.name, %err, "endpoint not answering yet");
                return Ok(false);
            }
        };

        if let Some(expected) = self.expected_chain_id {
            if chain_id != expected {
                return Err(ReadinessError {
                    probe: self.name.clone(),
                    message: format!("unexpected chain id {chain_id}, expected {expected}"),
                });
            }
        }

        Ok(true)
    }
}
