//! Process lifecycle control for the test environment.
//!
//! The environment (L1 chain node, rollup node components, data-availability
//! nodes, databases) is a set of named components behind an opaque process
//! supervisor. Starting a component always stops it first so a previous
//! test's leftover process cannot leak into the next run, then blocks until
//! every readiness probe reports the component healthy. The environment is a
//! shared mutable resource: this stop-before-start discipline is the only
//! mutual-exclusion mechanism, and tests sharing one environment must not run
//! concurrently.

mod readiness;
pub use readiness::{Readiness, ReadinessError, RpcReadiness};

mod supervisor;
pub use supervisor::{ComposeSupervisor, Supervisor, SupervisorError};

use rollup_ops_poller::{poll, PollError, PollSpec, TimeoutExpired};
use std::{fmt, time::Duration};

/// The default readiness poll: a 2s tick bounded at one minute.
pub const DEFAULT_READINESS_POLL: PollSpec =
    PollSpec::new(Duration::from_secs(2), Duration::from_secs(60));

/// An error that occurred managing the environment.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// A supervisor command failed.
    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
    /// A component did not satisfy a readiness probe before its deadline.
    #[error("component {component} unhealthy, probe {probe} unsatisfied: {source}")]
    Unhealthy {
        /// The component that failed to come up.
        component: String,
        /// The probe that was never satisfied.
        probe: String,
        /// The expired poll.
        #[source]
        source: TimeoutExpired,
    },
    /// A readiness probe failed outright.
    #[error(transparent)]
    Probe(#[from] ReadinessError),
}

/// A named environment component: a supervisor service plus the probes that
/// decide when it is actually up.
///
/// Constructed and owned by the test that needs it; there is no package-level
/// registry of components.
pub struct Component {
    name: String,
    readiness: Vec<Box<dyn Readiness>>,
    poll: PollSpec,
}

impl Component {
    /// Returns a new component with the given supervisor service name and the
    /// default readiness poll.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), readiness: Vec::new(), poll: DEFAULT_READINESS_POLL }
    }

    /// Adds a readiness probe. A component is up only once every probe is
    /// satisfied.
    pub fn with_readiness(mut self, probe: impl Readiness + 'static) -> Self {
        self.readiness.push(Box::new(probe));
        self
    }

    /// Overrides the readiness poll cadence and deadline.
    pub fn with_poll(mut self, poll: PollSpec) -> Self {
        self.poll = poll;
        self
    }

    /// The component's supervisor service name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("readiness", &self.readiness.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("poll", &self.poll)
            .finish()
    }
}

/// The lifecycle controller for a set of environment components.
///
/// Tears the supervisor's project down when dropped unless [`Self::keep_on_drop`]
/// was requested.
#[derive(Debug)]
pub struct Environment<S: Supervisor = ComposeSupervisor> {
    supervisor: S,
    teardown_on_drop: bool,
}

impl<S: Supervisor> Environment<S> {
    /// Returns a new environment driving the given supervisor.
    pub fn new(supervisor: S) -> Self {
        Self { supervisor, teardown_on_drop: true }
    }

    /// Leaves the environment running when this controller is dropped.
    pub fn keep_on_drop(mut self) -> Self {
        self.teardown_on_drop = false;
        self
    }

    /// Starts the component and blocks until it reports healthy.
    ///
    /// The component is stopped first: start is an idempotent restart. Each
    /// readiness probe is then polled in sequence, failing fast on the first
    /// one still unsatisfied at its deadline.
    pub async fn start(&self, component: &Component) -> Result<(), EnvironmentError> {
        tracing::info!(target: "ops::environment", component = component.name(), "starting component");
        self.supervisor.stop(component.name())?;
        self.supervisor.start(component.name())?;

        for probe in &component.readiness {
            poll(component.poll, || probe.ready()).await.map_err(|err| match err {
                PollError::Timeout(timeout) => EnvironmentError::Unhealthy {
                    component: component.name().to_string(),
                    probe: probe.name().to_string(),
                    source: timeout,
                },
                PollError::Probe(err) => EnvironmentError::Probe(err),
            })?;
            tracing::debug!(target: "ops::environment", component = component.name(), probe = probe.name(), "probe satisfied");
        }

        tracing::info!(target: "ops::environment", component = component.name(), "component up");
        Ok(())
    }

    /// Starts every component in order, failing on the first unhealthy one.
    pub async fn start_all(&self, components: &[Component]) -> Result<(), EnvironmentError> {
        for component in components {
            self.start(component).await?;
        }
        Ok(())
    }

    /// Stops the component.
    pub fn stop(&self, component: &Component) -> Result<(), EnvironmentError> {
        tracing::info!(target: "ops::environment", component = component.name(), "stopping component");
        Ok(self.supervisor.stop(component.name())?)
    }

    /// Stops every component, in reverse order.
    pub fn stop_all(&self, components: &[Component]) -> Result<(), EnvironmentError> {
        for component in components.iter().rev() {
            self.stop(component)?;
        }
        Ok(())
    }

    /// The underlying supervisor, for diagnostics such as log capture.
    pub const fn supervisor(&self) -> &S {
        &self.supervisor
    }
}

impl<S: Supervisor> Drop for Environment<S> {
    fn drop(&mut self) {
        if self.teardown_on_drop {
            if let Err(err) = self.supervisor.shutdown() {
                tracing::warn!(target: "ops::environment", %err, "environment teardown failed");
            }
        }
    }
}
