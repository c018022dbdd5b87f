use std::process::{Command, ExitStatus};

/// An opaque start/stop surface keyed by component name.
///
/// The harness never inspects what a start action does; it only observes the
/// component afterwards through readiness probes.
pub trait Supervisor {
    /// Starts the named component. Returns once the start command has been
    /// accepted; readiness is observed separately.
    fn start(&self, component: &str) -> Result<(), SupervisorError>;

    /// Stops the named component.
    fn stop(&self, component: &str) -> Result<(), SupervisorError>;

    /// Tears down everything the supervisor manages.
    fn shutdown(&self) -> Result<(), SupervisorError>;
}

/// An error from a supervisor command.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    /// The command could not be spawned.
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        /// The command line that failed to spawn.
        command: String,
        /// The underlying io error.
        #[source]
        source: std::io::Error,
    },
    /// The command ran but exited unsuccessfully.
    #[error("`{command}` exited with {status}: {stderr}")]
    Command {
        /// The command line that failed.
        command: String,
        /// The exit status.
        status: ExitStatus,
        /// Captured stderr.
        stderr: String,
    },
}

/// Process supervision through `docker compose`, scoped to one compose file
/// and project name so concurrent test environments do not collide.
#[derive(Debug, Clone)]
pub struct ComposeSupervisor {
    compose_file: String,
    project_name: String,
}

impl ComposeSupervisor {
    /// Returns a new supervisor for the given compose file and project name.
    pub fn new(compose_file: impl Into<String>, project_name: impl Into<String>) -> Self {
        Self { compose_file: compose_file.into(), project_name: project_name.into() }
    }

    /// Returns the recent logs of the named component, for failure
    /// diagnostics.
    pub fn logs(&self, component: &str) -> Result<String, SupervisorError> {
        let output = self.output(&["logs", "--tail", "100", component])?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    fn run(&self, args: &[&str]) -> Result<(), SupervisorError> {
        self.output(args).map(drop)
    }

    fn output(&self, args: &[&str]) -> Result<Vec<u8>, SupervisorError> {
        let command_line = format!("docker compose {}", args.join(" "));
        tracing::debug!(target: "ops::environment", command = %command_line, "running supervisor command");

        let output = Command::new("docker")
            .args(["compose", "-f", &self.compose_file, "-p", &self.project_name])
            .args(args)
            .output()
            .map_err(|source| SupervisorError::Spawn { command: command_line.clone(), source })?;

        if !output.status.success() {
            return Err(SupervisorError::Command {
                command: command_line,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

impl Supervisor for ComposeSupervisor {
    fn start(&self, component: &str) -> Result<(), SupervisorError> {
        self.run(&["up", "-d", "--force-recreate", component])
    }

    fn stop(&self, component: &str) -> Result<(), SupervisorError> {
        self.run(&["stop", "--timeout", "5", component])
    }

    fn shutdown(&self) -> Result<(), SupervisorError> {
        self.run(&["down", "--volumes", "--remove-orphans", "--timeout", "30"])
    }
}
