//! Starts the backend and frontend services and watches both.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::task::JoinError;
use tracing::{error, info, info_span, warn, Instrument};

use crate::config::Settings;
use crate::error::AppError;

pub const BACKEND_BINARY: &str = "agent-backend";
pub const FRONTEND_BINARY: &str = "agent-frontend";

/// A command to run as a named service
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
    /// When set, stdin is closed and stdout/stderr are appended here
    /// instead of sharing the launcher's terminal.
    pub log_file: Option<PathBuf>,
}

impl ServiceSpec {
    pub fn new(name: impl Into<String>, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args,
            log_file: None,
        }
    }

    pub fn with_log_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.log_file = Some(path.into());
        self
    }

    /// Service whose binary sits next to the running executable
    pub fn sibling(name: impl Into<String>, binary: &str) -> Result<Self, AppError> {
        let name = name.into();
        let exe = std::env::current_exe().map_err(|source| AppError::ServiceSpawn {
            service: name.clone(),
            command: binary.to_string(),
            source,
        })?;
        let program = exe.with_file_name(format!("{}{}", binary, std::env::consts::EXE_SUFFIX));
        Ok(Self::new(name, program, Vec::new()))
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Run a service to completion.
/// Dropping the returned future kills the child process.
pub async fn launch(spec: &ServiceSpec) -> Result<(), AppError> {
    let span = info_span!("service", name = %spec.name);
    run_to_completion(spec).instrument(span).await
}

async fn run_to_completion(spec: &ServiceSpec) -> Result<(), AppError> {
    let command = spec.command_line();
    info!("Starting {} service", spec.name);

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args).kill_on_drop(true);
    if let Some(path) = &spec.log_file {
        let redirected = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|out| Ok((out.try_clone()?, out)));
        match redirected {
            Ok((stdout, stderr)) => {
                info!(log_file = %path.display(), "Redirecting {} service output", spec.name);
                cmd.stdin(Stdio::null()).stdout(stdout).stderr(stderr);
            }
            Err(source) => {
                error!(cmd = %command, error = %source, "Cannot open log file for {} service", spec.name);
                return Err(AppError::ServiceSpawn {
                    service: spec.name.clone(),
                    command,
                    source,
                });
            }
        }
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            error!(cmd = %command, error = %source, "Unexpected error while starting {} service", spec.name);
            return Err(AppError::ServiceSpawn {
                service: spec.name.clone(),
                command,
                source,
            });
        }
    };

    let status = match child.wait().await {
        Ok(status) => status,
        Err(source) => {
            error!(cmd = %command, error = %source, "Lost track of {} service", spec.name);
            return Err(AppError::ServiceSpawn {
                service: spec.name.clone(),
                command,
                source,
            });
        }
    };

    if status.success() {
        info!("{} service exited", spec.name);
        return Ok(());
    }

    error!(
        returncode = ?status.code(),
        cmd = %command,
        "{} service exited with non-zero status",
        spec.name
    );
    Err(AppError::ServiceExited {
        service: spec.name.clone(),
        command,
        code: status.code(),
    })
}

/// Backend in a background task, frontend in the foreground after a delay.
/// Whichever side fails first ends the run; the other side is killed.
pub struct Supervisor {
    backend: ServiceSpec,
    frontend: ServiceSpec,
    delay: Duration,
}

impl Supervisor {
    pub fn new(backend: ServiceSpec, frontend: ServiceSpec, delay: Duration) -> Self {
        Self {
            backend,
            frontend,
            delay,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Ok(Self::new(
            ServiceSpec::sibling("backend", BACKEND_BINARY)?
                .with_log_file(&settings.backend_log_file),
            ServiceSpec::sibling("frontend", FRONTEND_BINARY)?,
            settings.frontend_delay(),
        ))
    }

    pub async fn run(self) -> Result<(), AppError> {
        let backend = self.backend.clone();
        let mut backend_task = tokio::spawn(async move { launch(&backend).await });

        let backend_running = tokio::select! {
            joined = &mut backend_task => {
                Self::backend_finished(joined)?;
                false
            }
            _ = tokio::time::sleep(self.delay) => true,
        };

        let frontend = launch(&self.frontend);
        tokio::pin!(frontend);

        if !backend_running {
            return frontend.await;
        }

        tokio::select! {
            result = &mut frontend => {
                backend_task.abort();
                // wait for the task to drop its child
                let _ = backend_task.await;
                result
            }
            joined = &mut backend_task => {
                Self::backend_finished(joined)?;
                frontend.await
            }
        }
    }

    fn backend_finished(joined: Result<Result<(), AppError>, JoinError>) -> Result<(), AppError> {
        match joined {
            Ok(Ok(())) => {
                warn!("Backend service exited while the launcher was still running");
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(source) => Err(AppError::Supervisor {
                context: "Backend supervisor task failed".to_string(),
                source,
            }),
        }
    }
}
