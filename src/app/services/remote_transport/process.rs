//! Child-process transport for the remote D1 database
//!
//! Each statement becomes one invocation of
//! `<command...> <database> --remote --command <sql>`. The child starts from
//! an empty environment and receives only the API token variable, `PATH` and
//! `HOME`, so nothing else from the operator's shell leaks into it.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::token::ApiToken;
use super::transport::{Transport, TransportFailure, TransportOutcome};
use crate::app::models::excerpt;
use crate::config::RemoteConfig;
use crate::constants::{COMMAND_FLAG, DIAGNOSTIC_EXCERPT_CHARS, REMOTE_MODE_FLAG};
use crate::{Error, Result};

/// Runs the remote database CLI once per statement
#[derive(Debug, Clone)]
pub struct ProcessTransport {
    program: String,
    leading_args: Vec<String>,
    database: String,
    token_env: String,
    token: ApiToken,
    child_path: String,
    home: Option<PathBuf>,
    working_dir: Option<PathBuf>,
}

impl ProcessTransport {
    /// Build from remote settings; the database name is required
    pub fn from_config(remote: &RemoteConfig, token: ApiToken) -> Result<Self> {
        let (program, leading_args) = remote
            .command
            .split_first()
            .ok_or_else(|| Error::configuration("Remote command must not be empty"))?;

        let database = remote.database.clone().ok_or_else(|| {
            Error::configuration("A database name is required for remote uploads (--database)")
        })?;

        Ok(Self {
            program: program.clone(),
            leading_args: leading_args.to_vec(),
            database,
            token_env: remote.token_env.clone(),
            token,
            child_path: remote.child_path.clone(),
            home: remote.resolved_home(),
            working_dir: remote.working_dir.clone(),
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    fn command(&self, statement: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .arg(&self.database)
            .arg(REMOTE_MODE_FLAG)
            .arg(COMMAND_FLAG)
            .arg(statement)
            .env_clear()
            .env(&self.token_env, self.token.expose())
            .env("PATH", &self.child_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(home) = &self.home {
            command.env("HOME", home);
        }
        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command
    }
}

impl Transport for ProcessTransport {
    async fn submit(&self, statement: &str, timeout: Duration) -> TransportOutcome {
        debug!(
            "Running {} for database {} ({} byte statement)",
            self.program,
            self.database,
            statement.len()
        );

        let child = self
            .command(statement)
            .spawn()
            .map_err(|e| TransportFailure::launch(format!("{}: {}", self.program, e)))?;

        // Dropping the pending wait on timeout kills the child
        let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
            Ok(result) => result.map_err(|e| TransportFailure::launch(e.to_string()))?,
            Err(_) => return Err(TransportFailure::TimedOut { elapsed: timeout }),
        };

        if output.status.success() {
            let stdout = String::from_utf8_lossy(&output.stdout);
            debug!("Command output: {}", excerpt(stdout.trim(), DIAGNOSTIC_EXCERPT_CHARS));
            Ok(())
        } else {
            Err(TransportFailure::non_zero_exit(
                output.status.code(),
                &String::from_utf8_lossy(&output.stderr),
            ))
        }
    }
}
