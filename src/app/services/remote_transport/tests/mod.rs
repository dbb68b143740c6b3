//! Tests for statement transports

use crate::config::RemoteConfig;

use super::token::ApiToken;
use super::process::ProcessTransport;

mod local_tests;
#[cfg(unix)]
mod process_tests;

pub const TEST_TOKEN: &str = "test-token-value";

/// Process transport running `sh -c <script>`
///
/// Arguments after the script arrive as `$1` (database), `$2` (`--remote`),
/// `$3` (`--command`) and `$4` (the statement).
pub fn shell_transport(script: &str) -> ProcessTransport {
    let remote = RemoteConfig {
        command: vec!["sh".to_string(), "-c".to_string(), script.to_string(), "sh".to_string()],
        database: Some("facility-db".to_string()),
        ..RemoteConfig::default()
    };
    ProcessTransport::from_config(&remote, ApiToken::new(TEST_TOKEN)).unwrap()
}
