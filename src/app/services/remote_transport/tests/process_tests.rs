//! Child-process transport behaviour, exercised through `sh`

use std::time::{Duration, Instant};

use super::*;
use crate::app::services::remote_transport::{Transport, TransportFailure};
use crate::config::RemoteConfig;

const TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::test]
async fn test_zero_exit_is_success() {
    let transport = shell_transport("exit 0");
    assert_eq!(transport.submit("SELECT 1", TIMEOUT).await, Ok(()));
}

#[tokio::test]
async fn test_arguments_follow_database_then_flags() {
    let transport = shell_transport(
        r#"test "$1" = facility-db && test "$2" = --remote && test "$3" = --command && test "$4" = "INSERT INTO t VALUES ('a, b')""#,
    );
    assert_eq!(
        transport.submit("INSERT INTO t VALUES ('a, b')", TIMEOUT).await,
        Ok(())
    );
}

#[tokio::test]
async fn test_environment_is_minimal() {
    // SAFETY: no other test reads this variable
    unsafe { std::env::set_var("FACILITY_SYNC_LEAK_CHECK", "visible") };

    let transport = shell_transport(
        r#"test "$CLOUDFLARE_API_TOKEN" = test-token-value && test "$PATH" = /usr/local/bin:/usr/bin:/bin && test -z "$FACILITY_SYNC_LEAK_CHECK""#,
    );
    assert_eq!(transport.submit("SELECT 1", TIMEOUT).await, Ok(()));
}

#[tokio::test]
async fn test_non_zero_exit_keeps_stderr_excerpt() {
    let transport = shell_transport("printf 'D1_ERROR: %0300d' 0 >&2; exit 3");

    match transport.submit("SELECT 1", TIMEOUT).await {
        Err(TransportFailure::NonZeroExit { code, stderr }) => {
            assert_eq!(code, Some(3));
            assert!(stderr.starts_with("D1_ERROR: 000"));
            assert_eq!(stderr.chars().count(), 200);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_slow_command_times_out() {
    let transport = shell_transport("sleep 5");
    let started = Instant::now();

    let outcome = transport.submit("SELECT 1", Duration::from_millis(200)).await;

    assert_eq!(
        outcome,
        Err(TransportFailure::TimedOut {
            elapsed: Duration::from_millis(200)
        })
    );
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[tokio::test]
async fn test_missing_program_is_launch_failure() {
    let remote = RemoteConfig {
        command: vec!["/nonexistent/facility-sync-cli".to_string()],
        database: Some("facility-db".to_string()),
        ..RemoteConfig::default()
    };
    let transport = ProcessTransport::from_config(&remote, ApiToken::new(TEST_TOKEN)).unwrap();

    let outcome = transport.submit("SELECT 1", TIMEOUT).await;
    assert!(matches!(outcome, Err(TransportFailure::Launch { .. })));
}

#[tokio::test]
async fn test_working_directory_is_applied() {
    let dir = tempfile::TempDir::new().unwrap();
    let remote = RemoteConfig {
        command: vec![
            "sh".to_string(),
            "-c".to_string(),
            "test -f wrangler.toml".to_string(),
        ],
        database: Some("facility-db".to_string()),
        working_dir: Some(dir.path().to_path_buf()),
        ..RemoteConfig::default()
    };
    let transport = ProcessTransport::from_config(&remote, ApiToken::new(TEST_TOKEN)).unwrap();

    assert!(transport.submit("SELECT 1", TIMEOUT).await.is_err());

    std::fs::write(dir.path().join("wrangler.toml"), "name = \"app\"\n").unwrap();
    assert_eq!(transport.submit("SELECT 1", TIMEOUT).await, Ok(()));
}
