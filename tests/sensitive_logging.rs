//! Domain and URL logging follows `Config::log_sensitive` even when the host
//! installs its own logger.
//!
//! Kept in its own test binary: the switch is process-wide.

mod helpers;

use helpers::TestHost;
use known_sites::{sensitive_logging_enabled, set_sensitive_logging, Config};

#[tokio::test]
async fn test_gate_applies_sensitive_logging_setting() {
    set_sensitive_logging(true);
    let host = TestHost::new();
    assert!(!sensitive_logging_enabled());
    assert!(host.gate.on_before_navigate("https://www.example.com/", 1, None).await.cancel);

    let _host = TestHost::with_config(Config {
        log_sensitive: true,
        ..Default::default()
    });
    assert!(sensitive_logging_enabled());
}
