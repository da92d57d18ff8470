use std::sync::OnceLock;

use almanac_common::observability::{LogConfig, init_logging};

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "almanac-tests",
            log_dir: Some(std::env::temp_dir().join("almanac-tests")),
            default_filter: "debug".into(),
            ..LogConfig::default()
        };
        init_logging(config).unwrap_or_default()
    });
}
