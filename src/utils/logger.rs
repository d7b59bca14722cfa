use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// 函式庫與兩個執行檔各自的 tracing target
const TARGETS: [&str; 2] = ["small_fin_etl", "toml_etl"];

pub fn init_cli_logger(verbose: bool) {
    init_with_directive(&default_directive(if verbose { "debug" } else { "info" }));
}

/// 使用 TOML `[monitoring] log_level` 的設定初始化日誌
pub fn init_with_level(level: &str) {
    init_with_directive(&default_directive(level));
}

fn default_directive(level: &str) -> String {
    TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

fn init_with_directive(directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
