use clap::Parser;

use kestrel_core::config::KestrelConfig;
use kestrel_daemon::cli::DaemonCli;
use kestrel_daemon::logging;

/// Exit code for recoverable configuration errors.
const EXIT_CONFIG: i32 = 1;
/// Exit code for fatal rules directory I/O errors.
const EXIT_FATAL: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = DaemonCli::parse();

    // 설정 해석 — 로그 레벨도 해석 결과의 일부이므로 로거 초기화보다
    // 먼저 수행. 이 단계의 실패는 stderr로 직접 출력.
    let config = match KestrelConfig::resolve(&cli.config, &cli.options).await {
        Ok(config) => config,
        Err(e) if e.is_fatal() => {
            eprintln!("kestrel-daemon: fatal: {e}");
            std::process::exit(EXIT_FATAL);
        }
        Err(e) => {
            eprintln!("kestrel-daemon: {e}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.validate {
        println!("{}: configuration valid", cli.config.display());
        return;
    }

    if cli.dump_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("kestrel-daemon: failed to serialize configuration: {e}");
                std::process::exit(EXIT_CONFIG);
            }
        }
        return;
    }

    // 로깅 초기화
    if let Err(e) = logging::init_tracing(&config) {
        eprintln!("kestrel-daemon: {e}");
        std::process::exit(EXIT_CONFIG);
    }

    tracing::info!(
        config = %cli.config.display(),
        rules_files = config.rules_files.len(),
        outputs = config.outputs.len(),
        plugins = config.plugins.len(),
        min_priority = %config.min_priority,
        "kestrel-daemon starting"
    );

    for output in &config.outputs {
        tracing::debug!(sink = %output.name, "output sink enabled");
    }

    // 종료 시그널 대기
    tracing::info!("kestrel-daemon running");
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to wait for shutdown signal");
        std::process::exit(EXIT_CONFIG);
    }
    tracing::info!("shutdown signal received");

    tracing::info!("kestrel-daemon shut down");
}
