use std::env;
use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use plsdescribe::auth::BearerToken;
use plsdescribe::cli::{print_proxy_help, print_proxy_version};
use plsdescribe::config::ProxyConfig;
use plsdescribe::error::Result;
use plsdescribe::logging::{self, LogConfig};
use plsdescribe::server::{create_router, startup_banner, AppState};
use plsdescribe::tls;
use plsdescribe::tts::GoogleTts;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (silently ignore if it doesn't)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_proxy_help();
        return ExitCode::SUCCESS;
    }
    if args.iter().any(|a| a == "--version" || a == "-V") {
        print_proxy_version();
        return ExitCode::SUCCESS;
    }

    let log_config = LogConfig::from_env();
    let log_guards = match logging::init_logging(&log_config) {
        Ok(guards) => guards,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::FAILURE;
        }
    };
    logging::log_platform_info();
    match log_guards.log_dir() {
        Some(dir) => println!("Logs: {}", dir.display()),
        None => println!("Logs: console only (LOG_FILES_ENABLED=false)"),
    }

    match run(&log_config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(log_config: &LogConfig) -> Result<()> {
    let config = ProxyConfig::from_env()?;

    // Fail at startup, not on the first request, when credentials are missing
    let backend = GoogleTts::new(config.quota_project.clone()).await?;
    tracing::info!(quota_project = ?config.quota_project, "Google Cloud TTS client ready");

    let state = AppState::new(Arc::new(backend), BearerToken::new(config.token.clone()))
        .with_slow_request_threshold(log_config.slow_request_threshold());
    let app = create_router(state);

    match &config.domain {
        Some(domain) => {
            println!("{}", startup_banner(&format!("https://{} (:443)", domain)));
            tls::serve_with_acme(app, domain, &config.cert_cache_dir).await
        }
        None => {
            let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
            let addr = listener.local_addr()?;

            println!("{}", startup_banner(&format!("http://{}", addr)));
            tracing::info!("Listening on http://{} (no TLS domain configured)", addr);

            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .with_graceful_shutdown(shutdown_signal())
            .await?;
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
