// src/main.rs

use axum::serve;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

use rust_infytvhb::api::{self, AppState};
use rust_infytvhb::config::{AdapterConfig, ConfigSource, FileConfigSource, StaticConfigSource};
use rust_infytvhb::logging::{self, logger::AuditLogger};
use rust_infytvhb::InfyTvAdapter;

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "InfyTV OpenRTB adapter translation service")]
struct CliArgs {
    #[arg(short, long, default_value_t = 8080)]
    port: u16,
    #[arg(long, default_value = "logs")]
    log_dir: String,
    /// 适配器配置文件（JSON），不指定则使用默认配置
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化全局 tracing 日志
    let _guard = logging::init_tracing(&args.log_dir)?;
    info!("InfyTV adapter starting on port {}", args.port);

    let source: Box<dyn ConfigSource> = match &args.config {
        Some(path) => Box::new(FileConfigSource::new(path)),
        None => Box::new(StaticConfigSource(AdapterConfig::default())),
    };
    let config = source.load().map_err(|e| {
        error!(error = %e, "failed to load adapter config");
        e
    })?;
    info!(?config, "adapter config loaded");

    let audit_logger = AuditLogger::new(&args.log_dir, 1000, 100, 1000);
    let state = Arc::new(AppState {
        adapter: Arc::new(InfyTvAdapter::new(config)),
        audit_logger: audit_logger.clone(),
    });

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("InfyTV adapter running at http://{}", addr);

    serve(listener, api::router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("Shutting down gracefully...");
        })
        .await?;

    audit_logger.flush().await;
    info!("InfyTV adapter shut down.");
    Ok(())
}
