//! davinci-mcp - Main entry point

mod protocol;
mod server;
mod startup;

use clap::{Parser, Subcommand};
use davinci_core::default_registry;
use davinci_foundation::ServerConfig;
use server::McpServer;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// davinci-mcp - MCP server exposing the DaVinci Resolve scripting API
#[derive(Parser, Debug)]
#[command(name = "davinci-mcp")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Python interpreter to host the scripting module
    #[arg(long)]
    python: Option<String>,

    /// Scripting host request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Also write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Treat registry validation warnings-free criticals as fatal at startup
    #[arg(long)]
    strict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the MCP stdio server (default)
    Serve,
    /// List registered tools by component
    Tools,
    /// Check the environment and the connection to DaVinci Resolve
    Doctor,
    /// Validate tool registrations and print a report
    Validate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::load()?;
    if let Some(python) = args.python.clone() {
        config.python = Some(python);
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = timeout;
    }
    if let Some(log_file) = args.log_file.clone() {
        config.log_file = Some(log_file);
    }
    if args.strict {
        config.strict_validation = true;
    }

    init_tracing(&config, args.debug)?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Tools => {
            list_tools();
            Ok(())
        }
        Command::Doctor => {
            let passed = startup::doctor(&config).await;
            if !passed {
                std::process::exit(1);
            }
            Ok(())
        }
        Command::Validate => validate(),
    }
}

/// 로그는 stderr로, 필요하면 파일에도 기록 (stdout은 프로토콜 전용)
fn init_tracing(config: &ServerConfig, debug: bool) -> anyhow::Result<()> {
    let default_directive = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    match &config.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
        }
    }

    Ok(())
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let registry = default_registry();

    // 시작 시 등록 정합성 검증 (strict면 실패 시 중단)
    let report = registry.validate();
    for warning in &report.warnings {
        tracing::warn!("Tool validation warning: {}", warning);
    }
    if config.strict_validation {
        report.into_result()?;
    } else if !report.passed() {
        for critical in &report.critical {
            tracing::error!("Tool validation error: {}", critical);
        }
    }

    let server = McpServer::new(registry, config);
    server.serve().await?;
    Ok(())
}

fn list_tools() {
    let registry = default_registry();

    println!("{} tools registered", registry.len());
    for (component, specs) in registry.by_component() {
        println!();
        println!("[{}] ({})", component, specs.len());
        for spec in specs {
            println!("  {:<48} {}", spec.name, spec.description);
        }
    }
}

fn validate() -> anyhow::Result<()> {
    let registry = default_registry();
    let report = registry.validate();

    println!("{}", serde_json::to_string_pretty(&report.summary())?);
    if !report.passed() {
        std::process::exit(1);
    }
    Ok(())
}
