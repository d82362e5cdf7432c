use anyhow::{Context, Result};
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use skillrouter_core::{Config, logging};
use skillrouter_server::{SkillRegistry, SkillsServer};
use skillrouter_skills::Executor;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Skillrouter - serve SKILL.md capability directories as MCP tools
#[derive(Parser, Debug)]
#[command(name = "skillrouter")]
#[command(about = "MCP server exposing filesystem-defined skills over stdio", long_about = None)]
#[command(version)]
struct Cli {
    /// Root directory scanned for skills (default: $SKILLS_DIR, then built-in resolution)
    #[arg(short, long, value_name = "DIR")]
    skills_dir: Option<PathBuf>,

    /// Path to skillrouter.toml (default: ./skillrouter.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log filter override (same syntax as RUST_LOG)
    #[arg(short, long, value_name = "FILTER")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Keep the guard alive for the process lifetime so file logs flush.
    let _log_guard =
        logging::init_logging(Some(config.logging.clone())).context("failed to initialize logging")?;

    let skills_dir = cli.skills_dir.unwrap_or_else(|| config.resolve_skills_dir());
    std::fs::create_dir_all(&skills_dir)
        .with_context(|| format!("failed to create skills directory {}", skills_dir.display()))?;

    info!(dir = %skills_dir.display(), "starting skillrouter");

    let registry = Arc::new(SkillRegistry::new(&skills_dir));
    registry.refresh();
    info!(count = registry.count(), "initial skill scan complete");

    let server = SkillsServer::new(registry, Executor::with_timeout(config.executor_timeout()));

    // The stdio transport is the only fatal failure surface; everything a
    // skill can do wrong is folded into per-call results.
    let service = server.serve(stdio()).await.context("failed to start MCP transport")?;
    service.waiting().await.context("MCP transport terminated abnormally")?;

    Ok(())
}
