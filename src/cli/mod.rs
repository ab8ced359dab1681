use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::clients::emi_backend::EmiBackend;
use crate::core::error::BackendError;
use crate::domain::{LoanScenario, DEFAULT_CALCULATION_METHOD};
use crate::infra::config::Config;
use crate::tools::emi::EmiTools;

#[derive(Parser)]
#[command(name = "emi-mcp-gateway")]
#[command(about = "MCP tools for loan EMI calculations, relayed to the EMI backend")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve MCP (stdio or HTTP per MODE); the default
    Serve,
    /// Print and validate the effective configuration
    Config,
    /// Health check a running gateway in server mode
    Health {
        /// Gateway URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Send a sample calculate_emi request to the backend
    PingBackend {
        /// Backend base URL; defaults to EMI_API_BASE_URL
        #[arg(short, long)]
        url: Option<String>,
    },
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => {
            let cfg = match Config::from_env() {
                Ok(cfg) => cfg,
                Err(e) => {
                    eprintln!("❌ {e}");
                    return ExitCode::FAILURE;
                }
            };
            match crate::infra::boot::run_server(cfg).await {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    tracing::error!(error = %e, "server exited with error");
                    ExitCode::FAILURE
                }
            }
        }
        Commands::Config => match show_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::PingBackend { url } => match ping_backend(url).await {
            Ok(_) => {
                println!("✅ Backend answered calculate_emi");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Backend ping failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url.trim_end_matches('/')))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn show_config() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    println!("📋 Configuration:");
    println!("  Mode: {}", cfg.mode);
    println!("  Port: {}", cfg.port);
    println!("  JSON-RPC shim: {}", if cfg.deprecate_rest { "disabled" } else { "/v1/rpc" });
    println!("  Backend: {}", cfg.backend.base_url);
    println!("  Backend timeout: {}s", cfg.backend.timeout.as_secs());
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    Ok(())
}

async fn ping_backend(url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut backend_cfg = Config::from_env()?.backend;
    if let Some(url) = url {
        backend_cfg.base_url = url;
    }
    let tools = EmiTools::new(EmiBackend::from_config(&backend_cfg));
    let sample = LoanScenario {
        principal: 100000.into(),
        interest_rate: serde_json::Number::from_f64(9.5).ok_or("bad sample rate")?,
        tenure: 12,
        calculation_method: DEFAULT_CALCULATION_METHOD.to_string(),
    };

    println!("🔗 Backend: {}", backend_cfg.base_url);
    let out = tools.calculate_emi(sample).await;
    println!("{}", serde_json::to_string_pretty(&out)?);
    if out.get("error").and_then(|v| v.as_str()) == Some(BackendError::KIND) {
        return Err(out["details"].as_str().unwrap_or("backend_error").to_string().into());
    }
    Ok(())
}
