//! KMI server entrypoint.

use kmi_core::constants::DEFAULT_CONFIG_PATH;
use kmi_core::{sweeper, Config, ExpiringStore};
use kmi_server::{serve_router, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliArgs {
    help: bool,
    config_path: Option<String>,
}

fn parse_cli_args(args: &[String]) -> anyhow::Result<CliArgs> {
    let mut parsed = CliArgs::default();
    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "--help" => parsed.help = true,
            value if value.starts_with('-') => {
                anyhow::bail!(
                    "Unknown option: '{}'. Use --help to see supported options.",
                    value
                );
            }
            value => {
                if parsed.config_path.is_some() {
                    anyhow::bail!(
                        "Unexpected extra argument: '{}'. Use --help to see supported options.",
                        value
                    );
                }
                parsed.config_path = Some(value.to_string());
            }
        }
    }
    Ok(parsed)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kmi_core=info,kmi_server=info,kmi=info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().collect();
    let cli = parse_cli_args(&args)?;

    if cli.help {
        print_help();
        return Ok(());
    }

    let config_path = cli.config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let config = Config::load(config_path).map_err(|err| {
        anyhow::anyhow!("Error loading configuration file '{}': {}", config_path, err)
    })?;
    tracing::info!(
        ttl_secs = config.ttl.as_secs(),
        sweep_secs = config.sweep_interval.as_secs(),
        "configuration loaded from {}",
        config_path
    );

    let store = Arc::new(ExpiringStore::new());
    let sweeper = sweeper::spawn(Arc::clone(&store), config.sweep_interval);

    let bind_host = config.host.clone();
    let port = config.port;
    let state = AppState::new(config, store);

    let listener = tokio::net::TcpListener::bind((bind_host.as_str(), port)).await?;
    let actual_addr = listener.local_addr()?;
    tracing::info!("KMI running at http://{}", actual_addr);

    let serve_result = serve_router(listener, state, shutdown_signal()).await;

    sweeper.shutdown();
    serve_result?;

    Ok(())
}

fn print_help() {
    println!("KMI Server\n");
    println!("Usage: kmi [CONFIG_FILE]\n");
    println!("Arguments:");
    println!(
        "  CONFIG_FILE       Path to the configuration file (default: {})",
        DEFAULT_CONFIG_PATH
    );
    println!("\nOptions:");
    println!("  --help            Show this help message");
    println!("\nConfiguration keys:");
    println!("  [KMI.WebServer] Host, Port");
    println!("  [KMI.Settings]  TimeToExpired (seconds)");
    println!("  [KMI.Settings]  SweepInterval (seconds, optional)");
    println!("  [KMI.Settings]  CollisionRetries (optional)");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_cli_args, CliArgs};

    #[test]
    fn parse_cli_args_rejects_unknown_options() {
        let args = vec!["kmi".to_string(), "--hlep".to_string()];
        let err = parse_cli_args(&args).expect_err("unknown option should be rejected");
        assert!(err.to_string().contains("Unknown option"));
    }

    #[test]
    fn parse_cli_args_rejects_extra_positional_arguments() {
        let args = vec![
            "kmi".to_string(),
            "one.config".to_string(),
            "two.config".to_string(),
        ];
        let err = parse_cli_args(&args).expect_err("second positional should be rejected");
        assert!(err.to_string().contains("Unexpected extra argument"));
    }

    #[test]
    fn parse_cli_args_accepts_config_path_and_help() {
        let args = vec![
            "kmi".to_string(),
            "--help".to_string(),
            "local.config".to_string(),
        ];
        let parsed = parse_cli_args(&args).expect("supported args should parse");
        assert_eq!(
            parsed,
            CliArgs {
                help: true,
                config_path: Some("local.config".to_string()),
            }
        );
    }
}
