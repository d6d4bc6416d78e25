use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tsg_token::cache::FileTokenStore;
use tsg_token::observability::{CompositeObserver, MetricsObserver, TracingObserver};
use tsg_token::utils::config_loader;
use tsg_token::utils::constants::DEFAULT_TOKEN_FILE;
use tsg_token::utils::logging::{self, LogLevel};
use tsg_token::{ClientCredentials, TokenProvider};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// optional YAML config file
    #[arg(short, long, env = "CONFIG")]
    config: Option<String>,
    #[arg(long, env = "CLIENT_ID")]
    client_id: Option<String>,
    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,
    /// tenant service group id, requested as scope `tsg_id:<id>`
    #[arg(long, env = "TSG_ID")]
    tsg_id: Option<String>,
    #[arg(long, env = "TOKEN_FILE")]
    token_file: Option<String>,
    /// ignore the cached token
    #[arg(long)]
    force_refresh: bool,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// dump prometheus metrics to stderr before exiting
    #[arg(long)]
    print_metrics: bool,
}

fn required(cli: Option<String>, file: Option<String>, name: &str) -> Result<String> {
    cli.or(file)
        .ok_or_else(|| anyhow!("missing {name}: pass the flag, set the env var or add it to the config file"))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(args.config.as_deref()).await?;
    logging::run(&service_config.settings.logging, args.log_level);

    // -------------------------------
    // 2. Resolve credentials and cache location (flags/env over file)
    // -------------------------------

    let file_credentials = service_config.credentials;
    let credentials = ClientCredentials::new(
        required(args.client_id, file_credentials.client_id, "client id")?,
        required(args.client_secret, file_credentials.client_secret, "client secret")?,
        required(args.tsg_id, file_credentials.tenant_id, "tsg id")?,
    )?;
    let token_file = args
        .token_file
        .or(service_config.cache.path)
        .unwrap_or_else(|| DEFAULT_TOKEN_FILE.to_owned());

    // -------------------------------
    // 3. Build provider
    // -------------------------------

    let metrics = Arc::new(MetricsObserver::new().map_err(|e| anyhow!("metrics init failed: {e}"))?);
    let observer = CompositeObserver::new()
        .with(Arc::new(TracingObserver))
        .with(metrics.clone());
    let provider = TokenProvider::new(&service_config.settings, credentials, FileTokenStore::new(&token_file))
        .context("failed to build token provider")?
        .with_observer(Arc::new(observer));

    // -------------------------------
    // 4. Get token
    // -------------------------------

    info!("token cache '{}'", token_file);
    let result = provider.get_token(args.force_refresh).await;

    if args.print_metrics {
        eprint!("{}", metrics.render().map_err(|e| anyhow!("metrics render failed: {e}"))?);
    }

    match result {
        Ok(token) => {
            println!("{}", token.as_str());
            Ok(())
        }
        Err(err) => {
            // the token is valid even though it was not cached
            if let Some(token) = err.recovered_token() {
                warn!("printing token that could not be cached");
                println!("{}", token.as_str());
            }
            Err(err.into())
        }
    }
}
