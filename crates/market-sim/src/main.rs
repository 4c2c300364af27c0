use anyhow::Context;
use market_sim::{MarketConfig, MarketServer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = r#"market-sim - simulated live market feed with paper trading

USAGE:
    market-sim [OPTIONS]

OPTIONS:
    -c, --config <PATH>   Load configuration from a JSON file
    -s, --seed <N>        Seed the price walk and research feed
    -h, --help            Print this help message

ENVIRONMENT VARIABLES (ignored when --config is given):
    HOST                  Bind host (default: 0.0.0.0)
    PORT                  Bind port (default: 3000)
    RUST_LOG              Log filter (default: market_sim=info,tower_http=debug)

EXAMPLES:
    market-sim
    market-sim --config market.json
    PORT=9000 market-sim --seed 42
"#;

/// Parsed command line
#[derive(Debug, Default)]
struct CliArgs {
    config_path: Option<String>,
    seed: Option<u64>,
    help: bool,
}

impl CliArgs {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let mut cli = CliArgs::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => cli.help = true,
                "-c" | "--config" => {
                    let path = args.next().context("--config requires a path")?;
                    cli.config_path = Some(path);
                }
                "-s" | "--seed" => {
                    let seed = args.next().context("--seed requires a number")?;
                    cli.seed = Some(
                        seed.parse::<u64>()
                            .with_context(|| format!("--seed is not a number: {seed}"))?,
                    );
                }
                other => anyhow::bail!("unknown argument: {other}"),
            }
        }

        Ok(cli)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "market_sim=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprint!("{USAGE}");
            return Err(e);
        }
    };
    if cli.help {
        eprint!("{USAGE}");
        return Ok(());
    }

    let mut config = match &cli.config_path {
        Some(path) => {
            info!(path = %path, "loading configuration");
            MarketConfig::from_file(path)?
        }
        None => MarketConfig::default().with_env_overrides(|key| std::env::var(key).ok())?,
    };
    if cli.seed.is_some() {
        config.simulation.seed = cli.seed;
    }

    info!(
        instruments = config.instruments.len(),
        starting_cash = %config.portfolios.starting_cash,
        seed = ?config.simulation.seed,
        "configuration ready"
    );

    let server = MarketServer::from_config(config).await?;

    let address = server.config.server.bind_address();
    info!("REST API:  http://{address}/api/");
    info!("WebSocket: ws://{address}/ws");

    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<CliArgs> {
        CliArgs::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_options() {
        let cli = parse(&["--config", "market.json", "-s", "7"]).unwrap();
        assert_eq!(cli.config_path.as_deref(), Some("market.json"));
        assert_eq!(cli.seed, Some(7));
        assert!(!cli.help);

        assert!(parse(&["-h"]).unwrap().help);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse(&["--config"]).is_err());
        assert!(parse(&["--seed", "abc"]).is_err());
        assert!(parse(&["--verbose"]).is_err());
    }
}
