use anyhow::Context;
use clap::Parser;
use hlsview_core::{BrokerSettings, LocationFetcher, PlayerBroker};
use hlsview_player::ManifestProbe;
use hlsview_player::app::{AppConfig, Cli, Command, PlayerSession};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,hlsview=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file_loaded = dotenvy::dotenv().is_ok();
    init_tracing();
    if env_file_loaded {
        info!("loaded .env file");
    }

    let cli = Cli::parse();
    match cli.command {
        Command::Inspect(args) => inspect(AppConfig::from(&args)).await,
        Command::Play(args) => play(AppConfig::from(&args)).await,
    }
}

async fn inspect(config: AppConfig) -> anyhow::Result<()> {
    let broker = PlayerBroker::new(
        Arc::new(LocationFetcher::new(config.fetch_timeout)),
        BrokerSettings::default(),
    );
    let model = broker
        .load_configuration(config.config_url())
        .await
        .context("failed to load player configuration")?;

    println!("{}", serde_json::to_string_pretty(&model)?);
    Ok(())
}

async fn play(config: AppConfig) -> anyhow::Result<()> {
    let engine = ManifestProbe::new(config.fetch_timeout);
    let session = PlayerSession::start(&config, Box::new(engine));

    if let Err(err) = session.load(config.config_url()).await {
        session.end().await?;
        return Err(err).context("failed to load player configuration");
    }

    let run_for = config.run_for;
    let stop = async move {
        match run_for {
            Some(duration) => tokio::time::sleep(duration).await,
            None => {
                if let Err(err) = tokio::signal::ctrl_c().await {
                    warn!(error = %err, "failed to listen for Ctrl-C");
                    std::future::pending::<()>().await;
                }
            }
        }
    };

    let report = session.run_until(stop).await?;
    for line in report.log.messages() {
        println!("{line}");
    }
    info!(exit = ?report.exit, "session finished");
    Ok(())
}
