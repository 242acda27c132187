use std::sync::Arc;
use std::time::Duration;

use clap::{Args as ClapArgs, Parser, Subcommand};
use hlsview_core::DEFAULT_FETCH_TIMEOUT;
use hlsview_core::channel::DEFAULT_CAPACITY;
use hlsview_core::surface::DEFAULT_MEDIA_ID;

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "hlsview")]
#[command(about = "Load an HLS player configuration and drive a playback session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the configuration and print the resolved player model as JSON
    Inspect(LoadArgs),
    /// Run a playback session and print its diagnostics log on exit
    Play(PlayArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct LoadArgs {
    /// Player configuration document (http(s) URL, file:// URL or path)
    #[arg(long, env = "HLSVIEW_CONFIG_URL")]
    pub config_url: String,

    /// Request timeout for configuration and manifest fetches (e.g. 10s)
    #[arg(
        long,
        env = "HLSVIEW_FETCH_TIMEOUT",
        default_value = "10s",
        value_parser = humantime::parse_duration
    )]
    pub fetch_timeout: Duration,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct PlayArgs {
    #[command(flatten)]
    pub load: LoadArgs,

    /// Stop the session after this long (e.g. 30s); runs until Ctrl-C otherwise
    #[arg(long, value_parser = humantime::parse_duration)]
    pub duration: Option<Duration>,

    /// Per-subscriber buffer for broker channels
    #[arg(long, env = "HLSVIEW_CHANNEL_CAPACITY", default_value_t = DEFAULT_CAPACITY)]
    pub channel_capacity: usize,

    /// Media element id handed to the streaming engine
    #[arg(long, env = "HLSVIEW_MEDIA_ID", default_value = DEFAULT_MEDIA_ID)]
    pub media_id: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub config_url: Arc<str>,
    pub fetch_timeout: Duration,
    pub channel_capacity: usize,
    pub media_id: Arc<str>,
    pub run_for: Option<Duration>,
}

impl AppConfig {
    pub fn new(config_url: impl Into<String>) -> Self {
        Self {
            config_url: Arc::from(config_url.into()),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            channel_capacity: DEFAULT_CAPACITY,
            media_id: Arc::from(DEFAULT_MEDIA_ID),
            run_for: None,
        }
    }

    pub fn config_url(&self) -> &str {
        &self.config_url
    }
}

impl From<&LoadArgs> for AppConfig {
    fn from(args: &LoadArgs) -> Self {
        Self {
            fetch_timeout: args.fetch_timeout,
            ..Self::new(args.config_url.clone())
        }
    }
}

impl From<&PlayArgs> for AppConfig {
    fn from(args: &PlayArgs) -> Self {
        Self {
            channel_capacity: args.channel_capacity,
            media_id: Arc::from(args.media_id.as_str()),
            run_for: args.duration,
            ..Self::from(&args.load)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn play_args_map_onto_config() {
        let cli = Cli::try_parse_from([
            "hlsview",
            "play",
            "--config-url",
            "http://host/player.json",
            "--fetch-timeout",
            "2s",
            "--duration",
            "1m",
            "--channel-capacity",
            "8",
        ])
        .expect("valid arguments");

        let Command::Play(args) = cli.command else {
            panic!("expected play command");
        };
        let config = AppConfig::from(&args);
        assert_eq!(config.config_url(), "http://host/player.json");
        assert_eq!(config.fetch_timeout, Duration::from_secs(2));
        assert_eq!(config.run_for, Some(Duration::from_secs(60)));
        assert_eq!(config.channel_capacity, 8);
        assert_eq!(&*config.media_id, DEFAULT_MEDIA_ID);
    }

    #[test]
    fn inspect_uses_defaults() {
        let cli = Cli::try_parse_from([
            "hlsview",
            "inspect",
            "--config-url",
            "player.json",
        ])
        .expect("valid arguments");

        let Command::Inspect(args) = cli.command else {
            panic!("expected inspect command");
        };
        let config = AppConfig::from(&args);
        assert_eq!(config.fetch_timeout, DEFAULT_FETCH_TIMEOUT);
        assert_eq!(config.run_for, None);
    }

    #[test]
    fn rejects_bad_durations() {
        let result = Cli::try_parse_from([
            "hlsview",
            "play",
            "--config-url",
            "player.json",
            "--duration",
            "soon",
        ]);
        assert!(result.is_err());
    }
}
