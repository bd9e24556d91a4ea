//! Aria - headless player
use anyhow::Context;
use aria_catalog_client::{CatalogClient, CatalogPlayReporter, StaticToken};
use aria_cli::{
    config::AppConfig,
    output::virtual_output,
    session::{read_queue_file, Session},
};
use aria_playback::{PlayReporter, PlaybackEngine, RepeatMode, Track};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aria")]
#[command(about = "Headless Aria player", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./aria.toml)
    #[arg(short, long, global = true, env = "ARIA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a queue file (JSON array of songs)
    Play {
        /// Queue file path
        queue: PathBuf,

        #[command(flatten)]
        start: StartOptions,
    },
    /// Fetch a playlist from the catalog and play it
    Playlist {
        /// Playlist ID
        id: String,

        #[command(flatten)]
        start: StartOptions,
    },
}

#[derive(Args)]
struct StartOptions {
    /// Queue entry to start from
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Enable shuffle
    #[arg(long)]
    shuffle: bool,

    /// Repeat mode
    #[arg(long, value_enum)]
    repeat: Option<RepeatArg>,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Off,
    All,
    One,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::All => RepeatMode::All,
            RepeatArg::One => RepeatMode::One,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    "aria=info,aria_cli=info,aria_playback=info,aria_catalog_client=info".into()
                }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::load_or_default(cli.config.as_deref());

    let catalog = CatalogClient::new(
        config.catalog.client_config(),
        Arc::new(StaticToken::new(config.catalog.token.clone())),
    )
    .context("Invalid catalog configuration")?;

    let (tracks, start) = match cli.command {
        Commands::Play { queue, start } => (read_queue_file(&queue)?, start),
        Commands::Playlist { id, start } => {
            let playlist = catalog
                .get_playlist(&id)
                .await
                .with_context(|| format!("Failed to fetch playlist {}", id))?;
            tracing::info!("Playlist: {}", playlist.name);
            (playlist.songs, start)
        }
    };

    if start.shuffle {
        config.playback.shuffle = true;
    }
    if let Some(repeat) = start.repeat {
        config.playback.repeat = repeat.into();
    }

    play(config, catalog, tracks, start.start).await
}

async fn play(
    config: AppConfig,
    catalog: CatalogClient,
    tracks: Vec<Track>,
    start: usize,
) -> anyhow::Result<()> {
    if tracks.is_empty() {
        anyhow::bail!("Nothing to play: the queue is empty");
    }

    let mut engine = PlaybackEngine::new(config.playback.clone());
    if config.catalog.report_plays {
        engine.set_reporter(
            CatalogPlayReporter::current(catalog)
                .map(|r| Box::new(r) as Box<dyn PlayReporter>),
        );
    }

    let (output, deck) = virtual_output();
    engine.attach(Box::new(output));

    tracing::info!(tracks = tracks.len(), start, "Starting playback");
    let mut session = Session::new(engine, deck, Duration::from_millis(config.output.tick_ms));
    session.start(tracks, start);
    session.run().await
}
