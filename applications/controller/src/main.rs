/// Soundscape Controller - command line front end for a soundscape service
use anyhow::Context;
use clap::{Parser, Subcommand};
use soundscape_controller::{
    BrowserTab, ControlContext, ControllerConfig, InMemoryHost, JsonFileSettings, SoundReference,
};
use soundscape_core::{SoundId, VolumeScope};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "soundscape-controller")]
#[command(about = "Browse and control a remote soundscape service", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "SOUNDSCAPE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reload the catalog from the configured source
    Refresh,
    /// List catalog entries for a tab
    Browse {
        /// Tab to list (moods or oneshots)
        #[arg(short, long, default_value = "moods")]
        tab: BrowserTab,
        /// Filter as field=value; repeat to select several values
        #[arg(short, long = "filter")]
        filters: Vec<String>,
        /// Number of pages to render
        #[arg(short, long, default_value_t = 1)]
        pages: usize,
    },
    /// Show the distinct values available to each filter field
    Options,
    /// List the soundsets of the account
    Soundsets,
    /// Start a mood or element
    Play {
        /// Sound id, bare (1234) or prefixed (m:1234, e:1234)
        sound: SoundId,
    },
    /// Stop a mood or element
    Stop {
        /// Sound id, bare (1234) or prefixed (m:1234, e:1234)
        sound: SoundId,
    },
    /// Stop everything a recorded event stream left playing
    StopAll {
        /// Event stream, one JSON frame per line
        events: PathBuf,
    },
    /// Feed a recorded event stream through the playback tracker
    Replay {
        /// Event stream, one JSON frame per line
        events: PathBuf,
        /// Host sound references, as a JSON array
        #[arg(short, long)]
        references: Option<PathBuf>,
    },
    /// Validate and apply a volume change
    Volume {
        /// Volume between 0 and 1.5
        value: f32,
        /// local or global
        #[arg(short, long, default_value = "local")]
        scope: VolumeScope,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "soundscape_controller=info,soundscape_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = ControllerConfig::load(cli.config.as_deref())?;

    let references = match &cli.command {
        Commands::Replay {
            references: Some(path),
            ..
        } => load_references(path)?,
        _ => Vec::new(),
    };

    let mut ctx = open_context(config, references).await?;

    match cli.command {
        Commands::Refresh => {
            let count = ctx.refresh_catalog().await?;
            println!("{count} catalog entries");
        }
        Commands::Browse {
            tab,
            filters,
            pages,
        } => {
            browse(&mut ctx, tab, &filters, pages).await?;
        }
        Commands::Options => {
            ensure_catalog(&mut ctx).await?;
            print_options(&mut ctx);
        }
        Commands::Soundsets => {
            for set in ctx.soundsets().await? {
                println!("{:>6}  {}  ({})", set.id, set.name, set.uuid);
            }
        }
        Commands::Play { sound } => {
            ensure_catalog(&mut ctx).await?;
            if !ctx.play(sound).await {
                anyhow::bail!("could not play {sound}");
            }
        }
        Commands::Stop { sound } => {
            ensure_catalog(&mut ctx).await?;
            if !ctx.stop(sound).await {
                anyhow::bail!("could not stop {sound}");
            }
        }
        Commands::StopAll { events } => {
            replay(&mut ctx, &events, false)?;
            if !ctx.stop_all().await {
                anyhow::bail!("some sounds could not be stopped");
            }
        }
        Commands::Replay { events, .. } => {
            ensure_catalog(&mut ctx).await?;
            replay(&mut ctx, &events, true)?;
            for reference in ctx.host().sound_references() {
                println!(
                    "{}  {}  playing={}",
                    reference.id,
                    reference.service_path().unwrap_or_else(|| "-".to_string()),
                    reference.playing
                );
            }
        }
        Commands::Volume { value, scope } => {
            let volume = ctx.set_volume(value, scope)?;
            println!("{scope:?} volume set to {}", volume.get());
        }
    }

    ctx.teardown().await;
    Ok(())
}

async fn open_context(
    config: ControllerConfig,
    references: Vec<SoundReference>,
) -> anyhow::Result<ControlContext> {
    let settings = JsonFileSettings::open(&config.settings.path)?;
    tracing::info!("Settings: {}", settings.path().display());

    let mut ctx = ControlContext::new(
        config,
        Box::new(settings),
        Box::new(InMemoryHost::new(references)),
    )?;
    ctx.init().await?;
    Ok(ctx)
}

/// Refresh the catalog unless a cached copy was restored.
async fn ensure_catalog(ctx: &mut ControlContext) -> anyhow::Result<()> {
    if ctx.catalog().is_empty() {
        ctx.refresh_catalog().await?;
    }
    Ok(())
}

async fn browse(
    ctx: &mut ControlContext,
    tab: BrowserTab,
    filters: &[String],
    pages: usize,
) -> anyhow::Result<()> {
    ensure_catalog(ctx).await?;

    let mut selected: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for filter in filters {
        let (field, value) = filter
            .split_once('=')
            .with_context(|| format!("filter {filter:?} is not field=value"))?;
        selected.entry(field.trim()).or_default().push(value.trim());
    }

    let browser = ctx.browser_mut();
    browser.change_tab(tab);
    for (field, values) in selected {
        browser.set_filter(field, values)?;
    }

    ctx.show_results();
    for _ in 0..pages {
        if ctx.next_page() == 0 {
            break;
        }
    }

    for row in ctx.browser().rendered() {
        let marker = if row.playing { "*" } else { " " };
        println!(
            "{marker} {:>8}  {}  [{}]",
            row.entry.sound_id().to_string(),
            row.entry.name,
            row.entry.product_or_pack.as_deref().unwrap_or("-")
        );
    }
    if !ctx.browser().is_exhausted() {
        println!("... more results, use --pages");
    }
    Ok(())
}

fn print_options(ctx: &mut ControlContext) {
    let options = ctx.filter_options();
    for (field, values) in options.iter() {
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        println!("{}: {}", field.canonical_name(), values.join(", "));
    }
}

fn replay(ctx: &mut ControlContext, path: &Path, verbose: bool) -> anyhow::Result<()> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening event stream {}", path.display()))?;
    let applied = ctx
        .replay(std::io::BufReader::new(file))
        .with_context(|| format!("reading event stream {}", path.display()))?;

    if verbose {
        for outcome in &applied {
            println!("{outcome:?}");
        }
    }

    tracing::info!("Replayed {}, {} entries playing", path.display(), ctx.tracker().len());
    Ok(())
}

fn load_references(path: &Path) -> anyhow::Result<Vec<SoundReference>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading sound references {}", path.display()))?;
    Ok(serde_json::from_str(&text)?)
}
