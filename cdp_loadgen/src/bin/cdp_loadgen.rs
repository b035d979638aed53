use std::{
    env,
    net::SocketAddr,
    num::{NonZeroU16, NonZeroU32},
    path::{Path, PathBuf},
};

use cdp_loadgen::{
    config::{self, Config, Mode},
    dispatch::{self, Dispatcher},
    persist,
    report::Report,
};
use cdp_loadgen_payload::{IdentityPool, Profile, ProfileEvent};
use clap::Parser;
use http::Uri;
use jemallocator::Jemalloc;
use metrics_exporter_prometheus::PrometheusBuilder;
use rand::{Rng, SeedableRng, rngs::StdRng};
use time::OffsetDateTime;
use tokio::{runtime::Builder, time::Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const CONFIG_ENV_VAR: &str = "CDP_LOADGEN_CONFIG";
const BANNER_RULE: &str = "------------------------------------------------------";

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    Config(#[from] config::Error),
    #[error("Dispatcher setup failed: {0}")]
    Dispatch(#[from] dispatch::Error),
    #[error("Failed to persist run: {0}")]
    Persist(#[from] persist::Error),
    #[error("Failed to install prometheus recorder: {0}")]
    Prometheus(#[from] metrics_exporter_prometheus::BuildError),
}

#[derive(Parser, Debug)]
#[clap(version, about = "Send synthetic profile events to a CDP ingestion endpoint", long_about = None)]
struct Cli {
    /// number of events to generate
    #[clap(short = 'n', long)]
    num_events: Option<u32>,
    /// ingestion endpoint URL
    #[clap(short = 'u', long)]
    url: Option<Uri>,
    /// API key sent in the X-API-Key header
    #[clap(short = 'k', long)]
    api_key: Option<String>,
    /// sending mode
    #[clap(short = 'm', long, value_enum)]
    mode: Option<Mode>,
    /// number of concurrent workers in batch mode
    #[clap(short = 'w', long)]
    workers: Option<NonZeroU16>,
    /// do not write generated events or results to disk
    #[clap(long)]
    no_save: bool,
    /// do not log dispatch progress
    #[clap(long)]
    no_progress: bool,
    /// number of unique idcards, fewer means more merges
    #[clap(long)]
    unique_idcards: Option<NonZeroU32>,
    /// path on disk to a YAML configuration file
    #[clap(long)]
    config_path: Option<PathBuf>,
    /// seed for event generation
    #[clap(long)]
    seed: Option<u64>,
    /// directory generated files are written into
    #[clap(long)]
    output_dir: Option<PathBuf>,
    /// per-request timeout in seconds
    #[clap(long)]
    timeout_secs: Option<u64>,
    /// serve prometheus metrics on this address for the duration of the run
    #[clap(long)]
    prometheus_addr: Option<SocketAddr>,
}

impl Cli {
    /// Override `config` with every flag given on the command line.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(num_events) = self.num_events {
            config.num_events = num_events;
        }
        if let Some(url) = &self.url {
            config.target_uri = url.clone();
        }
        if let Some(api_key) = &self.api_key {
            config.api_key.clone_from(api_key);
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.no_save {
            config.save_to_file = false;
        }
        if self.no_progress {
            config.show_progress = false;
        }
        if let Some(unique_idcards) = self.unique_idcards {
            config.unique_idcards = unique_idcards;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(output_dir) = &self.output_dir {
            config.output_dir.clone_from(output_dir);
        }
        if let Some(secs) = self.timeout_secs {
            config.request_timeout_millis = secs.saturating_mul(1_000);
        }
        config
    }
}

/// Load the base configuration: the `CDP_LOADGEN_CONFIG` env var if set,
/// else the file at `config_path`, else the defaults.
fn load_config(config_path: Option<&Path>) -> Result<Config, Error> {
    let res = if let Ok(env_var_value) = env::var(CONFIG_ENV_VAR) {
        debug!("Using config from env var '{CONFIG_ENV_VAR}'");
        Config::from_yaml(&env_var_value)
    } else if let Some(config_path) = config_path {
        debug!("Attempting to open configuration file at: {config_path:?}");
        config::load_config_from_path(config_path)
    } else {
        return Ok(Config::default());
    };

    res.map_err(|err| {
        error!("Configuration validation failed: {err}");
        Error::Config(err)
    })
}

fn get_config(cli: &Cli) -> Result<Config, Error> {
    let config = load_config(cli.config_path.as_deref())?;
    Ok(cli.apply(config))
}

fn file_timestamp() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn print_banner(config: &Config) {
    println!("{BANNER_RULE}");
    println!("CDP PROFILE EVENT SENDER");
    println!("{BANNER_RULE}");
    println!("API URL: {}", config.target_uri);
    println!("API Key: {}", config.api_key);
    println!("Events to send: {}", config.num_events);
    println!("Unique IDCards: {}", config.unique_idcards);
    match config.mode {
        Mode::Batch => {
            println!("Mode: batch");
            println!("Workers: {}", config.workers);
        }
        Mode::Sequential => println!("Mode: sequential"),
    }
    println!("{BANNER_RULE}");
}

fn generate_events(config: &Config) -> Vec<ProfileEvent> {
    let seed = config.seed.unwrap_or_else(|| rand::rng().random());
    info!("Generating events with seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let pool = IdentityPool::generate(config.unique_idcards, &mut rng);
    let profile = Profile::new(pool);
    let total = config.num_events as usize;
    (1..=total)
        .map(|index| profile.generate(index, &mut rng))
        .collect()
}

async fn inner_main(config: Config, prometheus_addr: Option<SocketAddr>) -> Result<Report, Error> {
    if let Some(addr) = prometheus_addr {
        info!("Serving prometheus metrics on {addr}");
        PrometheusBuilder::new().with_http_listener(addr).install()?;
    }

    print_banner(&config);
    if !config.merges_expected() {
        warn!(
            "{unique} unique idcards for {events} events, no profile merges will occur",
            unique = config.unique_idcards,
            events = config.num_events,
        );
    }

    let dispatcher = Dispatcher::new(&config)?;

    println!();
    println!("Generating {} events...", config.num_events);
    let events = generate_events(&config);
    println!("Generated {} events", events.len());

    if config.save_to_file {
        let path = persist::save_events(&config.output_dir, &events, file_timestamp())?;
        println!("Saved to: {}", path.display());
    }

    let start = Instant::now();
    let outcomes = dispatcher
        .dispatch(&events, config.strategy(), config.show_progress)
        .await;
    let elapsed = start.elapsed();

    let report = Report::summarize(&outcomes, &events);
    print!("{report}");

    let elapsed_secs = elapsed.as_secs_f64();
    println!();
    println!("Total time: {elapsed_secs:.2}s");
    if elapsed_secs > 0.0 {
        println!(
            "Throughput: {:.2} events/sec",
            events.len() as f64 / elapsed_secs
        );
    }

    if config.save_to_file {
        let path = persist::save_results(
            &config.output_dir,
            config.num_events as usize,
            &outcomes,
            file_timestamp(),
        )?;
        println!("Results saved to: {}", path.display());
    }

    println!();
    println!("Done!");
    Ok(report)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .finish()
        .init();

    let version = env!("CARGO_PKG_VERSION");
    info!("Starting cdp-loadgen {version} run.");

    let cli = Cli::parse();
    let config = get_config(&cli)?;

    let runtime = Builder::new_multi_thread()
        .enable_io()
        .enable_time()
        .build()?;
    let res = runtime.block_on(inner_main(config, cli.prometheus_addr));
    if let Err(err) = &res {
        error!("Run failed: {err}");
    }
    info!("Bye. :)");
    res.map(|_| ())
}
