//! Farmstand server entry point.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use farmstand::{build_app, open_store, server_config, VERSION};
use farmstand_config::{ConfigLoader, ENV_PREFIX};
use farmstand_server::Server;
use tracing::info;

/// Environment variable naming the configuration file.
const CONFIG_ENV: &str = "FARMSTAND_CONFIG";

/// Command-line arguments.
struct Args {
    /// Path to configuration file.
    config: Option<PathBuf>,
    /// Start from the development preset.
    dev: bool,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut config = None;
        let mut dev = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    config = args.next().map(PathBuf::from);
                }
                "--dev" => dev = true,
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("farmstand {VERSION}");
                    std::process::exit(0);
                }
                other if !other.starts_with('-') && config.is_none() => {
                    config = Some(PathBuf::from(other));
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        let config = config.or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        Self { config, dev }
    }
}

fn print_help() {
    println!(
        r"Farmstand - farm and product catalog

USAGE:
    farmstand [OPTIONS] [CONFIG]

OPTIONS:
    -c, --config <PATH>    Path to configuration file (TOML or JSON)
        --dev              Development preset (debug logs, internal errors shown)
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    FARMSTAND_CONFIG                    Configuration file, when none is given
    FARMSTAND__SERVER__HTTP_ADDR        Listen address (default: 127.0.0.1:3000)
    FARMSTAND__STORE__SEED_FILE         JSON seed loaded at startup
    FARMSTAND__LOGGING__LEVEL           Log filter (default: info)

EXAMPLES:
    farmstand --config config/farmstand.toml
    FARMSTAND__SERVER__HTTP_ADDR=0.0.0.0:8080 farmstand
"
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut loader = ConfigLoader::new().with_dotenv();
    if args.dev {
        loader = loader.with_development();
    }
    if let Some(path) = &args.config {
        loader = loader
            .with_file(path)
            .with_context(|| format!("loading {}", path.display()))?;
    }
    let config = loader
        .with_env_prefix(ENV_PREFIX)
        .load()
        .context("invalid configuration")?;

    farmstand_telemetry::init_logging(&config.log_config()).context("initializing logging")?;

    let store = open_store(&config).context("opening store")?;
    info!(
        version = VERSION,
        farms = store.farm_count().await,
        products = store.product_count().await,
        "store ready"
    );

    let app = build_app(&config, Arc::new(store));
    Server::new(server_config(&config), app)
        .run()
        .await
        .context("server error")?;

    info!("farmstand stopped");
    Ok(())
}
