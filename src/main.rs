//! Mauka Mux - command line entrypoint.
//!
//! Loads the configuration and a route manifest, then checks, lists or
//! resolves routes against the compiled router.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use mauka_mux_lib::config::{
    default_config_path, get_global_config, ConfigLoader, LogConfig, MuxConfig, ENV_PREFIX,
};
use mauka_mux_lib::manifest::RouteManifest;
use mauka_mux_lib::router::{Context, Method, Registry, Request, RouteInfo};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for the Mauka mux.
#[derive(Parser, Debug)]
#[clap(name = "Mauka Mux", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Path to the route manifest, overriding `router.routes_file`
    #[clap(short, long, value_parser)]
    routes: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Build the route manifest and report the first route error
    Check,

    /// Print the flattened route table
    Routes {
        /// Print JSON instead of a table
        #[clap(long)]
        json: bool,
    },

    /// Resolve a single request and print what the router does with it
    Resolve {
        /// Request method
        method: String,

        /// Request path
        path: String,

        /// Request host
        #[clap(long, default_value = "")]
        host: String,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_logging(log: &LogConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location)
        .with_thread_names(true);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.context("Failed to set global tracing subscriber")
}

fn load_registry(config: &MuxConfig, routes: Option<&Path>) -> Result<Registry> {
    let path = routes
        .or(config.router.routes_file.as_deref())
        .context("No route manifest given; pass --routes or set router.routes_file")?;

    let manifest = RouteManifest::load(path)
        .with_context(|| format!("Failed to load route manifest {}", path.display()))?;
    Ok(manifest.to_registry(config.router.clone()))
}

fn print_routes(registry: &Registry, json: bool) -> Result<()> {
    let infos: Vec<RouteInfo> = registry.routes().iter().map(|route| route.info()).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&infos)?);
        return Ok(());
    }

    for info in infos {
        println!(
            "{:<8} {:<12} {:<40} {}",
            info.method.as_str(),
            if info.subdomain.is_empty() { "-" } else { info.subdomain.as_str() },
            info.pattern,
            info.name
        );
    }
    Ok(())
}

fn resolve(registry: &Registry, method: &str, path: &str, host: &str) -> Result<()> {
    let method: Method = method.parse()?;
    let dispatcher = registry.build()?;

    let mut ctx = Context::new(Request::new(method, host, path));
    dispatcher.serve(&mut ctx);

    let response = ctx.response();
    println!("status: {}", response.status);
    for (name, value) in &response.headers {
        println!("{name}: {value}");
    }
    if !ctx.params().is_empty() {
        println!("params: {}", ctx.params());
    }
    print!("{}", response.body_text());
    Ok(())
}

/// Main entry point for the application.
fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().or_else(default_config_path);
    let loader = ConfigLoader::new(config_path.as_deref(), ENV_PREFIX);
    let config = loader.load().context("Failed to load configuration")?;

    init_logging(&config.log)?;
    mauka_mux_lib::init(config).context("Failed to initialize the mux")?;
    let global = get_global_config()?;
    let config = global.get();

    match args.command {
        Command::Check => {
            let registry = load_registry(config, args.routes.as_deref())?;
            match registry.build() {
                Ok(dispatcher) => {
                    info!(
                        routes = registry.len(),
                        trees = dispatcher.trees().len(),
                        "Routes built successfully"
                    );
                    println!("ok: {} routes in {} trees", registry.len(), dispatcher.trees().len());
                    Ok(())
                }
                Err(err) => bail!("route error: {err}"),
            }
        }
        Command::Routes { json } => {
            let registry = load_registry(config, args.routes.as_deref())?;
            print_routes(&registry, json)
        }
        Command::Resolve { method, path, host } => {
            let registry = load_registry(config, args.routes.as_deref())?;
            resolve(&registry, &method, &path, &host)
        }
        Command::Validate => {
            info!("Configuration validated successfully");
            println!("ok");
            Ok(())
        }
        Command::GenConfig { output } => {
            info!("Generating default configuration");

            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let toml = MuxConfig::default().to_toml()?;
            std::fs::write(&output, toml)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}
