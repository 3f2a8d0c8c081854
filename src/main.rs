use std::{path::Path, sync::Arc, time::Duration};

use arc_swap::ArcSwap;
use clap::Parser;
use color_eyre::{
    Result,
    eyre::{Context, eyre},
};
use serde::Serialize;
use switchyard::{
    Dispatch, Router, RouterError, StaticControllerRegistry,
    adapters::FileConfigProvider,
    config::{RouterConfig, RouterConfigValidator, loader::load_config},
    core::rule::HttpMethod,
    metrics,
    ports::config_provider::ConfigProvider,
    tracing_setup,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::Instrument;

#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    #[clap(subcommand)]
    command: Option<Commands>,

    #[clap(short, long, default_value = "switchyard.toml")]
    config: String,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Validate configuration file
    Validate {
        /// Configuration file to validate
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
    /// Initialize a new configuration file
    Init {
        /// Output path for the new config file
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
    /// Print the routing table in evaluation order
    Routes {
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
    /// Resolve a single request path
    Resolve {
        /// Request URI, e.g. /shop/widgets/view
        path: String,
        /// Request method
        #[clap(short, long, default_value = "get")]
        method: String,
        /// Print the outcome as JSON
        #[clap(long)]
        json: bool,
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
    },
    /// Resolve `[METHOD] PATH` lines from stdin, reloading on config change (default)
    Watch {
        #[clap(short, long, default_value = "switchyard.toml")]
        config: String,
        /// Emit JSON logs instead of compact console logs
        #[clap(long)]
        json_logs: bool,
    },
}

/// One line of `watch` output.
#[derive(Serialize)]
struct Outcome<'a> {
    method: &'a str,
    uri: &'a str,
    #[serde(flatten)]
    result: OutcomeResult,
}

#[derive(Serialize)]
#[serde(untagged)]
enum OutcomeResult {
    Dispatch(Dispatch),
    Error { error: String, kind: &'static str, status: u16 },
}

impl From<Result<Dispatch, RouterError>> for OutcomeResult {
    fn from(result: Result<Dispatch, RouterError>) -> Self {
        match result {
            Ok(dispatch) => OutcomeResult::Dispatch(dispatch),
            Err(e) => OutcomeResult::Error {
                error: e.to_string(),
                kind: e.kind(),
                status: e.status_code(),
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    match args.command {
        Some(Commands::Validate { config }) => validate_config_command(&config).await,
        Some(Commands::Init { config }) => init_config_command(&config).await,
        Some(Commands::Routes { config }) => routes_command(&config).await,
        Some(Commands::Resolve {
            path,
            method,
            json,
            config,
        }) => resolve_command(&config, &method, &path, json).await,
        Some(Commands::Watch { config, json_logs }) => watch_command(&config, json_logs).await,
        None => watch_command(&args.config, false).await,
    }
}

/// Load, validate and build a router backed by the config's controller list.
async fn build_router(config_path: &str) -> Result<(RouterConfig, Router)> {
    let config = load_config(config_path)
        .await
        .with_context(|| format!("Failed to load config from {config_path}"))?;
    RouterConfigValidator::validate(&config).map_err(|e| eyre!("{e}"))?;

    let registry = Arc::new(StaticControllerRegistry::from_config(&config));
    let router = Router::new(&config, registry).context("Failed to build router")?;
    Ok((config, router))
}

/// Validate configuration file and exit
async fn validate_config_command(config_path: &str) -> Result<()> {
    println!("🔍 Validating configuration file: {config_path}");

    if !Path::new(config_path).exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' not found");
        std::process::exit(1);
    }

    let config = match load_config(config_path).await {
        Ok(config) => {
            println!("✅ Configuration parsing: OK");
            config
        }
        Err(e) => {
            eprintln!("❌ Configuration parsing failed:");
            eprintln!("   {e:#}");
            std::process::exit(1);
        }
    };

    match RouterConfigValidator::validate(&config) {
        Ok(()) => {
            let guards = &config.guards;
            println!("✅ Configuration validation: OK");
            println!();
            println!("📋 Configuration Summary:");
            println!("   • Base URL: {}", config.http_path);
            println!("   • Routes: {}", config.routes.len());
            println!(
                "   • Default handler: {}/{}",
                config.defaults.handler(),
                config.defaults.action
            );
            println!(
                "   • Controllers: {} ({} dynamic)",
                config.controllers.len() + config.dynamic_controllers.len(),
                config.dynamic_controllers.len()
            );
            println!(
                "   • Guards: double_slash={} index_suffix={} trailing_slash={} lowercase={} (status {})",
                guards.double_slash,
                guards.index_suffix,
                guards.trailing_slash,
                guards.lowercase,
                guards.status_code
            );
            println!();
            println!("🎉 Configuration is valid and ready to use!");
            Ok(())
        }
        Err(e) => {
            eprintln!("❌ Configuration validation failed:");
            eprintln!("{e}");
            println!();
            println!("💡 Common fixes:");
            println!("   • http_path must be an absolute http(s) URL ending with '/'");
            println!("   • Compact rules take the form METHOD@module::controller[/action][/param][/arg]");
            println!("   • Only get and post rules are supported");
            println!("   • Regex patterns must compile (named groups: controller, action, param, arg)");
            std::process::exit(1);
        }
    }
}

/// Initialize a new configuration file
async fn init_config_command(config_path: &str) -> Result<()> {
    let path = Path::new(config_path);
    if path.exists() {
        eprintln!("❌ Error: Configuration file '{config_path}' already exists");
        std::process::exit(1);
    }

    let default_config = r#"# Switchyard Router Configuration

# Canonical base URL used for every guard redirect
http_path = "http://localhost/"

# Controller references the built-in registry knows about
controllers = [
    'App\Controller\Home\IndexController',
    'App\Controller\About\IndexController',
    'App\Controller\Shop\Widgets\ViewController',
]

# Controllers that dispatch any action themselves
dynamic_controllers = []

[defaults]
module = "home"
controller = "index"
action = "index"

[naming]
namespace = 'App\Controller'
separator = '\'
controller_suffix = "Controller"
action_suffix = "Action"

[guards]
double_slash = true
index_suffix = true
trailing_slash = true
lowercase = true
status_code = 301

# Rules are evaluated top to bottom; the first match wins.
[routes]
# Exact module
about = "get@about::index"
# Literal segments
"login/attempt" = "post@login::attempt"
# Token placeholders
"shop/:controller/:action" = "get@shop::1/2"
# Regex captures against the module segment
"<:action>-php-<:controller>" = "get@php::2/1"
# Structured form
contact = { method = "get", module = "contact", controller = "index" }
"#;

    tokio::fs::write(path, default_config)
        .await
        .context("Failed to write config file")?;
    println!("✅ Created default configuration at: {config_path}");
    println!("   Run 'switchyard resolve --config {config_path} /about' to try it");
    Ok(())
}

/// Print the routing table
async fn routes_command(config_path: &str) -> Result<()> {
    let (_, router) = build_router(config_path).await?;
    let table = router.table();

    for method in HttpMethod::ALL {
        let rules = table.rules(method);
        println!("{} ({} rules)", method.as_str().to_uppercase(), rules.len());
        for (i, rule) in rules.iter().enumerate() {
            println!("  {:>3}. {} -> {}", i + 1, rule.name(), rule.handler());
        }
    }
    Ok(())
}

/// Resolve one request and print the outcome
async fn resolve_command(config_path: &str, method: &str, uri: &str, json: bool) -> Result<()> {
    tracing_setup::init_console_tracing()?;
    let (_, router) = build_router(config_path).await?;

    let route = router.route(method, uri);
    let result = router.dispatch(&route);

    if json {
        let outcome = Outcome {
            method: route.method(),
            uri,
            result: OutcomeResult::from(result.clone()),
        };
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match &result {
            Ok(Dispatch::Redirect(redirect)) => {
                println!("↪️  {} {} ({})", redirect.status, redirect.location, redirect.guard);
            }
            Ok(Dispatch::Handler(component)) => {
                println!("✅ {}", component.handler);
                println!("   • Controller: {}", component.controller_ref);
                println!("   • Action: {}", component.action_ref);
                if !component.param.is_empty() {
                    println!("   • Param: {}", component.param);
                }
            }
            Err(e) => eprintln!("❌ {} {}", e.status_code(), e),
        }
    }

    if result.is_err() {
        std::process::exit(1);
    }
    Ok(())
}

/// Resolve stdin lines against a hot-reloaded router
async fn watch_command(config_path: &str, json_logs: bool) -> Result<()> {
    if json_logs {
        tracing_setup::init_tracing()?;
    } else {
        tracing_setup::init_console_tracing()?;
    }
    metrics::init_metrics()?;

    let provider = Arc::new(
        FileConfigProvider::new(config_path).context("Failed to create config provider")?,
    );
    let (_, initial) = build_router(config_path).await?;
    let router_holder = Arc::new(ArcSwap::from_pointee(initial));

    let mut notify_rx = provider.watch();
    let provider_for_watcher = provider.clone();
    let holder_for_watcher = router_holder.clone();
    let debounce_duration = Duration::from_millis(500);

    let watcher_span = tracing_setup::configure_component_tracing("config_watcher");
    let watcher = async move {
        tracing::info!("Config watcher task started.");

        while notify_rx.recv().await.is_some() {
            // Editors emit several events per save
            tokio::time::sleep(debounce_duration).await;
            while notify_rx.try_recv().is_ok() {}

            let reloaded = match provider_for_watcher.load_config().await {
                Ok(config) => match RouterConfigValidator::validate(&config) {
                    Ok(()) => {
                        let registry = Arc::new(StaticControllerRegistry::from_config(&config));
                        Router::new(&config, registry).map_err(|e| eyre!(e))
                    }
                    Err(e) => Err(eyre!(e)),
                },
                Err(e) => Err(e),
            };

            match reloaded {
                Ok(router) => {
                    tracing::info!(rules = router.table().len(), "Router reloaded");
                    holder_for_watcher.store(Arc::new(router));
                }
                Err(e) => {
                    tracing::error!("Failed to reload configuration: {e:#}. Keeping old router.");
                }
            }
        }
        tracing::info!("Config watcher task is shutting down.");
    };
    tokio::spawn(watcher.instrument(watcher_span));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (method, uri) = match line.split_once(char::is_whitespace) {
            Some((method, uri)) => (method, uri.trim()),
            None => ("get", line),
        };

        let router = router_holder.load();
        let route = router.route(method, uri);
        let span = tracing_setup::create_request_span(route.method(), uri);
        let result = span.in_scope(|| router.dispatch(&route));

        let outcome = Outcome {
            method: route.method(),
            uri,
            result: OutcomeResult::from(result),
        };
        println!("{}", serde_json::to_string(&outcome)?);
    }

    Ok(())
}
