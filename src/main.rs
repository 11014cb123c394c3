//! ClassicRouter development server.
//!
//! Serves an application tree with a couple of built-in demo routes. Routing
//! configuration comes from a TOML file, `CLASSIC_*` environment variables
//! and command-line overrides, in rising precedence.

use anyhow::Context;
use clap::Parser;
use classic_router::config::{stack_size_from_env, RoutingConfig};
use classic_router::controller::{Controller, ControllerRegistry};
use classic_router::dispatcher::Dispatcher;
use classic_router::response::{HandlerResult, Response, View};
use classic_router::router::{Callback, Router};
use classic_router::server::{AppService, HttpServer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "classic-router")]
#[command(about = "ClassicRouter development server", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    addr: String,

    /// TOML configuration file with a `[routing]` table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the site root directory
    #[arg(long)]
    root: Option<PathBuf>,

    /// Override the application directory
    #[arg(long)]
    app: Option<PathBuf>,

    /// Print the route table before serving
    #[arg(long, default_value_t = false)]
    dump_routes: bool,
}

/// Default controller for the application root.
struct Home;

impl Controller for Home {
    fn methods(&self) -> &[&'static str] {
        &["index"]
    }

    fn call_action(&mut self, method: &str, _params: &[String]) -> HandlerResult {
        match method {
            "index" => {
                View::html("<h1>ClassicRouter</h1><p>The development server is up.</p>").into()
            }
            _ => Response::new(404).into(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    may::config().set_stack_size(stack_size_from_env());

    let mut config = match &cli.config {
        Some(path) => RoutingConfig::from_file(path)?.with_env_overrides(),
        None => RoutingConfig::from_env(),
    };
    if let Some(root) = cli.root {
        config.root_dir = root;
    }
    if let Some(app) = cli.app {
        config.app_dir = app;
    }

    let mut router = Router::new();
    router.get(
        "health",
        Callback::handler(|_params| {
            Response::new(200)
                .with_header("Content-Type", "application/json")
                .with_body(classic_router::response::Body::Bytes(
                    br#"{"status":"ok"}"#.to_vec(),
                ))
                .into()
        }),
    );
    router.get(
        "hello/{name}",
        Callback::handler(|params| {
            let name = params.first().map(String::as_str).unwrap_or("world");
            View::html(format!("<h1>Hello {name}</h1>")).into()
        }),
    );

    let mut controllers = ControllerRegistry::new();
    controllers.register("App::Controllers::Home", || Box::new(Home));

    if cli.dump_routes {
        router.dump_routes();
    }

    info!(addr = %cli.addr, root = %config.root_dir.display(), "Starting ClassicRouter dev server");
    let dispatcher = Dispatcher::new(Arc::new(router), Arc::new(controllers), Arc::new(config));
    let handle = HttpServer(AppService::new(Arc::new(dispatcher)))
        .start(cli.addr.as_str())
        .with_context(|| format!("failed to bind {}", cli.addr))?;
    handle
        .join()
        .map_err(|e| anyhow::anyhow!("server exited abnormally: {e:?}"))?;
    Ok(())
}
