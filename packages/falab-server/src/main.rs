use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use clap::Parser;
use falab_lib::{
    config::{GeneralConfig, ServerConfig},
    logger::Logger,
};
use tower_http::cors::{Any, CorsLayer};

mod handlers;
mod render;
mod storage;
mod store;

/// Shared state handed to every handler.
pub struct App {
    pub config: ServerConfig,
    pub logger: Option<Logger>,
    pub store: store::DirStore,
    pub artifacts: storage::ArtifactSink,
}

#[derive(Parser, Debug)]
#[command(name = "falab")]
#[command(version = "0.1")]
#[command(about = "Finite automata toolkit server", long_about = None)]
struct Args {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<String>,

    /// Overrides the configured port.
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ServerConfig::from_optional_file(args.config)?;
    if let Some(port) = args.port {
        config.set_port(port);
    }

    let logger = Logger::from_config(config.logger(), "Server".into());

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(config, logger))
}

async fn serve(config: ServerConfig, logger: Option<Logger>) -> anyhow::Result<()> {
    let port = *config.get_port();

    let app = Arc::new(App {
        store: store::DirStore::new(config.get_store_dir().clone()),
        artifacts: storage::ArtifactSink::new(config.get_artifact_dir().clone()),
        logger,
        config,
    });

    let cors_layer = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let router = Router::new()
        .route("/boolean", post(handlers::boolean))
        .route("/n-boolean", post(handlers::n_boolean))
        .route("/concatenation", post(handlers::concatenation))
        .route("/complement", get(handlers::complement))
        .route("/minimize-dfa", get(handlers::minimize_dfa))
        .route("/fa-to-regex", get(handlers::fa_to_regex))
        .route("/regex-to-nfa", post(handlers::regex_to_nfa))
        .route("/nfa-to-dfa", get(handlers::nfa_to_dfa))
        .route("/run-string", post(handlers::run_string))
        .route("/to-dot", get(handlers::to_dot))
        .route("/render", post(handlers::render))
        .route("/tex/{id}", get(handlers::get_tex))
        .route("/svg/{id}", get(handlers::get_svg))
        .route("/live", get(handlers::live))
        .with_state(Arc::clone(&app))
        .layer(cors_layer);

    if let Some(logger) = &app.logger {
        logger.info(&format!("listening on 0.0.0.0:{}", port));
    }

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
