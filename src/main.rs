use std::{net::SocketAddr, path::PathBuf};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pharmalytics::{
    AppState, CountPolicy, Dataset, EngineOptions, ReturnConvention, build_router,
    graceful_shutdown, load_records_from_path,
};

/// The pharmacy sales analytics dashboard server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the sales CSV export.
    #[arg(long, default_value = "sales.csv")]
    data_path: PathBuf,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// How return transactions are encoded in the data.
    #[arg(long, value_enum, default_value = "signed")]
    return_convention: ReturnConvention,

    /// How the summary's total transaction count combines sales and returns.
    #[arg(long, value_enum, default_value = "gross-all")]
    count_policy: CountPolicy,
}

#[tokio::main]
async fn main() {
    setup_logging();

    let args = Args::parse();

    let records = match load_records_from_path(&args.data_path) {
        Ok(records) => records,
        Err(error) => {
            tracing::error!("could not load {}: {error}", args.data_path.display());
            std::process::exit(1);
        }
    };

    let engine_options = EngineOptions {
        convention: args.return_convention,
        count_policy: args.count_policy,
    };
    let state = AppState::new(Dataset::new(records), engine_options, args.data_path);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("server listening on http://{}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .unwrap();
}

fn setup_logging() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().pretty())
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
