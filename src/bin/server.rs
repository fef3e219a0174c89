use std::{
    env::{self},
    fs::OpenOptions,
    net::SocketAddr,
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Arc,
};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use sbanken_dashboard::{
    AppState, BankProvider, Credentials, Error, FixtureProvider, SbankenClient, build_router,
    get_local_offset, graceful_shutdown, select_standard_account,
};

/// The web server for the Sbanken dashboard.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The customer's national identity number.
    #[arg(long)]
    customer_id: String,

    /// The canonical name of the local timezone, e.g. "Europe/Oslo".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Read transactions from this JSON file instead of the Sbanken API.
    #[arg(long)]
    fixture_path: Option<PathBuf>,

    /// Where to write the debug log.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,

    /// The port to serve the dashboard from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    setup_logging(&args.log_path);

    if get_local_offset(&args.timezone).is_none() {
        tracing::error!("Invalid timezone {}", args.timezone);
        return ExitCode::FAILURE;
    }

    let provider = match create_provider(args.fixture_path.as_deref()).await {
        Ok(provider) => provider,
        Err(error) => {
            tracing::error!("Could not set up the bank provider: {error}");
            return ExitCode::FAILURE;
        }
    };

    let account_id = match find_standard_account(&provider, &args.customer_id).await {
        Ok(account_id) => account_id,
        Err(error) => {
            tracing::error!("Could not find a standard account: {error}");
            return ExitCode::FAILURE;
        }
    };

    let state = AppState::new(provider, &args.customer_id, &account_id, &args.timezone);

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!("HTTP server listening on {}", addr);
    if let Err(error) = axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
    {
        tracing::error!("Server stopped with an error: {error}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn create_provider(fixture_path: Option<&Path>) -> Result<BankProvider, Error> {
    if let Some(path) = fixture_path {
        return FixtureProvider::from_path(path).map(BankProvider::Fixture);
    }

    let credentials = Credentials {
        client_id: read_env_var("SBANKEN_CLIENT_ID")?,
        client_secret: read_env_var("SBANKEN_CLIENT_SECRET")?,
    };

    let client = SbankenClient::new(credentials);
    client.authenticate().await?;
    tracing::info!("Authenticated with the Sbanken API");

    Ok(BankProvider::Sbanken(client))
}

fn read_env_var(name: &str) -> Result<String, Error> {
    env::var(name).map_err(|_| {
        Error::AuthenticationError(format!("the environment variable '{name}' must be set"))
    })
}

async fn find_standard_account(
    provider: &BankProvider,
    customer_id: &str,
) -> Result<String, Error> {
    if let Some(customer) = provider.get_customer(customer_id).await? {
        tracing::info!("Showing transactions for {}", customer.full_name());
    }

    let accounts = provider.list_accounts(customer_id).await?;
    let account_id = select_standard_account(&accounts)?;
    tracing::info!("Using standard account {account_id}");

    Ok(account_id.to_owned())
}

fn setup_logging(log_path: &Path) {
    let stdout_log = tracing_subscriber::fmt::layer().pretty();

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .expect("Could not create log file");

    let debug_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry()
        .with(
            stdout_log
                .with_filter(filter::LevelFilter::INFO)
                .and_then(debug_log)
                .with_filter(filter::LevelFilter::DEBUG),
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
        // Errors are logged where they are converted into responses.
        .on_failure(());

    router.layer(tracing_layer)
}
