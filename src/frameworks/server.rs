use crate::frameworks::config::{self, Config};
use crate::frameworks::{db, frontend};
use crate::interface_adapters::routes;
use crate::interface_adapters::state::AppState;
use sqlx::PgPool;
use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::{ServeDir, ServeFile};

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

// Startup sequence: env file, tracing, config, frontend fallback,
// datastore, routes, listener. The listener must not bind unless the
// datastore connection succeeded.
pub async fn run() {
    // Load the mode-selected env file; safe to ignore when not present.
    config::load_env_file();
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(?error, "invalid configuration");
            return; // Abort startup on configuration failure.
        }
    };

    // Bring up the page-serving fallback (dev mode rebuilds assets first).
    let frontend = match frontend::init(
        config.run_mode,
        &config.frontend_dir,
        &config.frontend_dist,
    )
    .await
    {
        Ok(service) => service,
        Err(error) => {
            tracing::error!(?error, "failed to initialize frontend");
            return; // Abort startup on frontend failure.
        }
    };

    // Connect to the datastore before anything can be served.
    let _ = bind_after_connect(
        || db::connect_pool(&config.database_url),
        |db| serve_app(&config, frontend, db),
    )
    .await;
}

// Startup gate: the bind step runs only with a live datastore
// connection. A failed connect logs and yields None without ever
// touching the listener.
async fn bind_after_connect<Db, Err, Connect, ConnectFut, Bind, BindFut, Out>(
    connect: Connect,
    bind: Bind,
) -> Option<Out>
where
    Err: Display,
    Connect: FnOnce() -> ConnectFut,
    ConnectFut: Future<Output = Result<Db, Err>>,
    Bind: FnOnce(Db) -> BindFut,
    BindFut: Future<Output = Out>,
{
    let db = match connect().await {
        Ok(db) => db,
        Err(error) => {
            tracing::error!(%error, "failed to connect to database");
            return None; // No listener without a database.
        }
    };

    Some(bind(db).await)
}

async fn serve_app(config: &Config, frontend: ServeDir<ServeFile>, db: PgPool) {
    if let Err(error) = db::run_migrations(&db).await {
        tracing::error!(%error, "failed to run migrations");
        return;
    }

    // Shared state: in-memory sessions plus the database pool.
    let state = AppState {
        sessions: Arc::new(Mutex::new(HashMap::new())),
        db,
    };

    // API routes first, then the frontend fallback, CORS outermost.
    let app = routes::app(state)
        .fallback_service(frontend)
        .layer(routes::cors());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    // Bind TCP listener with error handling.
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%addr, %error, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };
    tracing::info!(%addr, "listening");

    // Serve app and report errors rather than panicking.
    if let Err(error) = axum::serve(listener, app).await {
        tracing::error!(%error, "server error");
    }
}
