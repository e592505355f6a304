//! CiviPort Portal Server
//!
//! HTTP backend for citizen complaint intake and administrator review.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civiport_server::auth::{JwtManager, password};
use civiport_server::http::{AppState, build_router};
use civiport_server::mailer::OtpMailer;
use civiport_server::storage::PortalDatabase;
use civiport_server::uploads::UploadStore;

#[derive(Parser, Debug)]
#[command(name = "civiport-server")]
#[command(version, about = "CiviPort complaint portal backend")]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    addr: SocketAddr,

    /// Path to SQLite database file.
    #[arg(long)]
    db_path: Option<PathBuf>,

    /// JWT signing secret. No baked-in default: startup fails when unset.
    #[arg(long, env = "CIVIPORT_JWT_SECRET", hide_env_values = true)]
    jwt_secret: String,

    /// Session token TTL in seconds (admin and email sessions alike).
    #[arg(long, default_value_t = 86_400)]
    session_ttl: i64,

    /// Directory complaint photos are stored in.
    #[arg(long, default_value = "uploads")]
    upload_dir: PathBuf,

    /// Public base URL uploads are served under.
    #[arg(long, env = "CIVIPORT_BASE_URL", default_value = "http://localhost:8080")]
    base_url: String,

    /// Transactional mail API endpoint for one-time codes.
    #[arg(long, default_value = "https://api.brevo.com/v3/smtp/email")]
    mail_api_url: String,

    /// Mail API key. When unset, codes are logged instead of sent.
    #[arg(long, env = "CIVIPORT_MAIL_API_KEY", hide_env_values = true)]
    mail_api_key: Option<String>,

    /// Sender address for one-time-code mail.
    #[arg(
        long,
        env = "CIVIPORT_MAIL_SENDER",
        default_value = "no-reply@civiport.dev"
    )]
    mail_sender: String,

    /// Seed an administrator with this username at startup. The password is
    /// read from CIVIPORT_ADMIN_PASSWORD.
    #[arg(long)]
    seed_admin: Option<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "civiport_server=info".into()),
    );
    if args.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %args.addr,
        "Starting civiport-server"
    );

    // A database that cannot open is fatal: refuse to serve rather than run
    // half-initialized.
    let db = match &args.db_path {
        Some(path) => {
            info!(path = %path.display(), "Opening portal database");
            PortalDatabase::open(path).await?
        }
        None => {
            let default_path = default_db_path()?;
            info!(path = %default_path.display(), "Opening portal database (default path)");
            PortalDatabase::open(&default_path).await?
        }
    };

    if let Some(username) = &args.seed_admin {
        seed_admin(&db, username).await?;
    }

    let jwt = Arc::new(JwtManager::new(
        args.jwt_secret.as_bytes(),
        args.session_ttl,
    ));

    let mailer = match args.mail_api_key {
        Some(key) => OtpMailer::new(args.mail_api_url.clone(), key, args.mail_sender.clone()),
        None => {
            warn!("No mail API key configured; one-time codes will be logged only");
            OtpMailer::disabled()
        }
    };

    let uploads = UploadStore::new(args.upload_dir.clone(), &args.base_url)?;

    let state = AppState {
        db,
        jwt,
        mailer: Arc::new(mailer),
        uploads: Arc::new(uploads),
    };

    let app = build_router(state);

    let listener = TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, "Portal server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Portal stopped");
    Ok(())
}

/// Insert the seed administrator unless the username is already taken.
async fn seed_admin(db: &PortalDatabase, username: &str) -> anyhow::Result<()> {
    let password = std::env::var("CIVIPORT_ADMIN_PASSWORD").map_err(|_| {
        anyhow::anyhow!("CIVIPORT_ADMIN_PASSWORD must be set when --seed-admin is used")
    })?;

    if db.get_admin_by_username(username).await.is_ok() {
        info!(username = %username, "Administrator already exists; seed skipped");
        return Ok(());
    }

    let hash = password::hash_password(&password)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    let id = uuid::Uuid::new_v4().to_string();
    db.create_admin(&id, username, &hash).await?;

    info!(username = %username, "Administrator seeded");
    Ok(())
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".civiport").join("portal.db"))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => warn!(error = %e, "Failed to install signal handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received terminate signal, shutting down"),
    }
}
