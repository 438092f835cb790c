use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use api_ingress::{ApiIngress, ApiIngressConfig};
use clap::{Parser, Subcommand};
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tokio_util::sync::CancellationToken;
use url::Url;
use user_directory::{UserDirectory, UserDirectoryConfig};

const MEMORY_DSN: &str = "sqlite::memory:";
const MODULE_NAME: &str = "user_directory";

/// Expand a sqlite DSN into an absolute-path DSN using a base directory.
/// - Keeps "sqlite::memory:" as-is.
/// - Normalizes backslashes into forward slashes (important on Windows).
fn absolutize_sqlite_dsn(dsn: &str, base_dir: &Path, create_dirs: bool) -> Result<String> {
    if dsn.eq_ignore_ascii_case(MEMORY_DSN) || dsn.eq_ignore_ascii_case("sqlite://:memory:") {
        return Ok(MEMORY_DSN.to_string());
    }
    let db_path = dsn
        .strip_prefix("sqlite://")
        .ok_or_else(|| anyhow!("DSN must start with sqlite:// (got: {})", dsn))?;

    let (path_str, query) = match db_path.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (db_path, None),
    };

    let mut p = PathBuf::from(path_str);
    if p.as_os_str().is_empty() {
        return Err(anyhow!("Empty SQLite path in DSN"));
    }
    if p.is_relative() {
        p = base_dir.join(p);
    }

    if let Some(dir) = p.parent() {
        if create_dirs {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }

    // Rebuild DSN with absolute path; `mode=rwc` creates the file on first run
    let mut out = String::from("sqlite://");
    out.push_str(&p.to_string_lossy().replace('\\', "/"));
    out.push('?');
    out.push_str(query.unwrap_or("mode=rwc"));
    Ok(out)
}

/// Detect DB backend from URL scheme.
fn detect_from_dsn(cfg: &DatabaseConfig) -> Result<&'static str> {
    let raw = cfg.url.trim();
    if raw.is_empty() {
        return Err(anyhow!("Database URL not configured"));
    }
    if raw.eq_ignore_ascii_case(MEMORY_DSN) {
        return Ok("sqlite");
    }

    let url = Url::parse(raw).map_err(|e| anyhow!("Invalid database DSN '{}': {}", raw, e))?;
    match url.scheme() {
        "sqlite" | "sqlite3" => Ok("sqlite"),
        "postgres" | "postgresql" => Ok("postgres"),
        other => Err(anyhow!("Unsupported database type: {}", other)),
    }
}

/// Consultdesk Server - consultant and client directory
#[derive(Parser)]
#[command(name = "consultdesk-server")]
#[command(about = "Consultdesk Server - consultant and client directory")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Consultdesk Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(&config, &args),
    }
}

/// Database settings to use: `--mock` swaps in an in-memory SQLite.
fn effective_database(config: &AppConfig, args: &CliArgs) -> Result<DatabaseConfig> {
    if args.mock {
        return Ok(DatabaseConfig {
            url: MEMORY_DSN.to_string(),
            max_conns: Some(1),
            busy_timeout_ms: None,
        });
    }
    config
        .database
        .clone()
        .ok_or_else(|| anyhow!("No database configuration found (add a `database` section or pass --mock)"))
}

async fn connect_database(db_cfg: &DatabaseConfig, base_dir: &Path) -> Result<DatabaseConnection> {
    let backend = detect_from_dsn(db_cfg)?;

    let mut dsn = db_cfg.url.trim().to_owned();
    if backend == "sqlite" {
        dsn = absolutize_sqlite_dsn(&dsn, base_dir, true)?;
    }

    // An in-memory SQLite database lives in a single connection.
    let max_conns = if dsn == MEMORY_DSN {
        1
    } else {
        db_cfg.max_conns.unwrap_or(10)
    };

    let mut opts = ConnectOptions::new(dsn.clone());
    opts.max_connections(max_conns)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if let Some(ms) = db_cfg.busy_timeout_ms {
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(Duration::from_millis(u64::from(ms))));
    }

    tracing::info!("Connecting to database: {}", dsn);
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database {dsn}"))?;
    tracing::info!("Connected DB backend: {}", backend);
    Ok(db)
}

fn ingress_config(config: &AppConfig) -> ApiIngressConfig {
    let mut ingress = ApiIngressConfig {
        enable_docs: config.api_ingress.enable_docs,
        cors_enabled: config.api_ingress.cors_enabled,
        body_limit_bytes: config.api_ingress.body_limit_bytes,
        ..Default::default()
    };
    if config.server.timeout_sec > 0 {
        ingress.request_timeout = Duration::from_secs(config.server.timeout_sec);
    }
    ingress
}

fn bind_addr(config: &AppConfig) -> Result<SocketAddr> {
    let (host, port) = (config.server.host.as_str(), config.server.port);
    (host, port)
        .to_socket_addrs()
        .with_context(|| format!("Invalid bind address {host}:{port}"))?
        .next()
        .ok_or_else(|| anyhow!("Bind address {host}:{port} resolved to nothing"))
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");

    let module_cfg: UserDirectoryConfig = config.module_config(MODULE_NAME)?;
    let addr = bind_addr(&config)?;
    let db_cfg = effective_database(&config, &args)?;

    let db = connect_database(&db_cfg, Path::new(&config.server.home_dir)).await?;
    UserDirectory::migrate(&db).await?;
    let directory = UserDirectory::init(&module_cfg, db)?;

    let ingress = ApiIngress::new(ingress_config(&config));
    let router = ingress.build_router(
        directory.register_rest(axum::Router::new()),
        Some(UserDirectory::openapi()),
    )?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for shutdown signal: {}", e);
        }
        on_signal.cancel();
    });

    ingress.serve(router, addr, cancel).await
}

fn check_config(config: &AppConfig, args: &CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");

    bind_addr(config)?;
    let module_cfg: UserDirectoryConfig = config.module_config(MODULE_NAME)?;
    Url::parse(&module_cfg.postal_base_url)
        .with_context(|| format!("Invalid postal_base_url '{}'", module_cfg.postal_base_url))?;
    let db_cfg = effective_database(config, args)?;
    let backend = detect_from_dsn(&db_cfg)?;

    tracing::info!("Configuration is valid");
    println!("Configuration check passed (database backend: {backend})");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db(url: &str) -> DatabaseConfig {
        DatabaseConfig {
            url: url.into(),
            max_conns: None,
            busy_timeout_ms: None,
        }
    }

    #[test]
    fn memory_dsn_is_kept() {
        let base = Path::new("/srv");
        assert_eq!(absolutize_sqlite_dsn("sqlite::memory:", base, false).unwrap(), MEMORY_DSN);
        assert_eq!(absolutize_sqlite_dsn("sqlite://:memory:", base, false).unwrap(), MEMORY_DSN);
    }

    #[test]
    fn relative_sqlite_path_is_anchored_to_home() {
        let tmp = tempfile::tempdir().unwrap();
        let dsn = absolutize_sqlite_dsn("sqlite://database/app.db", tmp.path(), true).unwrap();
        let expected = format!(
            "sqlite://{}?mode=rwc",
            tmp.path().join("database/app.db").to_string_lossy().replace('\\', "/")
        );
        assert_eq!(dsn, expected);
        assert!(tmp.path().join("database").is_dir());
    }

    #[test]
    fn explicit_query_is_preserved() {
        let dsn = absolutize_sqlite_dsn("sqlite:///tmp/x.db?mode=ro", Path::new("/srv"), false).unwrap();
        assert_eq!(dsn, "sqlite:///tmp/x.db?mode=ro");
    }

    #[test]
    fn empty_sqlite_path_is_rejected() {
        assert!(absolutize_sqlite_dsn("sqlite://", Path::new("/srv"), false).is_err());
        assert!(absolutize_sqlite_dsn("postgres://x", Path::new("/srv"), false).is_err());
    }

    #[test]
    fn backend_detection() {
        assert_eq!(detect_from_dsn(&db("sqlite://db.sqlite")).unwrap(), "sqlite");
        assert_eq!(detect_from_dsn(&db("sqlite::memory:")).unwrap(), "sqlite");
        assert_eq!(detect_from_dsn(&db("postgres://u:p@h/db")).unwrap(), "postgres");
        assert!(detect_from_dsn(&db("mysql://h/db")).is_err());
        assert!(detect_from_dsn(&db("  ")).is_err());
    }

    #[test]
    fn mock_flag_overrides_database() {
        let config = AppConfig::default();
        let args = CliArgs {
            config: None,
            port: None,
            print_config: false,
            verbose: 0,
            mock: true,
        };
        assert_eq!(effective_database(&config, &args).unwrap().url, MEMORY_DSN);
    }

    #[test]
    fn bind_address_accepts_hostnames() {
        let mut config = AppConfig::default();
        config.server.host = "localhost".into();
        assert_eq!(bind_addr(&config).unwrap().port(), 8087);
        config.server.host = "not a host".into();
        assert!(bind_addr(&config).is_err());
    }

    #[test]
    fn server_timeout_overrides_ingress_default() {
        let mut config = AppConfig::default();
        assert_eq!(ingress_config(&config).request_timeout, Duration::from_secs(30));
        config.server.timeout_sec = 5;
        assert_eq!(ingress_config(&config).request_timeout, Duration::from_secs(5));
    }
}
