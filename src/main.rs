use std::env;
use std::io::{self, BufWriter};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{Level, info};
use tracing_subscriber::EnvFilter;

use concordance::{AppState, Concordance, router, write_report};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_DOCUMENT: &str = "document.txt";
const DEFAULT_MAX_PAGE_SIZE: usize = 500;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_config();
    info!("using document at {}", config.document_path.display());

    let start = Instant::now();
    let concordance = Concordance::build_from_file(&config.document_path)
        .with_context(|| format!("indexing {}", config.document_path.display()))?;
    info!("index built in {} ms", start.elapsed().as_millis());

    if !config.serve {
        let mut out = BufWriter::new(io::stdout().lock());
        let written = write_report(&mut out, &concordance).context("writing report")?;
        info!("reported {written} words");
        return Ok(());
    }

    info!("binding to {}:{}", config.host, config.port);
    if config.disable_cache {
        info!("cache headers disabled");
    }
    let table = concordance.freeze();
    let stats = table.stats();
    info!(
        "serving {} words ({} tokens over {} lines)",
        table.len(),
        stats.tokens,
        stats.lines_read
    );
    let state = AppState {
        table,
        max_page_size: config.max_page_size,
        disable_cache: config.disable_cache,
    };

    let app = router(state).layer(TraceLayer::new_for_http());
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid listen address")?;
    let listener = TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(Debug, Clone)]
struct Config {
    document_path: PathBuf,
    serve: bool,
    disable_cache: bool,
    host: String,
    port: u16,
    max_page_size: usize,
}

fn load_config() -> Config {
    let mut serve = false;
    let mut disable_cache = false;
    let mut cli_document: Option<PathBuf> = None;
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serve" => serve = true,
            "--no-cache" => disable_cache = true,
            "--document" => {
                if let Some(path) = args.next() {
                    cli_document = Some(PathBuf::from(path));
                }
            }
            _ => {
                if let Some(path) = arg.strip_prefix("--document=") {
                    cli_document = Some(PathBuf::from(path));
                } else if !arg.starts_with("--") {
                    cli_document = Some(PathBuf::from(arg));
                }
            }
        }
    }

    let document_path = cli_document
        .or_else(|| env::var("DOCUMENT_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT));
    let host = env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);
    let max_page_size = env::var("MAX_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_MAX_PAGE_SIZE);

    Config {
        document_path,
        serve,
        disable_cache,
        host,
        port,
        max_page_size,
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let max_level = env_filter
        .max_level_hint()
        .and_then(|hint| hint.into_level())
        .unwrap_or(Level::INFO);
    // Report goes to stdout; keep diagnostics on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .with_max_level(max_level)
        .init();
}
