//! rangekv Server Binary
//!
//! Starts the TCP server for rangekv.

use clap::Parser;
use rangekv::network::Server;
use rangekv::{Config, StoreScope};
use tracing_subscriber::{fmt, EnvFilter};

/// rangekv Server
#[derive(Parser, Debug)]
#[command(name = "rangekv-server")]
#[command(about = "In-memory ordered key-value store")]
#[command(version)]
struct Args {
    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    listen: String,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Give every connection its own store instead of one shared store
    #[arg(long)]
    session_scoped: bool,

    /// Close idle connections after this many milliseconds (0 = never)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Drop a connection whose writes stall this many milliseconds (0 = never)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rangekv=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("rangekv Server v{}", rangekv::VERSION);

    let scope = if args.session_scoped {
        StoreScope::Session
    } else {
        StoreScope::Shared
    };

    let config = Config::builder()
        .listen_addr(&args.listen)
        .max_connections(args.max_connections)
        .store_scope(scope)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let server = match Server::bind(config) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
