//! # HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.1.

use anyhow::{anyhow, Context, Result};
use codecrafters_http::config::Config;
use codecrafters_http::logging::{self, LogFormat};
use codecrafters_http::server::Server;

fn main() {
    if let Err(e) = run() {
        eprintln!("💥 Error fatal: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Configuración desde CLI / variables de entorno
    let config = Config::new();
    config.validate().map_err(|e| anyhow!(e))?;

    let format = LogFormat::parse(&config.log_format).unwrap_or(LogFormat::Pretty);
    logging::init(&config.log_level, format)?;

    config.print_summary();

    // Crear el servidor e iniciarlo (esto bloqueará el thread)
    let address = config.address();
    let mut server = Server::new(config);
    server
        .run()
        .with_context(|| format!("Failed to serve on {}", address))
}
