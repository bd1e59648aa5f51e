//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración por argumentos CLI y variables de entorno. Es de solo
//! lectura una vez arrancado el servidor.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./codecrafters_http --directory /tmp/files --port 4221
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! FILES_DIRECTORY=/tmp/files HTTP_PORT=8080 LOG_FORMAT=json ./codecrafters_http
//! ```

use crate::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Configuración del servidor
#[derive(Debug, Clone, Parser)]
#[command(name = "codecrafters_http")]
#[command(about = "Servidor HTTP/1.1 minimo: echo, user-agent y archivos estaticos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Directorio raíz para `/files/*`. Sin él, `/files/*` siempre es 404
    #[arg(long, env = "FILES_DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Timeout de lectura por conexión en milisegundos (0 = sin timeout)
    #[arg(long = "read-timeout-ms", default_value = "0", env = "READ_TIMEOUT_MS")]
    pub read_timeout_ms: u64,

    // === Logging ===

    /// Nivel de log (trace, debug, info, warn, error). RUST_LOG tiene prioridad
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,

    /// Formato de log: pretty o json
    #[arg(long = "log-format", default_value = "pretty", env = "LOG_FORMAT")]
    pub log_format: String,
}

impl Config {
    /// Parsea argumentos CLI (y variables de entorno)
    pub fn new() -> Self {
        Config::parse()
    }

    /// Dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use codecrafters_http::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `None` si el timeout está desactivado
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_ms > 0).then(|| Duration::from_millis(self.read_timeout_ms))
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if let Some(dir) = &self.directory {
            if !dir.is_dir() {
                return Err(format!("Files directory is not a directory: {}", dir.display()));
            }
        }

        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        if LogFormat::parse(&self.log_format).is_none() {
            return Err(format!(
                "Log format must be 'pretty' or 'json', got '{}'",
                self.log_format
            ));
        }

        Ok(())
    }

    /// Imprime un resumen de la configuración
    pub fn print_summary(&self) {
        println!("=================================");
        println!("  HTTP/1.1 Server");
        println!("=================================");
        println!();
        println!("🌐 Network:");
        println!("   Address:      {}", self.address());
        match &self.directory {
            Some(dir) => println!("   Files dir:    {}", dir.display()),
            None => println!("   Files dir:    (none, /files/* -> 404)"),
        }
        match self.read_timeout() {
            Some(timeout) => println!("   Read timeout: {} ms", timeout.as_millis()),
            None => println!("   Read timeout: disabled"),
        }
        println!();
        println!("📝 Logging:");
        println!("   Level:        {}", self.log_level);
        println!("   Format:       {}", self.log_format);
        println!();
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            directory: None,
            host: "127.0.0.1".to_string(),
            port: 4221,
            read_timeout_ms: 0,
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}
