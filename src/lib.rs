//! # HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 mínimo: una petición por conexión, un thread por
//! conexión, cuatro comportamientos fijos.
//!
//! ## Arquitectura
//!
//! - `http`: Parsing de requests, headers, responses y status codes
//! - `router`: Rutas ordenadas por prioridad (primera coincidencia gana)
//! - `commands`: Handlers (`/`, `/echo/*`, `/user-agent`, `/files/*`)
//! - `server`: Listener TCP y manejo de conexiones
//! - `config`: Argumentos CLI y variables de entorno
//! - `logging`: Inicialización de `tracing`
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use codecrafters_http::config::Config;
//! use codecrafters_http::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod commands;
pub mod config;
pub mod http;
pub mod logging;
pub mod router;
pub mod server;
