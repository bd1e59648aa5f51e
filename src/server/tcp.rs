//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Un thread por conexión. Cada thread lee un request, lo enruta, escribe
//! la respuesta y cierra. Lo único compartido es el `Router`, de solo
//! lectura.

use crate::config::Config;
use crate::commands::FileHandler;
use crate::http::{Request, Response, StatusCode};
use crate::router::Router;
use std::io::{self, BufReader, Read};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Versión usada cuando el request no se pudo parsear
const FALLBACK_VERSION: &str = "HTTP/1.1";

/// Tope de bytes descartados tras un 400
const DRAIN_LIMIT: u64 = 1024 * 1024;

/// Espera máxima por cada lectura mientras se descarta
const DRAIN_TIMEOUT: Duration = Duration::from_millis(250);

/// Errores que terminan el procesamiento de una conexión
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to configure connection: {0}")]
    Socket(#[source] io::Error),

    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),
}

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    config: Config,
    router: Arc<Router>,
    listener: Option<TcpListener>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        let files = FileHandler::new(config.directory.clone());
        let router = Router::with_default_routes(files);

        Self {
            config,
            router: Arc::new(router),
            listener: None,
        }
    }

    /// Abre el socket sin empezar a aceptar conexiones.
    ///
    /// Retorna la dirección real (útil con puerto 0).
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let address = self.config.address();
        let listener = TcpListener::bind(&address)?;
        let local = listener.local_addr()?;
        info!(%local, "server listening");
        self.listener = Some(listener);
        Ok(local)
    }

    /// Acepta conexiones para siempre. Hace `bind` si hace falta.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            self.bind()?;
        }
        let listener = match self.listener.as_ref() {
            Some(listener) => listener,
            None => return Err(io::Error::new(io::ErrorKind::NotConnected, "listener not bound")),
        };

        info!("concurrent mode: one thread per connection");
        let read_timeout = self.config.read_timeout();

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let router = Arc::clone(&self.router);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &router, read_timeout) {
                            error!(error = %e, "connection failed");
                        }
                    });
                }
                Err(e) => {
                    error!(error = %e, "failed to accept connection");
                }
            }
        }

        Ok(())
    }
}

/// Procesa una única petición y cierra la conexión
pub fn handle_connection(
    stream: TcpStream,
    router: &Router,
    read_timeout: Option<Duration>,
) -> Result<(), ServerError> {
    let start = Instant::now();
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    stream.set_read_timeout(read_timeout).map_err(ServerError::Socket)?;

    let mut reader = BufReader::new(&stream);
    let mut writer = &stream;

    let (response, version, rejected) = match Request::read_from(&mut reader) {
        Ok(request) => {
            debug!(%peer, method = %request.method(), path = request.path(), "request parsed");
            let response = router.route(&request);
            info!(
                %peer,
                method = %request.method(),
                path = request.path(),
                status = response.status().as_u16(),
                bytes = response.body().len(),
                "request served"
            );
            (response, request.version().to_string(), false)
        }
        Err(e) if e.is_transport() => {
            debug!(%peer, error = %e, "connection dropped before a request was read");
            return Ok(());
        }
        Err(e) => {
            warn!(%peer, error = %e, "rejecting malformed request");
            (
                Response::with_status(StatusCode::BadRequest),
                FALLBACK_VERSION.to_string(),
                true,
            )
        }
    };

    response.write_to(&version, &mut writer).map_err(ServerError::Write)?;

    if rejected {
        drain(&stream, &mut reader);
    }

    debug!(%peer, elapsed_ms = start.elapsed().as_secs_f64() * 1000.0, "connection closed");
    Ok(())
}

/// Cierra la mitad de escritura y descarta lo que el cliente siga mandando.
///
/// Cerrar con bytes sin leer hace que el kernel mande RST, y el cliente
/// puede perder el 400 que ya se escribió.
fn drain(stream: &TcpStream, reader: &mut BufReader<&TcpStream>) {
    if let Err(e) = stream.shutdown(Shutdown::Write) {
        debug!(error = %e, "shutdown before drain failed");
        return;
    }
    if stream.set_read_timeout(Some(DRAIN_TIMEOUT)).is_err() {
        return;
    }
    match io::copy(&mut reader.by_ref().take(DRAIN_LIMIT), &mut io::sink()) {
        Ok(bytes) => debug!(bytes, "drained rejected request"),
        Err(e) => debug!(error = %e, "drain stopped"),
    }
}
