//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Parser incremental que lee directamente del socket (cualquier `BufRead`).
//!
//! ## Formato de un Request
//!
//! ```text
//! POST /files/notes.txt HTTP/1.1\r\n
//! Host: localhost:4221\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hello
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path VERSION`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: exactamente `Content-Length` bytes, solo si el método no es GET/HEAD

use super::Headers;
use std::io::{self, BufRead, Read};
use thiserror::Error;

/// Largo máximo de la request line o de un header, terminador incluido
pub const MAX_LINE_LENGTH: usize = 8 * 1024;

/// Métodos HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    /// Cualquier otro token (se trata como escritura en `/files/`)
    Other(String),
}

impl Method {
    /// Parsea un método HTTP desde un token. Nunca falla.
    pub fn from_token(s: &str) -> Self {
        match s {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            "OPTIONS" => Method::OPTIONS,
            other => Method::Other(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::PATCH => "PATCH",
            Method::OPTIONS => "OPTIONS",
            Method::Other(token) => token,
        }
    }

    /// GET y HEAD nunca llevan body
    pub fn has_body(&self) -> bool {
        !matches!(self, Method::GET | Method::HEAD)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Error)]
pub enum ParseError {
    /// Falla de I/O leyendo la conexión
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// El cliente cerró sin enviar nada
    #[error("empty request")]
    EmptyRequest,

    /// La request line no tiene exactamente tres tokens
    #[error("malformed request line: {0:?}")]
    MalformedRequestLine(String),

    /// Header malformado
    #[error("invalid header: {0:?}")]
    InvalidHeader(String),

    /// La conexión terminó antes de la línea vacía
    #[error("connection closed before end of headers")]
    IncompleteHeaders,

    /// Método con body sin `Content-Length`
    #[error("missing Content-Length header")]
    MissingLength,

    /// `Content-Length` no es un entero no negativo
    #[error("invalid Content-Length: {0:?}")]
    InvalidLength(String),

    /// Llegaron menos bytes que los declarados
    #[error("truncated body: expected {expected} bytes, received {received}")]
    TruncatedBody { expected: usize, received: usize },
}

impl ParseError {
    /// Errores tras los cuales no tiene sentido responder al cliente
    pub fn is_transport(&self) -> bool {
        matches!(self, ParseError::Transport(_) | ParseError::EmptyRequest)
    }
}

/// Representa un request HTTP parseado
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP
    method: Method,

    /// Path tal cual llegó (sin decodificar, con query string incluida)
    path: String,

    /// Versión HTTP, se repite en la status line de la respuesta
    version: String,

    /// Headers HTTP
    headers: Headers,

    /// Body, solo si el método admite body
    body: Option<Vec<u8>>,
}

impl Request {
    /// Lee un request completo desde `reader`
    ///
    /// No lee más allá del body declarado.
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use codecrafters_http::http::Request;
    /// use std::io::BufReader;
    ///
    /// let raw: &[u8] = b"GET /echo/abc HTTP/1.1\r\nUser-Agent: test\r\n\r\n";
    /// let request = Request::read_from(&mut BufReader::new(raw)).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/abc");
    /// assert_eq!(request.header("user-agent"), Some("test"));
    /// ```
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, ParseError> {
        // 1. Request line
        let line = match read_line(reader, ParseError::MalformedRequestLine)? {
            Some(line) => line,
            None => return Err(ParseError::EmptyRequest),
        };
        let (method, path, version) = Self::parse_request_line(&line)?;

        // 2. Headers
        let headers = Self::read_headers(reader)?;

        // 3. Body
        let body = if method.has_body() {
            Some(Self::read_body(reader, &headers)?)
        } else {
            None
        };

        Ok(Request {
            method,
            path,
            version,
            headers,
            body,
        })
    }

    /// Parsea un request desde un buffer en memoria
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use codecrafters_http::http::{Method, Request};
    ///
    /// let request = Request::parse(b"POST /files/a HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi").unwrap();
    /// assert_eq!(request.method(), &Method::POST);
    /// assert_eq!(request.body(), b"hi");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        let mut reader = buffer;
        Self::read_from(&mut reader)
    }

    /// Formato: `GET /path HTTP/1.1`, separado por espacios simples
    fn parse_request_line(line: &[u8]) -> Result<(Method, String, String), ParseError> {
        let text = std::str::from_utf8(line)
            .map_err(|_| ParseError::MalformedRequestLine(String::from_utf8_lossy(line).into_owned()))?;

        let parts: Vec<&str> = text.split(' ').collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return Err(ParseError::MalformedRequestLine(text.to_string()));
        }

        Ok((
            Method::from_token(parts[0]),
            parts[1].to_string(),
            parts[2].to_string(),
        ))
    }

    /// Lee headers hasta la línea vacía
    fn read_headers<R: BufRead>(reader: &mut R) -> Result<Headers, ParseError> {
        let mut headers = Headers::new();
        let mut last_name: Option<String> = None;

        loop {
            let line = read_line(reader, ParseError::InvalidHeader)?
                .ok_or(ParseError::IncompleteHeaders)?;
            if line.is_empty() {
                break;
            }

            let text = std::str::from_utf8(&line)
                .map_err(|_| ParseError::InvalidHeader(String::from_utf8_lossy(&line).into_owned()))?;

            // Continuación (obs-fold): se pega al último valor
            if text.starts_with([' ', '\t']) {
                let folded = last_name
                    .as_deref()
                    .map(|name| headers.extend_last(name, text.trim_matches([' ', '\t'])))
                    .unwrap_or(false);
                if !folded {
                    return Err(ParseError::InvalidHeader(text.to_string()));
                }
                continue;
            }

            let (name, value) = text
                .split_once(':')
                .ok_or_else(|| ParseError::InvalidHeader(text.to_string()))?;
            if name.is_empty() || name.contains([' ', '\t']) {
                return Err(ParseError::InvalidHeader(text.to_string()));
            }

            headers.append(name, value.trim_matches([' ', '\t']));
            last_name = Some(name.to_string());
        }

        Ok(headers)
    }

    /// Lee exactamente `Content-Length` bytes
    fn read_body<R: BufRead>(reader: &mut R, headers: &Headers) -> Result<Vec<u8>, ParseError> {
        let raw = headers.get("Content-Length").ok_or(ParseError::MissingLength)?;
        let expected: usize = raw
            .parse()
            .map_err(|_| ParseError::InvalidLength(raw.to_string()))?;

        let mut body = Vec::new();
        reader.by_ref().take(expected as u64).read_to_end(&mut body)?;

        if body.len() < expected {
            return Err(ParseError::TruncatedBody {
                expected,
                received: body.len(),
            });
        }

        Ok(body)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Primer valor de un header (insensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Body del request (vacío si no hubo)
    pub fn body(&self) -> &[u8] {
        self.body.as_deref().unwrap_or(&[])
    }

    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

/// Lee una línea terminada en `\n` y quita el `\r\n` (o `\n`) final.
///
/// `None` si la conexión terminó sin bytes; una línea sin terminador al
/// final del stream se considera incompleta. Nunca lee más de
/// `MAX_LINE_LENGTH` bytes: si no aparece el `\n` antes, el error lo arma
/// `too_long` con el comienzo de la línea.
fn read_line<R: BufRead>(
    reader: &mut R,
    too_long: fn(String) -> ParseError,
) -> Result<Option<Vec<u8>>, ParseError> {
    let mut line = Vec::new();
    let n = reader
        .by_ref()
        .take(MAX_LINE_LENGTH as u64)
        .read_until(b'\n', &mut line)?;
    if n == 0 {
        return Ok(None);
    }
    if line.last() != Some(&b'\n') {
        if n == MAX_LINE_LENGTH {
            let head = String::from_utf8_lossy(&line[..64]);
            return Err(too_long(format!("{}... (over {} bytes)", head, MAX_LINE_LENGTH)));
        }
        return Err(ParseError::Transport(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed mid-line",
        )));
    }
    line.pop();
    if line.last() == Some(&b'\r') {
        line.pop();
    }
    Ok(Some(line))
}
