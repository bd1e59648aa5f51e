//! # Construcción de Respuestas HTTP
//!
//! `Response` es un acumulador mutable: se crea con los valores por defecto,
//! un único handler lo modifica y al final se serializa una sola vez.
//!
//! ## Formato en el cable
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/plain\r\n
//! Content-Length: 3\r\n
//! \r\n
//! abc
//! ```
//!
//! `Content-Length` nunca se guarda en los headers: se calcula del body al
//! serializar.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use codecrafters_http::http::{Response, StatusCode};
//!
//! let mut response = Response::new();
//! response.set_status(StatusCode::Created);
//!
//! let bytes = response.to_bytes("HTTP/1.1");
//! assert!(bytes.starts_with(b"HTTP/1.1 201 Created\r\n"));
//! ```

use super::{Headers, StatusCode};
use std::io::{self, Write};

/// Content-Type con el que nace toda respuesta
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Representa una respuesta HTTP
#[derive(Debug, Clone)]
pub struct Response {
    /// Código de estado HTTP (200 por defecto)
    status: StatusCode,

    /// Headers (sembrados con `Content-Type: text/plain`)
    headers: Headers,

    /// Cuerpo de la respuesta (puede ser vacío)
    body: Vec<u8>,
}

impl Response {
    /// Respuesta por defecto: 200, `Content-Type: text/plain`, body vacío
    pub fn new() -> Self {
        let mut headers = Headers::new();
        headers.set("Content-Type", DEFAULT_CONTENT_TYPE);
        Self {
            status: StatusCode::Ok,
            headers,
            body: Vec::new(),
        }
    }

    /// Respuesta por defecto con otro código de estado
    pub fn with_status(status: StatusCode) -> Self {
        let mut response = Self::new();
        response.status = status;
        response
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Agrega o reemplaza un header.
    ///
    /// `Content-Length` se ignora al serializar.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.set(name, value);
    }

    pub fn set_body(&mut self, body: impl Into<Vec<u8>>) {
        self.body = body.into();
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Convierte la respuesta a bytes listos para enviar por el socket
    ///
    /// Genera:
    /// - Status line: `<version> 200 OK\r\n`
    /// - Headers: `Header-Name: Value\r\n` (solo el primer valor)
    /// - `Content-Length` calculado del body
    /// - Línea vacía: `\r\n`
    /// - Body: contenido binario
    pub fn to_bytes(&self, version: &str) -> Vec<u8> {
        let mut result = Vec::with_capacity(128 + self.body.len());

        // 1. Status line
        let status_line = format!("{} {}\r\n", version, self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers
        for (name, value) in self.headers.iter() {
            if name.eq_ignore_ascii_case("Content-Length") {
                continue;
            }
            result.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }

        // 3. Content-Length siempre presente
        result.extend_from_slice(format!("Content-Length: {}\r\n", self.body.len()).as_bytes());

        // 4. Línea vacía + body
        result.extend_from_slice(b"\r\n");
        result.extend_from_slice(&self.body);

        result
    }

    /// Serializa y escribe toda la respuesta en una sola operación
    pub fn write_to<W: Write>(&self, version: &str, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.to_bytes(version))?;
        writer.flush()
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_text(response: &Response) -> String {
        String::from_utf8(response.to_bytes("HTTP/1.1")).unwrap()
    }

    #[test]
    fn test_new_response_defaults() {
        let response = Response::new();
        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert!(response.body().is_empty());
    }

    #[test]
    fn test_default_wire_format() {
        let text = as_text(&Response::new());
        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_content_length_matches_body() {
        let mut response = Response::new();
        response.set_body("Hello World");

        let text = as_text(&response);
        assert!(text.contains("Content-Length: 11\r\n"));
        assert!(text.ends_with("\r\n\r\nHello World"));
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let mut response = Response::new();
        response.set_body("ñandú");

        let text = as_text(&response);
        assert!(text.contains("Content-Length: 7\r\n"));
    }

    #[test]
    fn test_handler_content_length_is_ignored() {
        let mut response = Response::new();
        response.set_header("Content-Length", "999");
        response.set_body("abc");

        let text = as_text(&response);
        assert_eq!(text.matches("Content-Length").count(), 1);
        assert!(text.contains("Content-Length: 3\r\n"));
    }

    #[test]
    fn test_status_line_uses_request_version() {
        let response = Response::with_status(StatusCode::NotFound);
        let bytes = response.to_bytes("HTTP/1.0");
        assert!(bytes.starts_with(b"HTTP/1.0 404 Not Found\r\n"));
    }

    #[test]
    fn test_unknown_status_reason() {
        let response = Response::with_status(StatusCode::Other(302));
        let text = as_text(&response);
        assert!(text.starts_with("HTTP/1.1 302 Unknown\r\n"));
    }

    #[test]
    fn test_only_first_header_value_is_sent() {
        let mut response = Response::new();
        response.headers.append("X-Multi", "one");
        response.headers.append("X-Multi", "two");

        let text = as_text(&response);
        assert!(text.contains("X-Multi: one\r\n"));
        assert!(!text.contains("two"));
    }

    #[test]
    fn test_binary_body() {
        let binary_data = vec![0x00, 0x01, 0x02, 0xFF];
        let mut response = Response::new();
        response.set_body(binary_data.clone());

        let bytes = response.to_bytes("HTTP/1.1");
        assert!(bytes.ends_with(&binary_data));
    }

    #[test]
    fn test_write_to() {
        let mut response = Response::new();
        response.set_body("ok");

        let mut out = Vec::new();
        response.write_to("HTTP/1.1", &mut out).unwrap();
        assert_eq!(out, response.to_bytes("HTTP/1.1"));
    }
}
