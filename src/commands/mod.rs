//! # Comandos del Servidor
//!
//! Handlers que el router invoca. Cada handler recibe el contexto de la
//! ruta (request, parte capturada del path y acceso a archivos) y modifica
//! la `Response` por defecto.
//!
//! - **basic**: `/`, `/user-agent`, `/echo/<texto>`
//! - **files**: `/files/<nombre>` (lectura y escritura bajo `--directory`)

pub mod basic;
pub mod files;

pub use basic::*;
pub use files::{FileError, FileHandler};

use crate::http::{Method, Response, StatusCode};
use crate::router::RouteContext;

/// Handler para `/files/<nombre>`
///
/// GET lee; cualquier otro método (HEAD incluido) escribe el body.
pub fn files_handler(ctx: &RouteContext<'_>, response: &mut Response) {
    if ctx.capture.is_empty() {
        response.set_status(StatusCode::NotFound);
        return;
    }

    if *ctx.request.method() == Method::GET {
        ctx.files.serve(ctx.capture, response);
    } else {
        ctx.files.store(ctx.capture, ctx.request.body(), response);
    }
}
