//! # Comandos Básicos
//! src/commands/basic.rs
//!
//! - `/`: sonda, deja la respuesta por defecto
//! - `/user-agent`: devuelve el header `User-Agent`
//! - `/echo/<texto>`: devuelve `<texto>` tal cual

use crate::http::Response;
use crate::router::RouteContext;

/// Handler para `/`
///
/// No toca nada: 200, `text/plain`, body vacío.
pub fn root_handler(_ctx: &RouteContext<'_>, _response: &mut Response) {}

/// Handler para `/user-agent`
///
/// Body vacío si el cliente no mandó el header.
pub fn user_agent_handler(ctx: &RouteContext<'_>, response: &mut Response) {
    let agent = ctx.request.header("User-Agent").unwrap_or("");
    response.set_body(agent);
}

/// Handler para `/echo/<texto>`
///
/// El texto se devuelve byte a byte, sin decodificar ni transformar, sin
/// importar lo que pida `Accept-Encoding`.
pub fn echo_handler(ctx: &RouteContext<'_>, response: &mut Response) {
    response.set_body(ctx.capture);
}
