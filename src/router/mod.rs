//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Lista ordenada de rutas `(patrón, handler)`. Se evalúan de arriba hacia
//! abajo y gana la primera que coincide; el orden es la prioridad.
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! | prioridad | patrón             | handler              |
//! |-----------|--------------------|----------------------|
//! | 1         | `/` exacto         | `root_handler`       |
//! | 2         | prefijo `/files/`  | `files_handler`      |
//! | 3         | `/user-agent`      | `user_agent_handler` |
//! | 4         | prefijo `/echo/`   | `echo_handler`       |
//!
//! Sin coincidencia → 404 con body vacío.

use crate::commands::{self, FileHandler};
use crate::http::{Request, Response, StatusCode};

/// Datos que recibe cada handler
pub struct RouteContext<'a> {
    pub request: &'a Request,
    /// Lo que queda del path después del prefijo (vacío en rutas exactas)
    pub capture: &'a str,
    pub files: &'a FileHandler,
}

/// Tipo de función handler
///
/// Recibe el contexto y modifica la respuesta por defecto.
pub type Handler = fn(&RouteContext<'_>, &mut Response);

/// Cómo se compara el path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// El path debe ser exactamente este
    Exact(&'static str),
    /// El path empieza con este prefijo; el resto es la captura
    Prefix(&'static str),
}

impl Pattern {
    /// Retorna la captura si el path coincide
    ///
    /// # Ejemplo
    /// ```
    /// use codecrafters_http::router::Pattern;
    ///
    /// assert_eq!(Pattern::Prefix("/echo/").matches("/echo/a/b"), Some("a/b"));
    /// assert_eq!(Pattern::Exact("/").matches("/"), Some(""));
    /// assert_eq!(Pattern::Exact("/").matches("/x"), None);
    /// ```
    pub fn matches<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self {
            Pattern::Exact(expected) => (path == *expected).then_some(""),
            Pattern::Prefix(prefix) => path.strip_prefix(*prefix),
        }
    }
}

/// Router que mapea paths a handlers
pub struct Router {
    routes: Vec<(Pattern, Handler)>,
    files: FileHandler,
}

impl Router {
    /// Crea un router vacío
    pub fn new(files: FileHandler) -> Self {
        Self {
            routes: Vec::new(),
            files,
        }
    }

    /// Router con las cuatro rutas del servidor, en orden de prioridad
    pub fn with_default_routes(files: FileHandler) -> Self {
        let mut router = Self::new(files);
        router.register(Pattern::Exact("/"), commands::root_handler);
        router.register(Pattern::Prefix("/files/"), commands::files_handler);
        router.register(Pattern::Exact("/user-agent"), commands::user_agent_handler);
        router.register(Pattern::Prefix("/echo/"), commands::echo_handler);
        router
    }

    /// Registra una ruta al final de la lista (menor prioridad)
    pub fn register(&mut self, pattern: Pattern, handler: Handler) {
        self.routes.push((pattern, handler));
    }

    /// Patrones registrados, en orden de evaluación
    pub fn routes(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.routes.iter().map(|(pattern, _)| *pattern)
    }

    /// Ejecuta exactamente un handler sobre una respuesta nueva
    pub fn route(&self, request: &Request) -> Response {
        let mut response = Response::new();

        for (pattern, handler) in &self.routes {
            if let Some(capture) = pattern.matches(request.path()) {
                let ctx = RouteContext {
                    request,
                    capture,
                    files: &self.files,
                };
                handler(&ctx, &mut response);
                return response;
            }
        }

        response.set_status(StatusCode::NotFound);
        response
    }
}
