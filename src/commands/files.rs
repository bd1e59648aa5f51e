//! # Archivos estáticos
//! src/commands/files.rs
//!
//! Lectura y escritura de archivos bajo el directorio configurado con
//! `--directory`:
//! - `GET /files/<name>`: devuelve el contenido como `application/octet-stream`
//! - cualquier otro método sobre `/files/<name>`: escribe el body del request
//!
//! Solo se pueden nombrar archivos dentro de la raíz. Los nombres con `..`,
//! absolutos o que salen de la raíz a través de un symlink se rechazan
//! con 404, igual que si no hubiera raíz configurada.

use crate::http::{Response, StatusCode};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Content-Type de los archivos servidos
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Errores del acceso a archivos
#[derive(Debug, Error)]
pub enum FileError {
    /// El servidor arrancó sin `--directory`
    #[error("no files directory configured")]
    NoRoot,

    /// El nombre pide algo fuera de la raíz
    #[error("path not allowed: {0}")]
    OutsideRoot(String),

    /// Falla del sistema de archivos
    #[error("{}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl FileError {
    fn io(path: &Path, source: io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Acceso a archivos restringido a un directorio raíz
#[derive(Debug, Clone, Default)]
pub struct FileHandler {
    root: Option<PathBuf>,
}

impl FileHandler {
    /// `None` deja todas las rutas `/files/*` en 404
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Handler GET: 200 con el contenido o 404 sin body
    pub fn serve(&self, name: &str, response: &mut Response) {
        match self.read(name) {
            Ok(contents) => {
                debug!(file = name, bytes = contents.len(), "serving file");
                response.set_header("Content-Type", OCTET_STREAM);
                response.set_body(contents);
            }
            Err(e) => {
                debug!(file = name, error = %e, "file not served");
                response.set_status(StatusCode::NotFound);
            }
        }
    }

    /// Handler de escritura: 201 si se escribió, 500 con el error como body
    pub fn store(&self, name: &str, contents: &[u8], response: &mut Response) {
        match self.write(name, contents) {
            Ok(()) => {
                debug!(file = name, bytes = contents.len(), "file written");
                response.set_status(StatusCode::Created);
            }
            Err(e @ (FileError::NoRoot | FileError::OutsideRoot(_))) => {
                debug!(file = name, error = %e, "write refused");
                response.set_status(StatusCode::NotFound);
            }
            Err(e) => {
                warn!(file = name, error = %e, "write failed");
                response.set_status(StatusCode::InternalServerError);
                response.set_body(e.to_string());
            }
        }
    }

    /// Lee un archivo completo
    pub fn read(&self, name: &str) -> Result<Vec<u8>, FileError> {
        let path = self.resolve_existing(name)?;
        fs::read(&path).map_err(|e| FileError::io(&path, e))
    }

    /// Crea o trunca un archivo con permisos 0644
    pub fn write(&self, name: &str, contents: &[u8]) -> Result<(), FileError> {
        let path = self.resolve_for_write(name)?;

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o644);
        }

        let mut file = options.open(&path).map_err(|e| FileError::io(&path, e))?;
        file.write_all(contents).map_err(|e| FileError::io(&path, e))
    }

    /// Raíz canonicalizada
    fn root_dir(&self) -> Result<PathBuf, FileError> {
        let root = self.root.as_ref().ok_or(FileError::NoRoot)?;
        root.canonicalize().map_err(|e| FileError::io(root, e))
    }

    /// Resuelve un archivo que ya existe. Sigue symlinks y exige que el
    /// destino final quede dentro de la raíz.
    pub fn resolve_existing(&self, name: &str) -> Result<PathBuf, FileError> {
        let root = self.root_dir()?;
        let joined = root.join(relative_name(name)?);
        let resolved = joined.canonicalize().map_err(|e| FileError::io(&joined, e))?;
        ensure_within(&root, &resolved, name)?;
        Ok(resolved)
    }

    /// Resuelve el destino de una escritura. El archivo puede no existir,
    /// pero su directorio sí, y ambos deben quedar dentro de la raíz.
    pub fn resolve_for_write(&self, name: &str) -> Result<PathBuf, FileError> {
        let root = self.root_dir()?;
        let joined = root.join(relative_name(name)?);

        let (parent, file_name) = match (joined.parent(), joined.file_name()) {
            (Some(parent), Some(file_name)) => (parent, file_name),
            _ => return Err(FileError::OutsideRoot(name.to_string())),
        };
        let parent = parent.canonicalize().map_err(|e| FileError::io(parent, e))?;
        ensure_within(&root, &parent, name)?;

        let target = parent.join(file_name);
        let is_symlink = fs::symlink_metadata(&target)
            .map(|meta| meta.file_type().is_symlink())
            .unwrap_or(false);
        if is_symlink {
            let resolved = target
                .canonicalize()
                .map_err(|_| FileError::OutsideRoot(name.to_string()))?;
            ensure_within(&root, &resolved, name)?;
        }

        Ok(target)
    }
}

/// Convierte el resto del path en una ruta relativa sin `..` ni raíces
fn relative_name(name: &str) -> Result<PathBuf, FileError> {
    let mut relative = PathBuf::new();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                warn!(file = name, "rejected file name outside the files directory");
                return Err(FileError::OutsideRoot(name.to_string()));
            }
        }
    }

    if relative.as_os_str().is_empty() {
        return Err(FileError::OutsideRoot(name.to_string()));
    }
    Ok(relative)
}

fn ensure_within(root: &Path, resolved: &Path, name: &str) -> Result<(), FileError> {
    if resolved.starts_with(root) {
        Ok(())
    } else {
        warn!(file = name, resolved = %resolved.display(), "resolved path leaves the files directory");
        Err(FileError::OutsideRoot(name.to_string()))
    }
}
