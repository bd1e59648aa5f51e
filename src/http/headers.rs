//! # Headers HTTP
//! src/http/headers.rs
//!
//! Mapa de headers insensible a mayúsculas que admite múltiples valores
//! por nombre. Lo usan tanto `Request` como `Response`.
//!
//! ```
//! use codecrafters_http::http::Headers;
//!
//! let mut headers = Headers::new();
//! headers.append("Accept", "text/plain");
//! headers.append("accept", "application/json");
//!
//! assert_eq!(headers.get("ACCEPT"), Some("text/plain"));
//! assert_eq!(headers.get_all("Accept"), ["text/plain", "application/json"]);
//! ```

use std::collections::HashMap;

/// Un header con el nombre tal como llegó la primera vez y todos sus valores
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    name: String,
    values: Vec<String>,
}

/// Headers HTTP (clave normalizada a minúsculas → valores en orden de llegada)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: HashMap<String, Entry>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Agrega un valor, conservando los que ya existían para ese nombre
    pub fn append(&mut self, name: &str, value: &str) {
        self.entries
            .entry(name.to_ascii_lowercase())
            .or_insert_with(|| Entry {
                name: name.to_string(),
                values: Vec::new(),
            })
            .values
            .push(value.to_string());
    }

    /// Reemplaza todos los valores de `name` por `value`
    pub fn set(&mut self, name: &str, value: &str) {
        let key = name.to_ascii_lowercase();
        match self.entries.get_mut(&key) {
            Some(entry) => {
                entry.values.clear();
                entry.values.push(value.to_string());
            }
            None => {
                self.entries.insert(
                    key,
                    Entry {
                        name: name.to_string(),
                        values: vec![value.to_string()],
                    },
                );
            }
        }
    }

    /// Primer valor de un header
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .and_then(|entry| entry.values.first())
            .map(|s| s.as_str())
    }

    /// Todos los valores de un header, en el orden en que se agregaron
    pub fn get_all(&self, name: &str) -> &[String] {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|entry| entry.values.as_slice())
            .unwrap_or(&[])
    }

    /// Concatena texto al último valor agregado para `name`.
    ///
    /// Se usa para las líneas de continuación (obs-fold) del parser.
    pub(crate) fn extend_last(&mut self, name: &str, more: &str) -> bool {
        let Some(entry) = self.entries.get_mut(&name.to_ascii_lowercase()) else {
            return false;
        };
        match entry.values.last_mut() {
            Some(last) => {
                if !last.is_empty() && !more.is_empty() {
                    last.push(' ');
                }
                last.push_str(more);
                true
            }
            None => false,
        }
    }

    /// Número de nombres distintos
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Itera `(nombre, primer valor)` sin orden definido
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.values().filter_map(|entry| {
            entry
                .values
                .first()
                .map(|value| (entry.name.as_str(), value.as_str()))
        })
    }
}
