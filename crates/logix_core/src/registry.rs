//! Per-type registries of named engine objects.
//!
//! A registry maps `Identifier`s to objects of one domain type (textures,
//! shaders, ...) and refuses duplicate keys. The engine context owns one
//! registry per type; nothing is ever removed, GPU teardown goes through the
//! resource tracker instead.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::identifier::Identifier;
use crate::logger::Logger;

/// Something that can be stored in a `Registry`.
pub trait Identifiable {
    /// Display name of the registry holding this type ("Texture", "Shader").
    const KIND: &'static str;

    fn identifier(&self) -> &Identifier;
}

#[derive(Debug)]
pub struct Registry<T> {
    index: HashMap<Identifier, usize>,
    /// Entries in registration order.
    entries: Vec<T>,
}

impl<T: Identifiable> Registry<T> {
    pub fn new(log: &Logger) -> Self {
        log.debug(format!("Created a {} registry", T::KIND));
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, log: &Logger, item: T) -> Result<&T, EngineError> {
        let id = item.identifier().clone();
        if self.index.contains_key(&id) {
            return Err(EngineError::DuplicateIdentifier {
                id: id.into_string(),
                registry: T::KIND,
            });
        }
        log.debug(format!(
            "Registered {kind} '{id}' to the {kind} registry",
            kind = T::KIND
        ));
        let slot = self.entries.len();
        self.entries.push(item);
        self.index.insert(id, slot);
        Ok(&self.entries[slot])
    }

    /// Required lookup: a missing entry is an error.
    pub fn find(&self, id: &Identifier) -> Result<&T, EngineError> {
        self.try_find(id)
            .ok_or_else(|| EngineError::RegistryEntryNotFound {
                id: id.to_string(),
                registry: T::KIND,
            })
    }

    /// Soft lookup.
    pub fn try_find(&self, id: &Identifier) -> Option<&T> {
        self.index.get(id).map(|&slot| &self.entries[slot])
    }

    pub fn contains(&self, id: &Identifier) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}
