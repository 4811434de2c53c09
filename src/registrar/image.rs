//! The image being built.
//!
//! [`ImageBuilder`] is the narrow contract the registrar needs from whatever
//! produces the final distributable: keep a structure's fields addressable,
//! and embed a resource under a logical path.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};

use super::symbols::NativeSymbolGroup;

pub trait ImageBuilder {
    /// Keep every field of `group` available for native access.
    /// Must be idempotent.
    fn expose_fields(&self, group: &NativeSymbolGroup);

    /// Embed `bytes` so they can be retrieved at runtime under `path`
    fn embed_resource(&self, path: &str, bytes: Vec<u8>);
}

impl<T: ImageBuilder + ?Sized> ImageBuilder for Arc<T> {
    fn expose_fields(&self, group: &NativeSymbolGroup) {
        (**self).expose_fields(group)
    }

    fn embed_resource(&self, path: &str, bytes: Vec<u8>) {
        (**self).embed_resource(path, bytes)
    }
}

/// In-memory image: exposed structures and embedded resources
#[derive(Debug, Default)]
pub struct ImageManifest {
    exposed: Mutex<BTreeMap<&'static str, BTreeSet<&'static str>>>,
    resources: Mutex<BTreeMap<String, Arc<[u8]>>>,
}

impl ImageManifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Structure names with exposed fields
    pub fn exposed_groups(&self) -> Vec<&'static str> {
        match self.exposed.lock() {
            Ok(exposed) => exposed.keys().copied().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Whether `field` of structure `group` is exposed
    pub fn is_exposed(&self, group: &str, field: &str) -> bool {
        self.exposed
            .lock()
            .map(|exposed| exposed.get(group).is_some_and(|f| f.contains(field)))
            .unwrap_or(false)
    }

    /// Embedded resource at `path`
    pub fn resource(&self, path: &str) -> Option<Arc<[u8]>> {
        self.resources.lock().ok()?.get(path).cloned()
    }

    /// Paths of all embedded resources
    pub fn resource_paths(&self) -> Vec<String> {
        match self.resources.lock() {
            Ok(resources) => resources.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Write every embedded resource below `dir`, keeping its logical path
    pub fn write_to(&self, dir: &Path) -> io::Result<usize> {
        let resources = self
            .resources
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "resource table poisoned"))?;

        for (path, bytes) in resources.iter() {
            let target = path.split('/').fold(dir.to_path_buf(), |p, part| p.join(part));
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, bytes)?;
        }

        Ok(resources.len())
    }
}

impl ImageBuilder for ImageManifest {
    fn expose_fields(&self, group: &NativeSymbolGroup) {
        if let Ok(mut exposed) = self.exposed.lock() {
            exposed
                .entry(group.name)
                .or_default()
                .extend(group.fields.iter().copied());
        }
    }

    fn embed_resource(&self, path: &str, bytes: Vec<u8>) {
        if let Ok(mut resources) = self.resources.lock() {
            resources.insert(path.to_string(), Arc::from(bytes));
        }
    }
}
