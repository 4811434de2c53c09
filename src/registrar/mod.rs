//! Capability registrar.
//!
//! Makes sure that, once a native-facing structure is needed, its fields are
//! exposed to the image and the one native artifact for the target platform
//! is embedded:
//!
//! - **symbols**: the structure groups (core, and Windows-only)
//! - **resource**: artifact naming and lookup in the packaging
//! - **image**: the contract with the image being built
//!
//! # Flow
//!
//! ```text
//! Registrar::initialize()
//! └── Trigger::fire()           (one per applicable group)
//!     ├── expose_fields(group)  (every time, idempotent)
//!     └── first trigger only:
//!         resolve PlatformKey -> NativeResourceEntry
//!         open from ResourceSource -> embed_resource
//! ```

pub mod image;
pub mod resource;
pub mod symbols;

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tracing::{debug, info};

use crate::platform::PlatformKey;
pub use image::{ImageBuilder, ImageManifest};
pub use resource::{DirectorySource, MemorySource, NativeResourceEntry, ResourceLayout, ResourceSource};
pub use symbols::NativeSymbolGroup;

#[derive(Error, Debug)]
pub enum RegistrarError {
    #[error("Could not find resource {path}")]
    MissingArtifact { path: String },

    #[error("Failed to read resource {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RegistrarError>;

/// One-time native capability registration for a build
pub struct Registrar<S, B> {
    platform: Option<PlatformKey>,
    layout: ResourceLayout,
    source: S,
    builder: B,
    /// Set by the first trigger that fires
    resource_registered: AtomicBool,
}

impl<S: ResourceSource, B: ImageBuilder> Registrar<S, B> {
    pub fn new(platform: Option<PlatformKey>, layout: ResourceLayout, source: S, builder: B) -> Self {
        Self {
            platform,
            layout,
            source,
            builder,
            resource_registered: AtomicBool::new(false),
        }
    }

    /// Registrar for the current compilation target
    pub fn for_current_target(layout: ResourceLayout, source: S, builder: B) -> Self {
        Self::new(PlatformKey::current(), layout, source, builder)
    }

    pub fn platform(&self) -> Option<PlatformKey> {
        self.platform
    }

    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Whether the artifact registration has already happened
    pub fn is_registered(&self) -> bool {
        self.resource_registered.load(Ordering::Acquire)
    }

    /// Artifact entry for this build, `None` on unsupported platforms
    pub fn entry(&self) -> Option<NativeResourceEntry> {
        self.platform
            .map(|platform| NativeResourceEntry::resolve(platform, &self.layout))
    }

    /// One trigger per symbol group this build needs
    pub fn triggers(&self) -> Vec<Trigger<'_, S, B>> {
        let windows = self.platform.is_some_and(|p| p.is_windows());
        symbols::groups_for(windows)
            .map(|group| Trigger { registrar: self, group })
            .collect()
    }

    /// Fire every trigger in order.
    ///
    /// Call once before any native terminal call. Safe to call again.
    pub fn initialize(&self) -> Result<()> {
        for trigger in self.triggers() {
            trigger.fire()?;
        }
        Ok(())
    }

    fn on_reachable(&self, group: &NativeSymbolGroup) -> Result<()> {
        debug!("Exposing {} fields of {}", group.fields.len(), group.name);
        self.builder.expose_fields(group);

        if self
            .resource_registered
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            if let Err(e) = self.embed_artifact() {
                // Let the next trigger try again and report the failure too
                self.resource_registered.store(false, Ordering::Release);
                return Err(e);
            }
        }

        Ok(())
    }

    fn embed_artifact(&self) -> Result<()> {
        let Some(entry) = self.entry() else {
            info!("No native artifact for this platform");
            return Ok(());
        };

        let bytes = self
            .source
            .open(&entry.path)
            .map_err(|source| RegistrarError::Read {
                path: entry.path.clone(),
                source,
            })?
            .ok_or_else(|| RegistrarError::MissingArtifact {
                path: entry.path.clone(),
            })?;

        info!("Embedding {} ({} bytes) for {}", entry.path, bytes.len(), entry.platform);
        self.builder.embed_resource(&entry.path, bytes);
        Ok(())
    }
}

/// Deferred registration for one symbol group
pub struct Trigger<'a, S, B> {
    registrar: &'a Registrar<S, B>,
    group: &'static NativeSymbolGroup,
}

impl<S: ResourceSource, B: ImageBuilder> Trigger<'_, S, B> {
    pub fn group(&self) -> &'static NativeSymbolGroup {
        self.group
    }

    /// Run the registration for this group, fired when its native
    /// initializer becomes reachable
    pub fn fire(&self) -> Result<()> {
        self.registrar.on_reachable(self.group)
    }
}
