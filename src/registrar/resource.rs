//! Native artifact naming and lookup.
//!
//! Artifacts live under `{namespace}/{family}/{arch}/{file}`. The same path is
//! used to find the artifact in the packaging and to retrieve it from the
//! built image.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::platform::{OsFamily, PlatformKey};

/// Naming parameters for native artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLayout {
    /// Fixed prefix shared by all artifacts
    pub namespace: String,
    /// Library base name, without `lib` prefix or extension
    pub library: String,
}

impl Default for ResourceLayout {
    fn default() -> Self {
        Self {
            namespace: "nativeterm/native".to_string(),
            library: "nativeterm".to_string(),
        }
    }
}

impl ResourceLayout {
    /// Artifact file name for an OS family
    pub fn file_name(&self, os: OsFamily) -> String {
        match os {
            OsFamily::Windows => format!("{}.dll", self.library),
            OsFamily::Linux => format!("lib{}.so", self.library),
            OsFamily::Mac => format!("lib{}.jnilib", self.library),
        }
    }
}

/// The artifact bundled for one platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeResourceEntry {
    pub platform: PlatformKey,
    /// Logical path, identical at build time and at runtime
    pub path: String,
}

impl NativeResourceEntry {
    pub fn resolve(platform: PlatformKey, layout: &ResourceLayout) -> Self {
        let path = format!(
            "{}/{}/{}/{}",
            layout.namespace.trim_end_matches('/'),
            platform.os.dir_name(),
            platform.arch.dir_name(),
            layout.file_name(platform.os),
        );
        Self { platform, path }
    }
}

/// Where artifact bytes come from at build time
pub trait ResourceSource {
    /// Read the resource at `path`, `Ok(None)` if it does not exist
    fn open(&self, path: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Artifacts laid out on disk under a root directory
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ResourceSource for DirectorySource {
    fn open(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        let full = path.split('/').fold(self.root.clone(), |p, part| p.join(part));
        match fs::read(&full) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Artifacts held in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(path, bytes);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), bytes.into());
    }
}

impl ResourceSource for MemorySource {
    fn open(&self, path: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.entries.get(path).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Arch;

    #[test]
    fn test_resolve_every_platform() {
        let layout = ResourceLayout::default();
        let expected = [
            "nativeterm/native/Windows/x86_64/nativeterm.dll",
            "nativeterm/native/Windows/arm64/nativeterm.dll",
            "nativeterm/native/Linux/x86_64/libnativeterm.so",
            "nativeterm/native/Linux/arm64/libnativeterm.so",
            "nativeterm/native/Mac/x86_64/libnativeterm.jnilib",
            "nativeterm/native/Mac/arm64/libnativeterm.jnilib",
        ];

        for (platform, path) in PlatformKey::ALL.iter().zip(expected) {
            let entry = NativeResourceEntry::resolve(*platform, &layout);
            assert_eq!(entry.platform, *platform);
            assert_eq!(entry.path, path);
        }
    }

    #[test]
    fn test_custom_layout() {
        let layout = ResourceLayout {
            namespace: "org/example/".to_string(),
            library: "termnative".to_string(),
        };
        let entry = NativeResourceEntry::resolve(
            PlatformKey::new(OsFamily::Linux, Arch::Arm64),
            &layout,
        );
        assert_eq!(entry.path, "org/example/Linux/arm64/libtermnative.so");
    }

    #[test]
    fn test_directory_source() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("ns").join("Linux").join("x86_64");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("libx.so"), b"ELF").unwrap();

        let source = DirectorySource::new(dir.path());
        assert_eq!(
            source.open("ns/Linux/x86_64/libx.so").unwrap(),
            Some(b"ELF".to_vec())
        );
        assert_eq!(source.open("ns/Linux/arm64/libx.so").unwrap(), None);
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with("a/b.dll", vec![1, 2, 3]);
        assert_eq!(source.open("a/b.dll").unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(source.open("a/c.dll").unwrap(), None);
    }
}
