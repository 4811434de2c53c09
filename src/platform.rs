//! Target platform identification.
//!
//! A [`PlatformKey`] names the (OS family, CPU architecture) pair a binary is
//! built for. It picks both the native artifact to bundle and whether the
//! Windows-only console bindings apply.

use std::fmt;

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OsFamily {
    Windows,
    Linux,
    Mac,
}

impl OsFamily {
    /// Directory name used in resource paths
    pub fn dir_name(self) -> &'static str {
        match self {
            OsFamily::Windows => "Windows",
            OsFamily::Linux => "Linux",
            OsFamily::Mac => "Mac",
        }
    }
}

/// CPU architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Arch {
    X86_64,
    Arm64,
}

impl Arch {
    /// Directory name used in resource paths
    pub fn dir_name(self) -> &'static str {
        match self {
            Arch::X86_64 => "x86_64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// An (OS family, architecture) pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlatformKey {
    pub os: OsFamily,
    pub arch: Arch,
}

impl PlatformKey {
    /// Every supported platform, in resolution order
    pub const ALL: [PlatformKey; 6] = [
        PlatformKey::new(OsFamily::Windows, Arch::X86_64),
        PlatformKey::new(OsFamily::Windows, Arch::Arm64),
        PlatformKey::new(OsFamily::Linux, Arch::X86_64),
        PlatformKey::new(OsFamily::Linux, Arch::Arm64),
        PlatformKey::new(OsFamily::Mac, Arch::X86_64),
        PlatformKey::new(OsFamily::Mac, Arch::Arm64),
    ];

    pub const fn new(os: OsFamily, arch: Arch) -> Self {
        Self { os, arch }
    }

    /// Platform of the current compilation target, if supported
    pub fn current() -> Option<Self> {
        let os = if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "linux") {
            OsFamily::Linux
        } else if cfg!(target_os = "macos") {
            OsFamily::Mac
        } else {
            return None;
        };

        let arch = if cfg!(target_arch = "x86_64") {
            Arch::X86_64
        } else if cfg!(target_arch = "aarch64") {
            Arch::Arm64
        } else {
            return None;
        };

        Some(Self::new(os, arch))
    }

    pub fn is_windows(&self) -> bool {
        self.os == OsFamily::Windows
    }
}

impl fmt::Display for PlatformKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os.dir_name(), self.arch.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_platforms_distinct() {
        let set: HashSet<_> = PlatformKey::ALL.iter().collect();
        assert_eq!(set.len(), 6);
    }

    #[test]
    fn test_display() {
        let key = PlatformKey::new(OsFamily::Mac, Arch::Arm64);
        assert_eq!(key.to_string(), "Mac/arm64");

        let key = PlatformKey::new(OsFamily::Windows, Arch::X86_64);
        assert_eq!(key.to_string(), "Windows/x86_64");
    }

    #[test]
    fn test_current_matches_cfg() {
        let current = PlatformKey::current();

        #[cfg(all(windows, target_arch = "x86_64"))]
        assert_eq!(current, Some(PlatformKey::new(OsFamily::Windows, Arch::X86_64)));

        #[cfg(all(target_os = "linux", target_arch = "x86_64"))]
        assert_eq!(current, Some(PlatformKey::new(OsFamily::Linux, Arch::X86_64)));

        #[cfg(all(target_os = "macos", target_arch = "aarch64"))]
        assert_eq!(current, Some(PlatformKey::new(OsFamily::Mac, Arch::Arm64)));

        if let Some(key) = current {
            assert_eq!(key.is_windows(), cfg!(windows));
        }
    }
}
