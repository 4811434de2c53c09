//! nativeterm - ANSI output and terminal size, on every platform
//!
//! On Windows the console has to be switched into virtual terminal
//! processing mode before escape sequences are interpreted, and the window
//! size has to be read from the screen buffer info. Other platforms handle
//! ANSI natively.
//!
//! # Modules
//!
//! - **core**: the terminal controller ([`enable_ansi`], [`terminal_size`])
//! - **registrar**: one-time exposure of native structures and embedding
//!   of the platform's native artifact into the built image
//! - **platform**: target (OS, architecture) identification
//! - **config**: TOML configuration
//!
//! # Quick Start
//!
//! ```no_run
//! let enabled = nativeterm::enable_ansi()?;
//! let size = nativeterm::terminal_size()?;
//! println!("ansi: {enabled}, size: {size}");
//! # Ok::<(), nativeterm::TermError>(())
//! ```

pub mod config;
pub mod core;
pub mod platform;
pub mod registrar;

pub use crate::core::{enable_ansi, terminal_size, TermError, TerminalController, TerminalSize};
pub use crate::platform::PlatformKey;
pub use crate::registrar::{Registrar, RegistrarError};
