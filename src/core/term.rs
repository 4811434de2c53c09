//! Terminal controller
//!
//! Console-mode read/modify/write and window size queries over a [`Console`]
//! backend. Every call goes to the console; nothing is cached.

use std::io;

use thiserror::Error;
use tracing::{debug, warn};

use super::console::{Console, ConsoleMode, NativeError, TerminalSize};

#[derive(Error, Debug)]
pub enum TermError {
    #[error("Failed to get standard output handle: {0}")]
    NoHandle(#[source] NativeError),

    #[error("Failed to get console mode: {0}")]
    ModeQueryFailed(#[source] NativeError),

    #[error("Failed to set console mode: {0}")]
    ModeWriteFailed(#[source] NativeError),

    #[error("Terminal size is unknown: {0}")]
    SizeQueryIndeterminate(String),
}

pub type Result<T> = std::result::Result<T, TermError>;

impl From<TermError> for io::Error {
    fn from(e: TermError) -> Self {
        io::Error::new(io::ErrorKind::Other, e)
    }
}

/// Console operations for the process's standard output
#[derive(Debug, Clone, Default)]
pub struct TerminalController<C> {
    console: C,
}

impl<C: Console> TerminalController<C> {
    pub fn new(console: C) -> Self {
        Self { console }
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    /// Turn on virtual terminal processing, keeping every other mode bit.
    ///
    /// A failed mode read is an error and nothing is written. A failed
    /// write returns `Ok(false)`.
    pub fn enable_ansi_passthrough(&self) -> Result<bool> {
        match self.set_vt_processing() {
            Ok(()) => Ok(true),
            Err(TermError::ModeWriteFailed(e)) => {
                warn!("Could not enable virtual terminal processing: {}", e);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Like [`enable_ansi_passthrough`](Self::enable_ansi_passthrough), but a
    /// failed write is an error too
    pub fn ensure_ansi_passthrough(&self) -> Result<()> {
        self.set_vt_processing()
    }

    fn set_vt_processing(&self) -> Result<()> {
        let handle = self.console.stdout_handle().map_err(TermError::NoHandle)?;
        let mode = self
            .console
            .get_mode(handle)
            .map_err(TermError::ModeQueryFailed)?;

        // No lock across read and write: a concurrent caller may race us
        let updated = mode | ConsoleMode::ENABLE_VIRTUAL_TERMINAL_PROCESSING;
        debug!("Console mode {:#06x} -> {:#06x}", mode.bits(), updated.bits());

        self.console
            .set_mode(handle, updated)
            .map_err(TermError::ModeWriteFailed)
    }

    /// Size of the visible console window
    pub fn query_size(&self) -> Result<TerminalSize> {
        let handle = self
            .console
            .stdout_handle()
            .map_err(|e| TermError::SizeQueryIndeterminate(e.to_string()))?;
        let info = self
            .console
            .screen_buffer_info(handle)
            .map_err(|e| TermError::SizeQueryIndeterminate(e.to_string()))?;

        info.window_size().ok_or_else(|| {
            TermError::SizeQueryIndeterminate(format!("degenerate window {:?}", info.window))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::console::{ScreenBufferInfo, SmallRect};
    use std::cell::{Cell, RefCell};

    /// In-memory console with switchable failures
    #[derive(Default)]
    struct MockConsole {
        mode: Cell<u32>,
        fail_get: bool,
        fail_set: bool,
        info: Option<ScreenBufferInfo>,
        writes: RefCell<Vec<u32>>,
    }

    impl MockConsole {
        fn with_mode(mode: u32) -> Self {
            Self { mode: Cell::new(mode), ..Default::default() }
        }
    }

    impl Console for MockConsole {
        type Handle = usize;

        fn stdout_handle(&self) -> std::result::Result<usize, NativeError> {
            Ok(7)
        }

        fn get_mode(&self, handle: usize) -> std::result::Result<ConsoleMode, NativeError> {
            assert_eq!(handle, 7);
            if self.fail_get {
                return Err(NativeError::new(6, "The handle is invalid."));
            }
            Ok(ConsoleMode::from_bits_retain(self.mode.get()))
        }

        fn set_mode(&self, _: usize, mode: ConsoleMode) -> std::result::Result<(), NativeError> {
            self.writes.borrow_mut().push(mode.bits());
            if self.fail_set {
                return Err(NativeError::new(87, "The parameter is incorrect."));
            }
            self.mode.set(mode.bits());
            Ok(())
        }

        fn screen_buffer_info(&self, _: usize) -> std::result::Result<ScreenBufferInfo, NativeError> {
            self.info
                .ok_or_else(|| NativeError::new(6, "The handle is invalid."))
        }
    }

    #[test]
    fn test_enable_from_zero() {
        let term = TerminalController::new(MockConsole::with_mode(0x0000));
        assert!(term.enable_ansi_passthrough().unwrap());
        assert_eq!(term.console().mode.get(), 0x0004);
    }

    #[test]
    fn test_enable_preserves_other_bits() {
        let term = TerminalController::new(MockConsole::with_mode(0x0002));
        assert!(term.enable_ansi_passthrough().unwrap());
        assert_eq!(term.console().mode.get(), 0x0006);

        // Bits unknown to ConsoleMode survive too
        let term = TerminalController::new(MockConsole::with_mode(0x0203));
        assert!(term.enable_ansi_passthrough().unwrap());
        assert_eq!(term.console().mode.get(), 0x0207);
    }

    #[test]
    fn test_read_failure_raises_without_write() {
        let console = MockConsole { fail_get: true, ..Default::default() };
        let term = TerminalController::new(console);

        let err = term.enable_ansi_passthrough().unwrap_err();
        assert!(matches!(err, TermError::ModeQueryFailed(_)));
        assert!(err.to_string().contains("The handle is invalid."));
        assert!(term.console().writes.borrow().is_empty());

        let io_err: io::Error = err.into();
        assert!(io_err.to_string().contains("Failed to get console mode"));
    }

    #[test]
    fn test_write_failure_returns_false() {
        let console = MockConsole { fail_set: true, ..MockConsole::with_mode(0x0001) };
        let term = TerminalController::new(console);

        assert!(!term.enable_ansi_passthrough().unwrap());
        assert_eq!(*term.console().writes.borrow(), vec![0x0005]);
        assert_eq!(term.console().mode.get(), 0x0001);
    }

    #[test]
    fn test_ensure_reports_write_failure() {
        let console = MockConsole { fail_set: true, ..Default::default() };
        let term = TerminalController::new(console);

        let err = term.ensure_ansi_passthrough().unwrap_err();
        assert!(matches!(err, TermError::ModeWriteFailed(_)));
    }

    #[test]
    fn test_query_size() {
        let info = ScreenBufferInfo {
            window: SmallRect { left: 0, top: 0, right: 79, bottom: 23 },
            ..Default::default()
        };
        let console = MockConsole { info: Some(info), ..Default::default() };
        let term = TerminalController::new(console);

        assert_eq!(term.query_size().unwrap(), TerminalSize::new(80, 24));
    }

    #[test]
    fn test_query_size_failure() {
        let term = TerminalController::new(MockConsole::default());
        let err = term.query_size().unwrap_err();
        assert!(matches!(err, TermError::SizeQueryIndeterminate(_)));
        assert!(err.to_string().contains("The handle is invalid."));

        let console = MockConsole { info: Some(ScreenBufferInfo::default()), ..Default::default() };
        let term = TerminalController::new(console);
        let err = term.query_size().unwrap_err();
        assert!(err.to_string().contains("degenerate window"));
    }
}
