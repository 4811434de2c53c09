//! Terminal control.
//!
//! - **console**: mode bitmask, screen buffer record, native [`Console`] trait
//! - **term**: [`TerminalController`], the mode read/modify/write and size query
//! - **win32**: kernel32 backend (Windows only)
//!
//! # Architecture
//!
//! ```text
//! enable_ansi() / terminal_size()
//! ├── Windows: TerminalController<Win32Console>
//! └── others:  ANSI is native; size from crossterm
//! ```

pub mod console;
pub mod term;
#[cfg(windows)]
pub mod win32;

pub use console::{Console, ConsoleMode, NativeError, ScreenBufferInfo, TerminalSize};
pub use term::{TermError, TerminalController};
#[cfg(windows)]
pub use win32::Win32Console;

/// Make sure ANSI escape sequences written to stdout are interpreted.
///
/// Returns whether the console accepted the mode change. Always `true`
/// outside Windows.
pub fn enable_ansi() -> term::Result<bool> {
    #[cfg(windows)]
    {
        TerminalController::new(Win32Console).enable_ansi_passthrough()
    }

    #[cfg(not(windows))]
    {
        tracing::debug!("ANSI is supported natively, nothing to enable");
        Ok(true)
    }
}

/// Current size of the terminal attached to stdout
pub fn terminal_size() -> term::Result<TerminalSize> {
    #[cfg(windows)]
    {
        TerminalController::new(Win32Console).query_size()
    }

    #[cfg(not(windows))]
    {
        match crossterm::terminal::size() {
            Ok((columns, rows)) if columns > 0 && rows > 0 => Ok(TerminalSize::new(columns, rows)),
            Ok((columns, rows)) => Err(TermError::SizeQueryIndeterminate(format!(
                "reported {}x{}",
                columns, rows
            ))),
            Err(e) => Err(TermError::SizeQueryIndeterminate(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(windows))]
    fn test_enable_ansi_is_noop() {
        assert!(enable_ansi().unwrap());
    }
}
