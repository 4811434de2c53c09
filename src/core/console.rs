//! Console types shared by the controller and its native backends.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Console output mode flags.
    ///
    /// Bits not named here are kept as-is so a read-modify-write never
    /// drops flags set by someone else.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ConsoleMode: u32 {
        const ENABLE_PROCESSED_OUTPUT = 0x0001;
        const ENABLE_WRAP_AT_EOL_OUTPUT = 0x0002;
        const ENABLE_VIRTUAL_TERMINAL_PROCESSING = 0x0004;
        const DISABLE_NEWLINE_AUTO_RETURN = 0x0008;
        const ENABLE_LVB_GRID_WORLDWIDE = 0x0010;
    }
}

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TerminalSize {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalSize {
    pub const fn new(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}

impl fmt::Display for TerminalSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.columns, self.rows)
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

/// Inclusive rectangle
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SmallRect {
    pub left: i16,
    pub top: i16,
    pub right: i16,
    pub bottom: i16,
}

/// Screen buffer information, laid out like `CONSOLE_SCREEN_BUFFER_INFO`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScreenBufferInfo {
    pub size: Coord,
    pub cursor_position: Coord,
    pub attributes: u16,
    /// Visible window, in buffer coordinates
    pub window: SmallRect,
    pub maximum_window_size: Coord,
}

impl ScreenBufferInfo {
    /// Size of the visible window.
    ///
    /// Computed from the window rectangle alone. `None` for a degenerate
    /// rectangle, or for an all-zero structure, which is what a failed
    /// native query leaves behind.
    pub fn window_size(&self) -> Option<TerminalSize> {
        if *self == Self::default() {
            return None;
        }

        let w = &self.window;
        let columns = i32::from(w.right) - i32::from(w.left) + 1;
        let rows = i32::from(w.bottom) - i32::from(w.top) + 1;

        if columns <= 0 || rows <= 0 {
            return None;
        }

        Some(TerminalSize::new(
            u16::try_from(columns).ok()?,
            u16::try_from(rows).ok()?,
        ))
    }
}

/// Error reported by a native console call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: u32,
    pub message: String,
}

impl NativeError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self { code, message: message.into() }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (error {})", self.message, self.code)
    }
}

impl std::error::Error for NativeError {}

/// Native console entry points
pub trait Console {
    type Handle: Copy;

    fn stdout_handle(&self) -> Result<Self::Handle, NativeError>;

    fn get_mode(&self, handle: Self::Handle) -> Result<ConsoleMode, NativeError>;

    fn set_mode(&self, handle: Self::Handle, mode: ConsoleMode) -> Result<(), NativeError>;

    fn screen_buffer_info(&self, handle: Self::Handle) -> Result<ScreenBufferInfo, NativeError>;
}
