//! Native-facing structures whose fields are read or written by native code.
//!
//! Nothing on the Rust side of the call graph touches these fields, so each
//! group has to be exposed to the image explicitly before the native library
//! initializes it.

/// A native structure and the fields native code accesses on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeSymbolGroup {
    /// Structure name as seen by the native library
    pub name: &'static str,
    /// Field names, in declaration order
    pub fields: &'static [&'static str],
    /// Only needed when building for Windows
    pub windows_only: bool,
}

impl NativeSymbolGroup {
    const fn core(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields, windows_only: false }
    }

    const fn windows(name: &'static str, fields: &'static [&'static str]) -> Self {
        Self { name, fields, windows_only: true }
    }
}

/// Groups required on every supported platform
pub const CORE_GROUPS: &[NativeSymbolGroup] = &[
    NativeSymbolGroup::core(
        "CLibrary",
        &["STDIN_FILENO", "STDOUT_FILENO", "STDERR_FILENO", "TIOCGWINSZ", "TIOCSWINSZ"],
    ),
    NativeSymbolGroup::core(
        "CLibrary$WinSize",
        &["ws_row", "ws_col", "ws_xpixel", "ws_ypixel"],
    ),
    NativeSymbolGroup::core(
        "CLibrary$Termios",
        &["c_iflag", "c_oflag", "c_cflag", "c_lflag", "c_cc", "c_ispeed", "c_ospeed"],
    ),
];

/// Groups required only for Windows builds
pub const WINDOWS_GROUPS: &[NativeSymbolGroup] = &[
    NativeSymbolGroup::windows(
        "Kernel32",
        &["STD_INPUT_HANDLE", "STD_OUTPUT_HANDLE", "STD_ERROR_HANDLE", "INVALID_HANDLE_VALUE"],
    ),
    NativeSymbolGroup::windows("Kernel32$SMALL_RECT", &["left", "top", "right", "bottom"]),
    NativeSymbolGroup::windows("Kernel32$COORD", &["x", "y"]),
    NativeSymbolGroup::windows(
        "Kernel32$CONSOLE_SCREEN_BUFFER_INFO",
        &["size", "cursorPosition", "attributes", "window", "maximumWindowSize"],
    ),
    NativeSymbolGroup::windows("Kernel32$CHAR_INFO", &["unicodeChar", "attributes"]),
    NativeSymbolGroup::windows(
        "Kernel32$KEY_EVENT_RECORD",
        &["keyDown", "repeatCount", "keyCode", "scanCode", "uchar", "controlKeyState"],
    ),
    NativeSymbolGroup::windows(
        "Kernel32$MOUSE_EVENT_RECORD",
        &["mousePosition", "buttonState", "controlKeyState", "eventFlags"],
    ),
    NativeSymbolGroup::windows("Kernel32$WINDOW_BUFFER_SIZE_RECORD", &["size"]),
    NativeSymbolGroup::windows("Kernel32$FOCUS_EVENT_RECORD", &["setFocus"]),
    NativeSymbolGroup::windows("Kernel32$MENU_EVENT_RECORD", &["commandId"]),
    NativeSymbolGroup::windows(
        "Kernel32$INPUT_RECORD",
        &["eventType", "keyEvent", "mouseEvent", "windowBufferSizeEvent", "menuEvent", "focusEvent"],
    ),
];

/// Groups applicable to a build, core groups first
pub fn groups_for(windows: bool) -> impl Iterator<Item = &'static NativeSymbolGroup> {
    let extra: &'static [NativeSymbolGroup] = if windows { WINDOWS_GROUPS } else { &[] };
    CORE_GROUPS.iter().chain(extra.iter())
}
