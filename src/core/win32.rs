//! Win32 console backend
//!
//! Implements [`Console`] over the kernel32 console API.

use windows::Win32::Foundation::HANDLE;
use windows::Win32::System::Console::{
    GetConsoleMode, GetConsoleScreenBufferInfo, GetStdHandle, SetConsoleMode, CONSOLE_MODE,
    CONSOLE_SCREEN_BUFFER_INFO, COORD, STD_OUTPUT_HANDLE,
};

use super::console::{Console, ConsoleMode, Coord, NativeError, ScreenBufferInfo, SmallRect};

// Failures come back as `windows::core::Error`, which already carries
// GetLastError and its FormatMessage text.

/// The process's attached Windows console
#[derive(Debug, Clone, Copy, Default)]
pub struct Win32Console;

impl From<windows::core::Error> for NativeError {
    fn from(e: windows::core::Error) -> Self {
        // Win32 errors are wrapped as HRESULT_FROM_WIN32; keep the low word
        let code = (e.code().0 as u32) & 0xFFFF;
        NativeError::new(code, e.message())
    }
}

fn coord(c: COORD) -> Coord {
    Coord { x: c.X, y: c.Y }
}

impl Console for Win32Console {
    type Handle = HANDLE;

    fn stdout_handle(&self) -> Result<HANDLE, NativeError> {
        let handle = unsafe { GetStdHandle(STD_OUTPUT_HANDLE)? };
        if handle.is_invalid() {
            return Err(windows::core::Error::from_win32().into());
        }
        Ok(handle)
    }

    fn get_mode(&self, handle: HANDLE) -> Result<ConsoleMode, NativeError> {
        let mut mode = CONSOLE_MODE::default();
        unsafe { GetConsoleMode(handle, &mut mode)? };
        Ok(ConsoleMode::from_bits_retain(mode.0))
    }

    fn set_mode(&self, handle: HANDLE, mode: ConsoleMode) -> Result<(), NativeError> {
        unsafe { SetConsoleMode(handle, CONSOLE_MODE(mode.bits()))? };
        Ok(())
    }

    fn screen_buffer_info(&self, handle: HANDLE) -> Result<ScreenBufferInfo, NativeError> {
        let mut info = CONSOLE_SCREEN_BUFFER_INFO::default();
        unsafe { GetConsoleScreenBufferInfo(handle, &mut info)? };

        let w = info.srWindow;
        Ok(ScreenBufferInfo {
            size: coord(info.dwSize),
            cursor_position: coord(info.dwCursorPosition),
            attributes: info.wAttributes.0,
            window: SmallRect {
                left: w.Left,
                top: w.Top,
                right: w.Right,
                bottom: w.Bottom,
            },
            maximum_window_size: coord(info.dwMaximumWindowSize),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_error_mapped() {
        use windows::Win32::Foundation::{SetLastError, WIN32_ERROR};

        unsafe { SetLastError(WIN32_ERROR(6)) };
        let native = NativeError::from(windows::core::Error::from_win32());
        assert_eq!(native.code, 6);
        assert!(!native.message.is_empty());
    }

    #[test]
    fn test_error_code_low_word() {
        let e = windows::core::Error::from(windows::core::HRESULT(0x8007_0006_u32 as i32));
        let native = NativeError::from(e);
        assert_eq!(native.code, 6);
    }
}
