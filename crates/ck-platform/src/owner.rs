//! Clipboard owner lookup.
//!
//! On Windows the owner is the window that last opened the clipboard for
//! writing, falling back to the foreground window when the owner has
//! already gone away. Other platforms do not expose the owner; captures
//! there are attributed to an unknown application and only process-agnostic
//! filter rules can match them.

use ck_core::SourceApplication;

/// Best-effort lookup of the application that owns the clipboard right now.
pub fn clipboard_owner() -> SourceApplication {
    #[cfg(target_os = "windows")]
    {
        windows::clipboard_owner()
    }
    #[cfg(not(target_os = "windows"))]
    {
        SourceApplication::unknown()
    }
}

/// `C:\Program Files\App\app.exe` -> `app.exe`
pub fn process_name_from_path(path: &str) -> String {
    path.rsplit(['\\', '/'])
        .next()
        .unwrap_or(path)
        .to_string()
}

#[cfg(target_os = "windows")]
mod windows {
    use tracing::trace;
    use winapi::shared::minwindef::{DWORD, FALSE};
    use winapi::shared::windef::HWND;
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winbase::QueryFullProcessImageNameW;
    use winapi::um::winnt::PROCESS_QUERY_LIMITED_INFORMATION;
    use winapi::um::winuser::{
        GetClassNameW, GetClipboardOwner, GetForegroundWindow, GetWindowTextW,
        GetWindowThreadProcessId,
    };

    use super::process_name_from_path;
    use ck_core::SourceApplication;

    const MAX_TEXT: usize = 512;
    const MAX_PATH_CHARS: usize = 32_768;

    pub fn clipboard_owner() -> SourceApplication {
        // SAFETY: both calls take no arguments and return a possibly null handle.
        let hwnd = unsafe {
            let owner = GetClipboardOwner();
            if owner.is_null() {
                GetForegroundWindow()
            } else {
                owner
            }
        };
        if hwnd.is_null() {
            trace!("Clipboard has no owner window");
            return SourceApplication::unknown();
        }

        SourceApplication {
            process_name: process_name(hwnd).unwrap_or_default(),
            window_title: window_text(hwnd),
            window_class: class_name(hwnd),
        }
    }

    fn window_text(hwnd: HWND) -> Option<String> {
        let mut buf = [0u16; MAX_TEXT];
        // SAFETY: the buffer length passed matches the buffer.
        let len = unsafe { GetWindowTextW(hwnd, buf.as_mut_ptr(), buf.len() as i32) };
        (len > 0).then(|| String::from_utf16_lossy(&buf[..len as usize]))
    }

    fn class_name(hwnd: HWND) -> Option<String> {
        let mut buf = [0u16; MAX_TEXT];
        // SAFETY: the buffer length passed matches the buffer.
        let len = unsafe { GetClassNameW(hwnd, buf.as_mut_ptr(), buf.len() as i32) };
        (len > 0).then(|| String::from_utf16_lossy(&buf[..len as usize]))
    }

    fn process_name(hwnd: HWND) -> Option<String> {
        let mut pid: DWORD = 0;
        // SAFETY: pid is a valid out pointer for the duration of the call.
        unsafe { GetWindowThreadProcessId(hwnd, &mut pid) };
        if pid == 0 {
            return None;
        }

        // SAFETY: the handle is checked for null and closed on every path.
        unsafe {
            let process = OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, FALSE, pid);
            if process.is_null() {
                return None;
            }
            let mut buf = vec![0u16; MAX_PATH_CHARS];
            let mut len = buf.len() as DWORD;
            let ok = QueryFullProcessImageNameW(process, 0, buf.as_mut_ptr(), &mut len);
            CloseHandle(process);
            if ok == 0 {
                return None;
            }
            let path = String::from_utf16_lossy(&buf[..len as usize]);
            Some(process_name_from_path(&path))
        }
    }
}
