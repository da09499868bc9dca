//! Desktop shell launch and window lifecycle policy.
//!
//! The shell itself (window creation, web view) lives in the host
//! application; this module decides *what* it loads and *when* it quits or
//! recreates a window.
//!
//! # Invariants
//! - Development mode always loads the local dev server and opens devtools.
//! - Closing the last window quits, except on macOS.
//! - Activation recreates a window only when none is open.

use log::info;
use std::path::{Path, PathBuf};

pub const DEV_MODE_ENV: &str = "MANGASHELF_DEV";
pub const DEV_SERVER_URL: &str = "http://localhost:8080";
pub const DIST_INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchMode {
    Development,
    Production,
}

impl LaunchMode {
    pub fn from_env() -> Self {
        Self::from_flag(std::env::var(DEV_MODE_ENV).ok().as_deref())
    }

    /// `1`, `true` and `yes` (any case) select development.
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag.map(|value| value.trim().to_ascii_lowercase()) {
            Some(value) if matches!(value.as_str(), "1" | "true" | "yes") => Self::Development,
            _ => Self::Production,
        }
    }
}

/// What the main window loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTarget {
    pub mode: LaunchMode,
    pub url: String,
    pub open_devtools: bool,
}

impl LaunchTarget {
    /// `dist_dir` is the packaged frontend build directory.
    pub fn resolve(mode: LaunchMode, dist_dir: &Path) -> Self {
        let target = match mode {
            LaunchMode::Development => Self {
                mode,
                url: DEV_SERVER_URL.to_string(),
                open_devtools: true,
            },
            LaunchMode::Production => Self {
                mode,
                url: file_url(&dist_dir.join(DIST_INDEX_FILE)),
                open_devtools: false,
            },
        };
        info!(
            "event=shell_launch module=host status=ok mode={:?} url={}",
            target.mode, target.url
        );
        target
    }
}

fn file_url(path: &Path) -> String {
    let text = path.to_string_lossy().replace('\\', "/");
    if text.starts_with('/') {
        format!("file://{text}")
    } else {
        format!("file:///{text}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowSpec {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSpec {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    Other,
}

impl Platform {
    pub fn current() -> Self {
        match std::env::consts::OS {
            "macos" => Self::MacOs,
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellAction {
    None,
    CreateWindow(WindowSpec),
    Quit,
}

/// Tracks open windows and answers shell lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowLifecycle {
    platform: Platform,
    open_windows: usize,
    window: WindowSpec,
}

impl WindowLifecycle {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            open_windows: 0,
            window: WindowSpec::default(),
        }
    }

    pub fn open_windows(&self) -> usize {
        self.open_windows
    }

    /// App finished starting: open the main window.
    pub fn on_ready(&mut self) -> ShellAction {
        self.open_windows += 1;
        ShellAction::CreateWindow(self.window)
    }

    pub fn on_window_closed(&mut self) -> ShellAction {
        self.open_windows = self.open_windows.saturating_sub(1);
        if self.open_windows > 0 {
            return ShellAction::None;
        }
        match self.platform {
            Platform::MacOs => ShellAction::None,
            _ => ShellAction::Quit,
        }
    }

    /// Dock/taskbar activation.
    pub fn on_activate(&mut self) -> ShellAction {
        if self.open_windows > 0 {
            return ShellAction::None;
        }
        self.open_windows += 1;
        ShellAction::CreateWindow(self.window)
    }
}

/// Packaged frontend directory next to the executable.
pub fn default_dist_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("dist")))
        .unwrap_or_else(|| PathBuf::from("dist"))
}

#[cfg(test)]
mod tests {
    use super::{LaunchMode, LaunchTarget, Platform, ShellAction, WindowLifecycle};
    use std::path::Path;

    #[test]
    fn flag_parsing_selects_mode() {
        assert_eq!(LaunchMode::from_flag(Some("TRUE")), LaunchMode::Development);
        assert_eq!(LaunchMode::from_flag(Some("0")), LaunchMode::Production);
        assert_eq!(LaunchMode::from_flag(None), LaunchMode::Production);
    }

    #[test]
    fn production_target_is_file_url() {
        let target = LaunchTarget::resolve(LaunchMode::Production, Path::new("/opt/app/dist"));
        assert_eq!(target.url, "file:///opt/app/dist/index.html");
        assert!(!target.open_devtools);
    }

    #[test]
    fn last_window_close_quits_except_on_macos() {
        let mut linux = WindowLifecycle::new(Platform::Linux);
        linux.on_ready();
        assert_eq!(linux.on_window_closed(), ShellAction::Quit);

        let mut mac = WindowLifecycle::new(Platform::MacOs);
        mac.on_ready();
        assert_eq!(mac.on_window_closed(), ShellAction::None);
        assert!(matches!(mac.on_activate(), ShellAction::CreateWindow(_)));
        assert_eq!(mac.on_activate(), ShellAction::None);
    }
}
