/*!
 * Clipboard support for repo2md
 *
 * Copies the finished document through whichever clipboard command the
 * system provides. This is a side channel: callers log failures and move on.
 */

use std::env;
use std::fmt;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;

use log::debug;
use thiserror::Error;

/// Error type for clipboard operations
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Failed to execute the command
    #[error("Command failed: {0}")]
    CommandFailed(String),

    /// No suitable clipboard mechanism was found
    #[error("No suitable clipboard mechanism found")]
    NoClipboardFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for clipboard operations
pub type Result<T> = std::result::Result<T, ClipboardError>;

/// Available clipboard backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    /// tmux paste buffer
    Tmux,
    /// Wayland clipboard
    Wayland,
    /// X11 clipboard with xsel
    Xsel,
    /// X11 clipboard with xclip
    Xclip,
    /// macOS clipboard
    MacOS,
    /// Windows clipboard (native or via WSL)
    Windows,
    /// Termux clipboard
    Termux,
}

impl ClipboardBackend {
    /// Program that reads the clipboard text from stdin
    pub fn program(self) -> &'static str {
        match self {
            Self::Tmux => "tmux",
            Self::Wayland => "wl-copy",
            Self::Xsel => "xsel",
            Self::Xclip => "xclip",
            Self::MacOS => "pbcopy",
            Self::Windows => "clip.exe",
            Self::Termux => "termux-clipboard-set",
        }
    }

    fn args(self) -> &'static [&'static str] {
        match self {
            Self::Tmux => &["load-buffer", "-w", "-"],
            Self::Xsel => &["-b", "-i"],
            Self::Xclip => &["-selection", "clipboard", "-in"],
            Self::Wayland | Self::MacOS | Self::Windows | Self::Termux => &[],
        }
    }

    /// Copy text through this backend
    pub fn copy(self, text: &str) -> Result<()> {
        execute_clipboard_command(self.program(), self.args(), text)
    }
}

impl fmt::Display for ClipboardBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Copy text to the clipboard
///
/// Tries every detected backend in order of preference and returns the one
/// that accepted the text.
pub fn copy_to_clipboard(text: &str) -> Result<ClipboardBackend> {
    let backends = detect_backends();
    if backends.is_empty() {
        return Err(ClipboardError::NoClipboardFound);
    }

    let mut last_error = ClipboardError::NoClipboardFound;
    for backend in backends {
        match backend.copy(text) {
            Ok(()) => return Ok(backend),
            Err(e) => {
                debug!("Clipboard backend {} failed: {}", backend, e);
                last_error = e;
            }
        }
    }

    Err(last_error)
}

/// Check whether an executable with this name is on the PATH
pub fn command_exists(command: &str) -> bool {
    env::var_os("PATH")
        .map(|paths| env::split_paths(&paths).any(|dir| dir.join(command).is_file()))
        .unwrap_or(false)
}

/// Backends usable on this system, most preferred first
pub fn detect_backends() -> Vec<ClipboardBackend> {
    let mut backends = Vec::with_capacity(3);

    if env::var_os("TMUX").is_some() && command_exists("tmux") {
        backends.push(ClipboardBackend::Tmux);
    }

    let candidates: &[ClipboardBackend] = match platform() {
        Platform::MacOS => &[ClipboardBackend::MacOS],
        Platform::Windows | Platform::Wsl => &[ClipboardBackend::Windows],
        Platform::Linux => &[
            ClipboardBackend::Wayland,
            ClipboardBackend::Xsel,
            ClipboardBackend::Xclip,
        ],
        Platform::Android => &[ClipboardBackend::Termux],
        Platform::Unknown => &[],
    };

    backends.extend(
        candidates
            .iter()
            .copied()
            .filter(|b| command_exists(b.program())),
    );

    backends
}

fn execute_clipboard_command(cmd: &str, args: &[&str], text: &str) -> Result<()> {
    let mut child = Command::new(cmd)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|e| ClipboardError::CommandFailed(format!("Failed to spawn {}: {}", cmd, e)))?;

    {
        let stdin = child.stdin.as_mut().ok_or_else(|| {
            ClipboardError::CommandFailed(format!("Failed to open stdin for {}", cmd))
        })?;
        stdin.write_all(text.as_bytes())?;
    }
    // Close stdin so the command sees EOF
    drop(child.stdin.take());

    let status = child.wait()?;
    if status.success() {
        Ok(())
    } else {
        Err(ClipboardError::CommandFailed(format!(
            "{} exited with status: {}",
            cmd, status
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Platform {
    MacOS,
    Windows,
    Wsl,
    Linux,
    Android,
    Unknown,
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

fn platform() -> Platform {
    *PLATFORM.get_or_init(|| {
        if cfg!(target_os = "macos") {
            Platform::MacOS
        } else if cfg!(target_os = "windows") {
            Platform::Windows
        } else if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "linux") {
            if env::var_os("WSL_DISTRO_NAME").is_some() {
                Platform::Wsl
            } else {
                Platform::Linux
            }
        } else {
            Platform::Unknown
        }
    })
}
