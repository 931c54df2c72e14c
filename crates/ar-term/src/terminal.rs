// SPDX-License-Identifier: MIT
//
// Terminal control: size queries, raw mode, alternate screen, RAII cleanup.
//
// Safety: termios (tcgetattr, tcsetattr), ioctl (TIOCGWINSZ), isatty and the
// raw fd write in the panic hook are POSIX calls with no safe wrapper in std.
// Each unsafe block is kept to the call itself.
#![allow(unsafe_code)]
//
// The renderer only ever asks two questions of the terminal: how big is it
// now, and how big could it get. Those live behind `TerminalSize` so tests
// and headless runs can answer with a `FixedSize`.
//
// `Terminal` owns the raw state. Entering switches to raw mode, the
// alternate screen and a hidden cursor; dropping the handle restores all
// three. A panic hook writes a pre-built restore sequence straight to fd 1,
// bypassing the stdout lock in case the panic happened mid-flush, then
// hands over to the previous hook so its message lands on a sane terminal.

use std::io::{self, Write};
use std::sync::{Mutex, Once};

use crate::ansi;
use crate::sink::Stream;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    /// Number of columns.
    pub cols: u16,
    /// Number of rows.
    pub rows: u16,
}

impl Size {
    #[inline]
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        Self { cols, rows }
    }

    /// Total number of cells (`cols × rows`).
    #[inline]
    #[must_use]
    pub const fn area(self) -> u32 {
        self.cols as u32 * self.rows as u32
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

/// Fallback when the size query fails (pipes, CI).
pub const FALLBACK_SIZE: Size = Size::new(80, 24);

// ─── Size Queries ───────────────────────────────────────────────────────────

/// Anything that can report the drawable area.
///
/// `max_size` is the largest the area may grow to; hosts without a limit
/// report `u16::MAX` on both axes.
pub trait TerminalSize {
    fn size(&self) -> Size;

    fn max_size(&self) -> Size {
        Size::new(u16::MAX, u16::MAX)
    }
}

/// A terminal of fixed dimensions, for tests and off-screen rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedSize {
    pub size: Size,
    pub max: Size,
}

impl FixedSize {
    /// A fixed area that can never grow.
    #[must_use]
    pub const fn new(cols: u16, rows: u16) -> Self {
        let size = Size::new(cols, rows);
        Self { size, max: size }
    }
}

impl TerminalSize for FixedSize {
    fn size(&self) -> Size {
        self.size
    }

    fn max_size(&self) -> Size {
        self.max
    }
}

/// Query the current terminal size via `ioctl(TIOCGWINSZ)`.
///
/// Returns `None` if stdout is not a terminal or the query fails.
#[cfg(unix)]
#[must_use]
pub fn get_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &mut ws) };

    if result == 0 && ws.ws_col > 0 && ws.ws_row > 0 {
        Some(Size::new(ws.ws_col, ws.ws_row))
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn get_size() -> Option<Size> {
    None
}

/// Check whether stdin is connected to a terminal.
#[cfg(unix)]
#[must_use]
pub fn is_tty() -> bool {
    unsafe { libc::isatty(libc::STDIN_FILENO) != 0 }
}

#[cfg(not(unix))]
#[must_use]
pub fn is_tty() -> bool {
    false
}

// ─── Panic-Safe Restore ─────────────────────────────────────────────────────

/// Copy of the original termios for the panic hook, which cannot reach the
/// `Terminal` that owns the real one.
#[cfg(unix)]
static TERMIOS_BACKUP: Mutex<Option<libc::termios>> = Mutex::new(None);

#[cfg(unix)]
fn restore_termios_from_backup() {
    if let Ok(guard) = TERMIOS_BACKUP.lock() {
        if let Some(ref original) = *guard {
            unsafe {
                let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSANOW, original);
            }
        }
    }
}

/// End sync, reset SGR, show cursor, leave the alternate screen. The screen
/// switch goes last so the shell comes back clean.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[?2026l\x1b[0m\x1b[?25h\x1b[?1049l";

static PANIC_HOOK_INSTALLED: Once = Once::new();

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            emergency_restore();

            #[cfg(unix)]
            restore_termios_from_backup();

            original(info);
        }));
    });
}

fn emergency_restore() {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(
            libc::STDOUT_FILENO,
            EMERGENCY_RESTORE.as_ptr().cast::<libc::c_void>(),
            EMERGENCY_RESTORE.len(),
        );
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(EMERGENCY_RESTORE);
        let _ = io::stdout().flush();
    }
}

// ─── Terminal ───────────────────────────────────────────────────────────────

/// Terminal handle with RAII cleanup.
///
/// ```no_run
/// use ar_term::terminal::{Terminal, TerminalSize};
///
/// let mut term = Terminal::new();
/// term.enter()?;
/// let area = term.size();
/// // ... draw frames ...
/// # let _ = area;
/// # Ok::<(), std::io::Error>(())
/// ```
pub struct Terminal {
    #[cfg(unix)]
    original_termios: Option<libc::termios>,

    /// Cached; refreshed with [`refresh_size`](Self::refresh_size).
    size: Size,

    active: bool,
}

impl Terminal {
    /// Create a handle and query the current size, falling back to 80×24.
    ///
    /// Does not touch the terminal; call [`enter`](Self::enter) for that.
    #[must_use]
    pub fn new() -> Self {
        let size = get_size().unwrap_or_else(|| {
            log::warn!("terminal size query failed, assuming {FALLBACK_SIZE:?}");
            FALLBACK_SIZE
        });

        Self {
            #[cfg(unix)]
            original_termios: None,
            size,
            active: false,
        }
    }

    /// Re-query the size from the OS. Keeps the cached value if that fails.
    pub fn refresh_size(&mut self) -> Size {
        match get_size() {
            Some(s) => self.size = s,
            None => log::warn!("terminal size query failed, keeping {:?}", self.size),
        }
        self.size
    }

    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Raw mode, alternate screen, hidden cursor, cleared screen.
    ///
    /// Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode or terminal output fails.
    pub fn enter(&mut self) -> io::Result<()> {
        if self.active {
            return Ok(());
        }

        install_panic_hook();
        self.enable_raw_mode()?;

        let mut out = Stream(io::stdout().lock());
        ansi::enter_alt_screen(&mut out)?;
        ansi::cursor_hide(&mut out)?;
        ansi::clear_screen(&mut out)?;
        out.0.flush()?;

        self.active = true;
        log::debug!("entered terminal mode at {:?}", self.size);
        Ok(())
    }

    /// Undo [`enter`](Self::enter). Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal output or the termios restore fails.
    pub fn leave(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }

        let mut out = Stream(io::stdout().lock());
        ansi::end_sync(&mut out)?;
        ansi::reset(&mut out)?;
        ansi::cursor_show(&mut out)?;
        ansi::exit_alt_screen(&mut out)?;
        out.0.flush()?;
        drop(out);

        self.disable_raw_mode()?;
        self.active = false;
        log::debug!("left terminal mode");
        Ok(())
    }

    // ── Raw Mode (termios) ──────────────────────────────────────────

    #[cfg(unix)]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        if !is_tty() {
            return Ok(());
        }

        let fd = io::stdin().as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &raw mut termios) != 0 {
                return Err(io::Error::last_os_error());
            }

            self.original_termios = Some(termios);
            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = Some(termios);
            }

            // cfmakeraw equivalent.
            termios.c_iflag &= !(libc::IGNBRK
                | libc::BRKINT
                | libc::PARMRK
                | libc::ISTRIP
                | libc::INLCR
                | libc::IGNCR
                | libc::ICRNL
                | libc::IXON);
            termios.c_oflag &= !libc::OPOST;
            termios.c_lflag &=
                !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);
            termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
            termios.c_cflag |= libc::CS8;
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &raw const termios) != 0 {
                return Err(io::Error::last_os_error());
            }
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn enable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        if let Some(ref original) = self.original_termios {
            use std::os::unix::io::AsRawFd;
            let fd = io::stdin().as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, original) != 0 {
                    return Err(io::Error::last_os_error());
                }
            }

            if let Ok(mut guard) = TERMIOS_BACKUP.lock() {
                *guard = None;
            }
            self.original_termios = None;
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn disable_raw_mode(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSize for Terminal {
    fn size(&self) -> Size {
        self.size
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.active {
            let _ = self.leave();
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_area() {
        assert_eq!(Size::new(80, 24).area(), 1920);
        assert_eq!(Size::new(0, 24).area(), 0);
        assert_eq!(Size::new(u16::MAX, u16::MAX).area(), 4_294_836_225);
    }

    #[test]
    fn size_is_empty() {
        assert!(Size::new(0, 5).is_empty());
        assert!(Size::new(5, 0).is_empty());
        assert!(!Size::new(1, 1).is_empty());
    }

    #[test]
    fn fixed_size_reports_itself() {
        let fixed = FixedSize::new(40, 10);
        assert_eq!(fixed.size(), Size::new(40, 10));
        assert_eq!(fixed.max_size(), Size::new(40, 10));
    }

    #[test]
    fn default_max_size_is_unbounded() {
        struct Tiny;
        impl TerminalSize for Tiny {
            fn size(&self) -> Size {
                Size::new(1, 1)
            }
        }
        assert_eq!(Tiny.max_size(), Size::new(u16::MAX, u16::MAX));
    }

    #[test]
    fn get_size_does_not_panic() {
        let _ = get_size();
    }

    #[test]
    fn emergency_restore_exits_alt_screen_last() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[?2026l"));
        assert!(s.contains("\x1b[0m"));
        assert!(s.contains("\x1b[?25h"));
        assert!(s.ends_with("\x1b[?1049l"));
    }

    #[test]
    fn terminal_has_nonzero_size() {
        let term = Terminal::new();
        assert!(!term.size().is_empty());
        assert!(!term.is_active());
    }

    #[test]
    fn leave_without_enter_is_noop() {
        let mut term = Terminal::new();
        term.leave().unwrap();
        assert!(!term.is_active());
    }
}
