//! Line-atomic printing from many threads.
//!
//! All [`SynchronizedConsole`] values share one process-wide lock, so a line
//! printed by one caller is never split by another. Which caller goes first
//! is not specified.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

lazy_static::lazy_static! {
    static ref CONSOLE_LOCK: Mutex<()> = Mutex::new(());
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SynchronizedConsole;

impl SynchronizedConsole {
    pub fn new() -> Self {
        SynchronizedConsole
    }

    /// Writes the concatenation of `parts` and a newline to stdout.
    pub fn print(&self, parts: &[&dyn Display]) -> io::Result<()> {
        self.print_to(&mut io::stdout(), parts)
    }

    pub fn print_to<W: Write>(&self, out: &mut W, parts: &[&dyn Display]) -> io::Result<()> {
        let line: String = parts.iter().map(|p| p.to_string()).collect();

        let _guard = lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

/// The lock guards no data, so a holder that panicked leaves nothing to
/// repair and poisoning is ignored.
fn lock() -> MutexGuard<'static, ()> {
    CONSOLE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// `console_print!("id:", id)` prints through a [`SynchronizedConsole`].
#[macro_export]
macro_rules! console_print {
    ($($part:expr),+ $(,)?) => {
        $crate::console::SynchronizedConsole::new().print(&[$(&$part as &dyn ::std::fmt::Display),+])
    };
}
