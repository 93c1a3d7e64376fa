/// Macro for prefixed status logging to stderr (only when stderr is a terminal).
///
/// The `always` form skips the terminal check, for output the user asked for
/// explicitly (e.g. `--verbose`).
///
/// Usage:
/// ```ignore
/// log_status!("patch", "Rewrote {} file(s)", count);
/// log_status!("patch", always, "{}", path.display());
/// ```
#[macro_export]
macro_rules! log_status {
    ($prefix:expr, always, $($arg:tt)*) => {
        eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
    };
    ($prefix:expr, $($arg:tt)*) => {
        if ::std::io::IsTerminal::is_terminal(&::std::io::stderr()) {
            eprintln!(concat!("[", $prefix, "] {}"), format_args!($($arg)*));
        }
    };
}

pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `textpatch::patch` instead of `textpatch::core::patch`
pub use core::*;
pub use utils::*;
