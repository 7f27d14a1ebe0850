//! Diagnostics written to standard error

use crate::color::{MaybePaint, ERROR_INDICATOR, ERROR_TEXT, WARNING_INDICATOR, WARNING_TEXT};

pub const DEFAULT_EXIT_CODE: i32 = 1;

pub(crate) fn error_internal(text: &str) {
    eprintln!(
        "{} {}",
        ERROR_INDICATOR.maybe_paint("error:"),
        ERROR_TEXT.maybe_paint(text)
    );
}

pub(crate) fn warn_internal(text: &str) {
    eprintln!(
        "{} {}",
        WARNING_INDICATOR.maybe_paint("warning:"),
        WARNING_TEXT.maybe_paint(text)
    );
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::warn_internal(&formatted);
    })
}

#[macro_export]
macro_rules! die {
    ($($arg:tt)*) => ({
        let formatted = format!($($arg)*);
        $crate::utils::errors::error_internal(&formatted);
        ::std::process::exit($crate::utils::errors::DEFAULT_EXIT_CODE);
    })
}
