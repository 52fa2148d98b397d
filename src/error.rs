//! Error type and the [`err_at`] macro used throughout this crate.

use std::{fmt, result};

/// Classification for [`Error`], attached at the call-site via [`err_at`].
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Kind {
    /// Precondition violated by the caller (non-empty index bulk-loaded,
    /// unsorted bulk-load input, and the like).
    InvalidInput,
    /// A key that was expected to be present could not be found.
    KeyNotFound,
    /// Weights file or workload file is missing, truncated or malformed.
    InvalidFormat,
    /// I/O failure while reading a weights or workload file.
    IOError,
    /// A numeric conversion between key/value representations failed.
    FailConvert,
    /// An invariant internal to this crate was violated; indicates a bug.
    Fatal,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Error type returned by every fallible operation in this crate.
#[derive(Debug)]
pub struct Error(pub Kind, pub String);

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.0, self.1)
    }
}

impl std::error::Error for Error {}

/// Crate-wide `Result` alias.
pub type Result<T> = result::Result<T, Error>;

/// Build an [`Error`] at the call-site, capturing file and line.
///
/// Two forms:
/// ```ignore
/// err_at!(IOError, fd.read(&mut buf))?;
/// err_at!(InvalidFormat, msg: "bad header {}/{}", got, want);
/// ```
/// The first form converts any `Result<T, E: Display>` into
/// `Result<T, Error>`, tagging the error with `Kind` and the call site. The
/// second form builds an `Err(Error)` directly from a format string.
#[macro_export]
macro_rules! err_at {
    ($kind:ident, msg: $($arg:expr),+) => {{
        let msg = format!($($arg),+);
        Err($crate::error::Error($crate::error::Kind::$kind, format!("{}:{} {}", file!(), line!(), msg)))
    }};
    ($kind:ident, $expr:expr) => {
        match $expr {
            Ok(val) => Ok(val),
            Err(err) => Err($crate::error::Error(
                $crate::error::Kind::$kind,
                format!("{}:{} {}", file!(), line!(), err),
            )),
        }
    };
}
