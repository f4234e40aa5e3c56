//! Unified error type.

use std::fmt;
use std::net::SocketAddr;

/// The error type returned by lamina's fallible operations.
///
/// Application-level outcomes (a 404, a 429, a recovery substitute) are
/// [`Response`](crate::Response) values and never surface here. `Error` is
/// reserved for infrastructure faults that make serving impossible in the
/// first place.
#[derive(Debug)]
pub enum Error {
    /// The listener socket could not be bound. Usually the port is taken or
    /// the process lacks permission for it.
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind { source, .. } => Some(source),
        }
    }
}
