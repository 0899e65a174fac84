//! Error types for the ZooKeeper metrics bridge

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the ZooKeeper status port
#[derive(Error, Debug)]
pub enum Error {
    /// Target unreachable, refused, unresolvable, or connect timed out
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Command write or reply read failed, or the exchange timed out
    #[error("status exchange with {addr} failed: {source}")]
    Read {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Address of the server the failed exchange targeted.
    pub fn addr(&self) -> &str {
        match self {
            Error::Connect { addr, .. } | Error::Read { addr, .. } => addr,
        }
    }
}
