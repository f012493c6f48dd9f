use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(any(feature = "pico1", feature = "pico2"))]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("Format error")]
    FormatError,

    #[display("LCD line does not fit in 16 columns")]
    LineTooLong,

    #[cfg(feature = "wifi")]
    #[display("WiFi join failed with status {_0}")]
    WifiJoin(#[error(not(source))] u32),
}

/// Why a clock source produced no time this cycle.
///
/// The synchronizer treats every variant the same way: no update, try again next period.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum QueryError {
    #[display("network is not reachable")]
    Unreachable,
    #[display("DNS lookup failed")]
    Dns,
    #[display("connect failed")]
    Connect,
    #[display("send failed")]
    Send,
    #[display("no response before timeout")]
    Timeout,
    #[display("receive failed")]
    Receive,
    #[display("response too short")]
    ShortResponse,
    #[display("response has no usable time")]
    Malformed,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Self::FormatError
    }
}

#[cfg(any(feature = "pico1", feature = "pico2"))]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
