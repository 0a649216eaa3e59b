//! TCP listener binding and accept error classification.

use std::io;

use tokio::net::TcpListener;

use crate::error::Error;

/// Bind a TCP listener on `address`.
///
/// `address` is anything tokio can resolve as `host:port`. Failures carry the
/// attempted address.
pub async fn bind(address: &str) -> Result<TcpListener, Error> {
    TcpListener::bind(address).await.map_err(|source| Error::Listen {
        address: address.to_string(),
        source,
    })
}

/// Whether an accept error only concerns the peer being accepted.
///
/// These are skipped by the accept loop.
pub fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}

/// Whether an accept error means the process ran out of a shared resource.
///
/// Descriptor tables and socket buffers free up again as connections close,
/// so the accept loop pauses and retries instead of stopping.
pub fn is_resource_exhaustion(e: &io::Error) -> bool {
    if e.kind() == io::ErrorKind::OutOfMemory {
        return true;
    }
    #[cfg(unix)]
    {
        matches!(
            e.raw_os_error(),
            Some(libc::EMFILE | libc::ENFILE | libc::ENOBUFS | libc::ENOMEM)
        )
    }
    #[cfg(not(unix))]
    {
        false
    }
}
