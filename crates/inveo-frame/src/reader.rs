use std::io::{ErrorKind, Read};

use bytes::BytesMut;
use tracing::trace;

use crate::error::{FrameError, Result};

/// Read one response report of `size` bytes from the device (blocking).
///
/// The device delivers a whole report per read, so a single successful read
/// is one response. A report shorter than `size` is rejected rather than
/// completed from the next report.
pub fn read_response<T: Read + ?Sized>(inner: &mut T, size: usize) -> Result<BytesMut> {
    let mut buf = BytesMut::zeroed(size);

    let read = loop {
        match inner.read(&mut buf) {
            Ok(n) => break n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    };

    if read == 0 {
        return Err(FrameError::ConnectionClosed);
    }
    if read < size {
        return Err(FrameError::Truncated {
            len: read,
            expected: size,
        });
    }

    trace!(bytes = ?&buf[..], "read response");
    Ok(buf)
}
