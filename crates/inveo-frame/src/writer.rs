use std::io::{ErrorKind, Write};

use tracing::trace;

use crate::error::{FrameError, Result};

/// Write one encoded request to the device (blocking) and flush it.
pub fn write_request<T: Write + ?Sized>(inner: &mut T, frame: &[u8]) -> Result<()> {
    trace!(bytes = ?frame, "writing request");

    let mut offset = 0usize;
    while offset < frame.len() {
        match inner.write(&frame[offset..]) {
            Ok(0) => return Err(FrameError::ConnectionClosed),
            Ok(n) => offset += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }

    loop {
        match inner.flush() {
            Ok(()) => return Ok(()),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
            Err(err) => return Err(FrameError::Io(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::Request;
    use crate::command::Command;

    #[test]
    fn writes_whole_frame() {
        let mut sink = Cursor::new(Vec::<u8>::new());
        let frame = Request::new(Command::Write, 0x0002)
            .with_argument(vec![1, 3])
            .encode();

        write_request(&mut sink, &frame).unwrap();

        assert_eq!(sink.into_inner(), vec![0x00, 0x01, 0x00, 0x02, 0x01, 0x03]);
    }

    #[test]
    fn flush_propagates() {
        let mut sink = FlushTrackingWriter::default();
        write_request(&mut sink, &[0, 1, 0xFE, 0x00]).unwrap();
        assert!(sink.flushed);
        assert_eq!(sink.data, vec![0, 1, 0xFE, 0x00]);
    }

    #[test]
    fn handles_interrupted_write_and_flush() {
        let mut sink = InterruptedWriteThenFlush {
            wrote_once: false,
            flush_interrupted: false,
            data: Vec::new(),
        };

        write_request(&mut sink, &[0, 0, 0, 1, 1]).unwrap();
        assert_eq!(sink.data, vec![0, 0, 0, 1, 1]);
    }

    #[test]
    fn resumes_partial_writes() {
        let mut sink = OneByteWriter { data: Vec::new() };
        write_request(&mut sink, &[0, 1, 0, 6, 1, 5]).unwrap();
        assert_eq!(sink.data, vec![0, 1, 0, 6, 1, 5]);
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        let err = write_request(&mut ZeroWriter, &[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn io_errors_propagate() {
        let err = write_request(&mut BrokenWriter, &[0, 0, 0, 0]).unwrap_err();
        assert!(matches!(err, FrameError::Io(ref io) if io.kind() == ErrorKind::BrokenPipe));
    }

    #[derive(Default)]
    struct FlushTrackingWriter {
        flushed: bool,
        data: Vec<u8>,
    }

    impl Write for FlushTrackingWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushed = true;
            Ok(())
        }
    }

    struct InterruptedWriteThenFlush {
        wrote_once: bool,
        flush_interrupted: bool,
        data: Vec<u8>,
    }

    impl Write for InterruptedWriteThenFlush {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if !self.wrote_once {
                self.wrote_once = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            if !self.flush_interrupted {
                self.flush_interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            Ok(())
        }
    }

    struct OneByteWriter {
        data: Vec<u8>,
    }

    impl Write for OneByteWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.data.push(buf[0]);
            Ok(1)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct ZeroWriter;

    impl Write for ZeroWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Ok(0)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct BrokenWriter;

    impl Write for BrokenWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
}
