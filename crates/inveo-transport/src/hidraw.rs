use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::fd::AsRawFd;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::error::{Result, TransportError};

const SYSFS_HIDRAW: &str = "/sys/class/hidraw";
const DEV_ROOT: &str = "/dev";

/// An open `hidraw` device node.
///
/// Reads return one input report each; writes send one output report. The
/// handle is closed when the stream is dropped.
pub struct HidStream {
    file: File,
    path: PathBuf,
    read_timeout: Option<Duration>,
}

impl HidStream {
    /// Open a `hidraw` device node for reading and writing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|source| TransportError::Open {
                path: path.clone(),
                source,
            })?;
        debug!(?path, "opened hid device");
        Ok(Self::from_file(file, path))
    }

    pub(crate) fn from_file(file: File, path: PathBuf) -> Self {
        Self {
            file,
            path,
            read_timeout: None,
        }
    }

    /// Bound every blocking read by `timeout`. `None` blocks indefinitely.
    ///
    /// A zero duration is rejected, matching `std::net` socket timeouts.
    pub fn set_read_timeout(&mut self, timeout: Option<Duration>) -> Result<()> {
        if timeout == Some(Duration::ZERO) {
            return Err(TransportError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                "cannot set a zero duration timeout",
            )));
        }
        self.read_timeout = timeout;
        Ok(())
    }

    /// Currently configured read timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// The device node this stream was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn wait_readable(&self, timeout: Duration) -> std::io::Result<()> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let millis = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        loop {
            // SAFETY: `pfd` is a valid, writable pollfd and the count passed is 1.
            // The descriptor is owned by `self.file` and stays open for the call.
            let rc = unsafe { libc::poll(&mut pfd, 1, millis) };
            match rc {
                0 => {
                    return Err(std::io::Error::new(
                        ErrorKind::TimedOut,
                        format!("no report within {timeout:?}"),
                    ))
                }
                n if n > 0 => return Ok(()),
                _ => {
                    let err = std::io::Error::last_os_error();
                    if err.kind() == ErrorKind::Interrupted {
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }
}

impl Read for HidStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if let Some(timeout) = self.read_timeout {
            self.wait_readable(timeout)?;
        }
        self.file.read(buf)
    }
}

impl Write for HidStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.file.flush()
    }
}

impl Drop for HidStream {
    fn drop(&mut self) {
        debug!(path = ?self.path, "closing hid device");
    }
}

impl std::fmt::Debug for HidStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidStream")
            .field("path", &self.path)
            .field("read_timeout", &self.read_timeout)
            .finish()
    }
}

/// Locate the `hidraw` node of the first device matching `vendor`/`product`.
pub fn find_device(vendor: u16, product: u16) -> Result<PathBuf> {
    find_device_in(Path::new(SYSFS_HIDRAW), Path::new(DEV_ROOT), vendor, product)
}

/// Locate and open the first device matching `vendor`/`product`.
pub fn open_device(vendor: u16, product: u16) -> Result<HidStream> {
    HidStream::open(find_device(vendor, product)?)
}

fn find_device_in(sysfs: &Path, dev_root: &Path, vendor: u16, product: u16) -> Result<PathBuf> {
    let entries = match std::fs::read_dir(sysfs) {
        Ok(entries) => entries,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            return Err(TransportError::NotFound { vendor, product })
        }
        Err(err) => return Err(TransportError::Io(err)),
    };

    let mut names: Vec<_> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name())
        .collect();
    names.sort();

    for name in names {
        let uevent = sysfs.join(&name).join("device").join("uevent");
        let Ok(contents) = std::fs::read_to_string(&uevent) else {
            continue;
        };
        if uevent_matches(&contents, vendor, product) {
            let node = dev_root.join(&name);
            debug!(?node, "found hid device {vendor:04x}:{product:04x}");
            return Ok(node);
        }
    }

    Err(TransportError::NotFound { vendor, product })
}

/// `HID_ID=<bus>:<vendor>:<product>`, each field zero-padded hex.
fn uevent_matches(contents: &str, vendor: u16, product: u16) -> bool {
    contents
        .lines()
        .filter_map(|line| line.strip_prefix("HID_ID="))
        .any(|id| {
            let mut fields = id.trim().split(':').skip(1);
            let parsed_vendor = fields.next().and_then(|v| u32::from_str_radix(v, 16).ok());
            let parsed_product = fields.next().and_then(|p| u32::from_str_radix(p, 16).ok());
            parsed_vendor == Some(u32::from(vendor)) && parsed_product == Some(u32::from(product))
        })
}

#[cfg(test)]
mod tests {
    use std::os::fd::OwnedFd;
    use std::os::unix::net::UnixStream;

    use super::*;

    fn unique_temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "inveo-transport-{tag}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .expect("time should be after epoch")
                .as_nanos()
        ));
        std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
        dir
    }

    fn fake_hidraw(sysfs: &Path, name: &str, hid_id: &str) {
        let device = sysfs.join(name).join("device");
        std::fs::create_dir_all(&device).unwrap();
        std::fs::write(
            device.join("uevent"),
            format!("DRIVER=hid-generic\nHID_ID={hid_id}\nHID_NAME=Reader\n"),
        )
        .unwrap();
    }

    fn socket_stream() -> (HidStream, UnixStream) {
        let (ours, theirs) = UnixStream::pair().unwrap();
        let file = File::from(OwnedFd::from(ours));
        (
            HidStream::from_file(file, PathBuf::from("socketpair")),
            theirs,
        )
    }

    #[test]
    fn open_missing_node_reports_path() {
        let err = HidStream::open("/nonexistent/hidraw99").unwrap_err();
        match err {
            TransportError::Open { path, source } => {
                assert_eq!(path, PathBuf::from("/nonexistent/hidraw99"));
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn uevent_matching() {
        let contents = "HID_ID=0003:000004D8:0000FC27\n";
        assert!(uevent_matches(contents, 0x04D8, 0xFC27));
        assert!(uevent_matches(
            "HID_ID=0003:000004d8:0000fc27",
            0x04D8,
            0xFC27
        ));
        assert!(!uevent_matches(contents, 0x04D8, 0xFC28));
        assert!(!uevent_matches("HID_NAME=x\n", 0x04D8, 0xFC27));
        assert!(!uevent_matches("HID_ID=garbage", 0x04D8, 0xFC27));
    }

    #[test]
    fn find_device_picks_first_match() {
        let dir = unique_temp_dir("find");
        let sysfs = dir.join("sys");
        fake_hidraw(&sysfs, "hidraw0", "0003:0000046D:0000C52B");
        fake_hidraw(&sysfs, "hidraw1", "0003:000004D8:0000FC27");
        fake_hidraw(&sysfs, "hidraw2", "0003:000004D8:0000FC27");

        let node = find_device_in(&sysfs, Path::new("/dev"), 0x04D8, 0xFC27).unwrap();
        assert_eq!(node, PathBuf::from("/dev/hidraw1"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn find_device_not_found() {
        let dir = unique_temp_dir("missing");
        let sysfs = dir.join("sys");
        fake_hidraw(&sysfs, "hidraw0", "0003:0000046D:0000C52B");

        let err = find_device_in(&sysfs, Path::new("/dev"), 0x04D8, 0xFC27).unwrap_err();
        assert!(matches!(
            err,
            TransportError::NotFound {
                vendor: 0x04D8,
                product: 0xFC27
            }
        ));

        let missing_root = dir.join("no-such-class");
        let err = find_device_in(&missing_root, Path::new("/dev"), 0x04D8, 0xFC27).unwrap_err();
        assert!(matches!(err, TransportError::NotFound { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn read_write_pass_through() {
        let (mut stream, mut peer) = socket_stream();

        stream.write_all(&[0x00, 0x00, 0x01, 0x01, 0x02]).unwrap();
        stream.flush().unwrap();
        let mut sent = [0u8; 5];
        peer.read_exact(&mut sent).unwrap();
        assert_eq!(sent, [0x00, 0x00, 0x01, 0x01, 0x02]);

        peer.write_all(&[2, 0, 0, 0, 7]).unwrap();
        let mut report = [0u8; 5];
        stream.read_exact(&mut report).unwrap();
        assert_eq!(report, [2, 0, 0, 0, 7]);
    }

    #[test]
    fn read_times_out_without_report() {
        let (mut stream, _peer) = socket_stream();
        stream
            .set_read_timeout(Some(Duration::from_millis(20)))
            .unwrap();
        assert_eq!(stream.read_timeout(), Some(Duration::from_millis(20)));

        let mut buf = [0u8; 32];
        let err = stream.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TimedOut);
    }

    #[test]
    fn read_with_timeout_returns_available_report() {
        let (mut stream, mut peer) = socket_stream();
        stream
            .set_read_timeout(Some(Duration::from_millis(500)))
            .unwrap();

        peer.write_all(&[2, 1, 2, 3]).unwrap();
        let mut buf = [0u8; 4];
        let n = stream.read(&mut buf).unwrap();
        assert_eq!(&buf[..n], &[2, 1, 2, 3][..n]);
    }

    #[test]
    fn zero_timeout_rejected() {
        let (mut stream, _peer) = socket_stream();
        let err = stream.set_read_timeout(Some(Duration::ZERO)).unwrap_err();
        assert!(matches!(err, TransportError::Io(ref io) if io.kind() == ErrorKind::InvalidInput));
        assert!(err.io_source().is_some());
    }
}
