//! Serial link stand-in for tests: captures writes, serves scripted reads.

use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex};

pub(crate) struct ScriptedLink {
    written: Arc<Mutex<Vec<u8>>>,
    read_data: io::Cursor<Vec<u8>>,
    fail_after: Option<usize>,
    writes: usize,
}

impl ScriptedLink {
    pub(crate) fn new() -> Self {
        Self {
            written: Arc::new(Mutex::new(Vec::new())),
            read_data: io::Cursor::new(Vec::new()),
            fail_after: None,
            writes: 0,
        }
    }

    /// Bytes the channel will be able to read back.
    pub(crate) fn with_read(mut self, data: &str) -> Self {
        self.read_data = io::Cursor::new(data.as_bytes().to_vec());
        self
    }

    /// Writes start failing after `n` successful ones.
    pub(crate) fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Handle that stays valid after the link moves into a channel.
    pub(crate) fn written(&self) -> Arc<Mutex<Vec<u8>>> {
        self.written.clone()
    }

    pub(crate) fn written_text(written: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8_lossy(&written.lock().unwrap()).into_owned()
    }
}

impl Read for ScriptedLink {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.read_data.read(buf)
    }
}

impl Write for ScriptedLink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(limit) = self.fail_after {
            if self.writes >= limit {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "link lost"));
            }
        }
        self.writes += 1;
        self.written.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
