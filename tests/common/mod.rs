#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

use loud_rejection::{Bus, ErrorStream, ExitStatus, Installer, ManualTeardown};

/// In-memory error stream.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// A fresh installer wired to fakes: its own bus, a manual teardown, a
/// private exit status and a captured error stream.
pub struct Harness {
    pub bus: Bus,
    pub teardown: Arc<ManualTeardown>,
    pub status: ExitStatus,
    pub stderr: Captured,
    pub installer: Installer,
}

impl Harness {
    pub fn new() -> Self {
        let bus = Bus::default();
        let teardown = Arc::new(ManualTeardown::new());
        let status = ExitStatus::new();
        let stderr = Captured::default();
        let installer = Installer::new(
            Arc::new(bus.clone()),
            teardown.clone(),
            status.clone(),
            ErrorStream::new(stderr.clone()),
        );
        Self {
            bus,
            teardown,
            status,
            stderr,
            installer,
        }
    }

    /// Mirrors `exit(code)`: assign the code, then run teardown.
    pub fn exit_with(&self, code: i32) -> i32 {
        self.status.set(code);
        self.teardown.fire();
        self.status.get()
    }

    /// Teardown without an explicit code (e.g. the process was killed).
    pub fn kill(&self) -> i32 {
        self.teardown.fire();
        self.status.get()
    }
}
