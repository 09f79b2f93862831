//! Output sinks: where generated module text is persisted.
//!
//! The builder writes once per regeneration and once per component
//! registration. It never reads back what it wrote.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

pub trait OutputSink {
    fn write(&mut self, path: &Path, text: &str) -> io::Result<()>;
}

/// Writes UTF-8 files, creating missing parent directories first.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsSink;

impl OutputSink for FsSink {
    fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, text)
    }
}

/// Records writes in memory. Clones share the same storage, so a caller can
/// keep a handle while the builder owns another.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    files: Rc<RefCell<BTreeMap<PathBuf, String>>>,
    writes: Rc<RefCell<usize>>,
    fail_with: Option<io::ErrorKind>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every write fails with `kind`.
    pub fn failing(kind: io::ErrorKind) -> Self {
        MemorySink {
            fail_with: Some(kind),
            ..Self::default()
        }
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        self.files.borrow().get(path.as_ref()).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.borrow().keys().cloned().collect()
    }

    /// Number of writes attempted, including overwrites and failures.
    pub fn write_count(&self) -> usize {
        *self.writes.borrow()
    }
}

impl OutputSink for MemorySink {
    fn write(&mut self, path: &Path, text: &str) -> io::Result<()> {
        *self.writes.borrow_mut() += 1;
        if let Some(kind) = self.fail_with {
            return Err(io::Error::new(
                kind,
                format!("write to {} rejected", path.display()),
            ));
        }
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), text.to_string());
        Ok(())
    }
}
