//! Extra safety when exposing untrusted filesystems on win32.

use std::sync::Arc;
use std::time::SystemTime;

use crate::path;
use crate::vfs::{FsResult, OpenMode, ResourceInfo, Vfs, VfsFile};

/// Wrapper that keeps hostile names away from the host.
///
/// Colons in components are stored as `__colon__`, so ADS-style paths
/// stay representable in any backend. Unless autorun is allowed, a
/// stored `autorun.*` final component surfaces to the host as
/// `_autorun.*` (and the host's `_autorun.*` reaches the stored name),
/// so the active autorun spelling never appears on the mounted volume.
pub struct SafetyFs {
    inner: Arc<dyn Vfs>,
    allow_autorun: bool,
}

impl SafetyFs {
    pub fn new(inner: Arc<dyn Vfs>) -> Self {
        Self { inner, allow_autorun: false }
    }

    /// Skip the autorun renaming; colon escaping stays on.
    pub fn allowing_autorun(inner: Arc<dyn Vfs>) -> Self {
        Self { inner, allow_autorun: true }
    }

    /// Host path to backend path.
    fn encode(&self, p: &str) -> String {
        let p = path::normalize(p).replace(':', "__colon__");
        if self.allow_autorun {
            return p;
        }
        match p.rsplit_once('/') {
            Some((dir, name)) if name.to_ascii_lowercase().starts_with("_autorun.") => {
                format!("{dir}/{}", &name[1..])
            }
            _ => p,
        }
    }

    /// Backend name to host name; applied to listing results.
    fn decode_name(&self, name: &str) -> String {
        let name = name.replace("__colon__", ":");
        if !self.allow_autorun && name.to_ascii_lowercase().starts_with("autorun.") {
            format!("_{name}")
        } else {
            name
        }
    }
}

impl Vfs for SafetyFs {
    fn exists(&self, path: &str) -> bool {
        self.inner.exists(&self.encode(path))
    }

    fn isdir(&self, path: &str) -> bool {
        self.inner.isdir(&self.encode(path))
    }

    fn isfile(&self, path: &str) -> bool {
        self.inner.isfile(&self.encode(path))
    }

    fn make_dir(&self, path: &str) -> FsResult<bool> {
        self.inner.make_dir(&self.encode(path))
    }

    fn open(&self, path: &str, mode: OpenMode) -> FsResult<Box<dyn VfsFile>> {
        self.inner.open(&self.encode(path), mode)
    }

    fn listdir(&self, path: &str) -> FsResult<Vec<String>> {
        let names = self.inner.listdir(&self.encode(path))?;
        Ok(names.iter().map(|name| self.decode_name(name)).collect())
    }

    fn listdirinfo(&self, path: &str) -> FsResult<Vec<(String, ResourceInfo)>> {
        let entries = self.inner.listdirinfo(&self.encode(path))?;
        Ok(entries.into_iter().map(|(name, res)| (self.decode_name(&name), res)).collect())
    }

    fn getinfo(&self, path: &str) -> FsResult<ResourceInfo> {
        self.inner.getinfo(&self.encode(path))
    }

    fn settimes(
        &self,
        path: &str,
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
    ) -> FsResult<()> {
        self.inner.settimes(&self.encode(path), accessed, modified)
    }

    fn remove(&self, path: &str) -> FsResult<()> {
        self.inner.remove(&self.encode(path))
    }

    fn remove_dir(&self, path: &str) -> FsResult<()> {
        self.inner.remove_dir(&self.encode(path))
    }

    fn move_file(&self, src: &str, dst: &str, overwrite: bool) -> FsResult<()> {
        self.inner.move_file(&self.encode(src), &self.encode(dst), overwrite)
    }

    fn move_dir(&self, src: &str, dst: &str, create: bool) -> FsResult<()> {
        self.inner.move_dir(&self.encode(src), &self.encode(dst), create)
    }
}
