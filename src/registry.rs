//! Handle and cross-operation state registry.
//!
//! One mutex guards the handle table, the post-close size table, the
//! byte-range lock table and the pending-delete set. It is only ever
//! held across table updates, never across backend I/O; per-stream
//! serialization lives on each [`OpenFile`]'s own operation mutex, which
//! callers acquire only after the registry mutex is released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::path;
use crate::path_map::PathMap;
use crate::vfs::{FsError, FsResult, OpenMode, VfsFile};

/// Handles below this value are reserved so a zeroed driver context can
/// never alias a live handle.
pub const MIN_HANDLE: u64 = 100;

/// Per-open record.
///
/// The embedded mutex is the handle's operation lock: every read, write,
/// flush, truncate and close runs under it, so two driver threads can
/// never interleave on the same stream. The host may dispatch I/O after
/// the cleanup phase closed the stream; the stream is then reopened and
/// swapped in under the held lock via [`OpenFile::rebind`].
pub struct OpenFile {
    path: String,
    mode: OpenMode,
    file: Mutex<Box<dyn VfsFile>>,
}

impl OpenFile {
    /// Canonical path the handle was opened at.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Mode to reopen with after a post-cleanup close.
    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /// Acquire the operation lock.
    pub fn lock(&self) -> MutexGuard<'_, Box<dyn VfsFile>> {
        self.file.lock().expect("operation mutex poisoned")
    }

    /// Swap in a freshly opened stream for a closed one.
    pub fn rebind(guard: &mut Box<dyn VfsFile>, file: Box<dyn VfsFile>) {
        debug_assert!(guard.closed());
        *guard = file;
    }
}

/// Byte-range lock: owner handle and `[start, end)` bytes.
type RangeLock = (u64, u64, u64);

struct State {
    next_handle: u64,
    files: HashMap<u64, Arc<OpenFile>>,
    /// path -> handle -> highest offset+length written through it.
    sizes_written: PathMap<HashMap<u64, u64>>,
    locks: PathMap<Vec<RangeLock>>,
    /// Paths doomed between a delete call and their final cleanup.
    pending_delete: PathMap<()>,
}

/// Thread-safe owner of every piece of cross-operation state. Created at
/// mount, dropped at unmount; nothing here persists.
pub struct Registry {
    state: Mutex<State>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_handle: MIN_HANDLE,
                files: HashMap::new(),
                sizes_written: PathMap::new(),
                locks: PathMap::new(),
                pending_delete: PathMap::new(),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("registry mutex poisoned")
    }

    /// Allocate a handle for an open stream. Handles start at
    /// [`MIN_HANDLE`] and are never reused within a mount session. The
    /// path's size tracking starts at 0.
    pub fn register(&self, file: Box<dyn VfsFile>, path: &str, mode: OpenMode) -> u64 {
        let mut st = self.state();
        let handle = st.next_handle;
        st.next_handle += 1;
        st.files.insert(
            handle,
            Arc::new(OpenFile { path: path.to_owned(), mode, file: Mutex::new(file) }),
        );
        st.sizes_written.set_default(path, HashMap::new()).insert(handle, 0);
        handle
    }

    /// Look up a handle's record.
    pub fn get(&self, handle: u64) -> FsResult<Arc<OpenFile>> {
        self.state().files.get(&handle).cloned().ok_or(FsError::InvalidHandle)
    }

    /// Drop a handle, along with its size-tracking entry. The path's
    /// size table disappears with its last handle.
    pub fn unregister(&self, handle: u64) {
        let mut st = self.state();
        let Some(open) = st.files.remove(&handle) else {
            return;
        };
        let emptied = match st.sizes_written.get_mut(open.path()) {
            Some(per_handle) => {
                per_handle.remove(&handle);
                per_handle.is_empty()
            }
            None => false,
        };
        if emptied {
            st.sizes_written.pop(open.path());
        }
    }

    /// Raise a handle's write high-water mark; never lowers it.
    pub fn record_written(&self, path: &str, handle: u64, end: u64) {
        let mut st = self.state();
        if let Some(slot) = st.sizes_written.get_mut(path).and_then(|m| m.get_mut(&handle)) {
            if end > *slot {
                *slot = end;
            }
        }
    }

    /// Largest size any open handle has written to the path, when the
    /// path is tracked at all.
    pub fn written_size(&self, path: &str) -> Option<u64> {
        self.state().sizes_written.get(path).and_then(|m| m.values().copied().max())
    }

    pub fn mark_pending_delete(&self, path: &str) {
        self.state().pending_delete.set(path, ());
    }

    pub fn clear_pending_delete(&self, path: &str) {
        self.state().pending_delete.pop(path);
    }

    /// True when the path or any ancestor is marked for deletion.
    pub fn is_pending_delete(&self, path: &str) -> bool {
        let st = self.state();
        path::recurse_path(path).iter().any(|p| st.pending_delete.contains(p))
    }

    /// Check `[offset, offset+length)` against the path's locks,
    /// ignoring those owned by `exclude`.
    pub fn lock_conflicts(
        &self,
        path: &str,
        offset: u64,
        length: u64,
        exclude: Option<u64>,
    ) -> bool {
        let st = self.state();
        match st.locks.get(path) {
            Some(locks) => conflicts(locks, offset, length, exclude),
            None => false,
        }
    }

    /// Try to acquire a lock; fails on overlap with another handle's
    /// lock. The requester's own locks never conflict.
    pub fn add_lock(&self, path: &str, owner: u64, offset: u64, length: u64) -> bool {
        let mut st = self.state();
        let locks = st.locks.set_default(path, Vec::new());
        if conflicts(locks, offset, length, Some(owner)) {
            return false;
        }
        locks.push((owner, offset, offset.saturating_add(length)));
        true
    }

    /// Release every lock matching `(owner, offset, offset+length)`
    /// exactly; false when none did.
    pub fn remove_lock(&self, path: &str, owner: u64, offset: u64, length: u64) -> bool {
        let mut st = self.state();
        let Some(locks) = st.locks.get_mut(path) else {
            return false;
        };
        let end = offset.saturating_add(length);
        let before = locks.len();
        locks.retain(|&(o, s, e)| !(o == owner && s == offset && e == end));
        let removed = locks.len() != before;
        let emptied = locks.is_empty();
        if emptied {
            st.locks.pop(path);
        }
        removed
    }
}

fn conflicts(locks: &[RangeLock], offset: u64, length: u64, exclude: Option<u64>) -> bool {
    let end = offset.saturating_add(length);
    locks
        .iter()
        .any(|&(owner, start, stop)| Some(owner) != exclude && start < end && stop > offset)
}
