//! The operation dispatcher.
//!
//! One method per driver callback, grouped by area in the submodules.
//! Every method returns [`OpResult`]: a status for the driver, or a
//! backend error still to be translated. [`Operations::bind`] in
//! [`table`] wraps each method uniformly, arming the timeout watcher for
//! the duration of the call and mapping errors at the boundary. Anything
//! that is neither a status nor a backend error panics through to the
//! driver's thread pool, where it belongs.

mod create;
mod find;
mod locks;
mod metadata;
mod read_write;
mod remove;
mod table;
mod volume;

use std::path::PathBuf;
use std::sync::Arc;

use crate::driver::{Driver, RequestInfo};
use crate::mount::MountOptions;
use crate::registry::Registry;
use crate::status::{self, NtStatus};
use crate::vfs::{FsResult, Vfs};
use crate::watcher::TimeoutWatcher;

/// Callback outcome before boundary translation.
pub(crate) type OpResult = FsResult<NtStatus>;

/// Shared state behind every callback of one mount session.
pub struct FsOperations {
    pub(crate) fs: Arc<dyn Vfs>,
    pub(crate) driver: Arc<dyn Driver>,
    pub(crate) registry: Registry,
    watcher: TimeoutWatcher,
    pub(crate) fs_name: String,
    pub(crate) volume_name: String,
    pub(crate) security_template_dir: PathBuf,
}

impl FsOperations {
    pub fn new(fs: Arc<dyn Vfs>, driver: Arc<dyn Driver>, options: &MountOptions) -> Self {
        Self {
            watcher: TimeoutWatcher::new(driver.clone()),
            fs,
            driver,
            registry: Registry::new(),
            fs_name: options.fs_name.clone(),
            volume_name: options.volume_name.clone(),
            security_template_dir: options.security_template_dir.clone(),
        }
    }

    /// Uniform callback boundary: keep the watcher armed for the whole
    /// call and turn backend errors into NT statuses.
    pub(crate) fn guarded(&self, request: RequestInfo, body: impl FnOnce() -> OpResult) -> NtStatus {
        let _watch = self.watcher.watch(request);
        match body() {
            Ok(code) => code,
            Err(err) => status::status_for(err),
        }
    }
}
