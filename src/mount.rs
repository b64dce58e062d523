//! Mount lifecycle: validation, driver hand-off, readiness, unmount.

mod options;

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{info, warn};

pub use options::MountOptions;

use crate::driver::{Driver, DriverOptions, Operations, MINIMUM_COMPATIBLE_VERSION};
use crate::ops::FsOperations;
use crate::vfs::Vfs;

/// Mount failures surfaced to the caller.
#[derive(Debug)]
pub enum MountError {
    /// Not `X:\` and not an existing empty directory.
    InvalidMountPoint(String),
    /// The driver's main loop returned a non-zero code.
    Driver(i32),
    /// The driver loop ended while the mount point was still unreachable.
    ExitedPrematurely,
    /// The mount point never became reachable.
    Hung,
    /// The driver refused to release the mount point.
    UnmountFailed(String),
}

impl fmt::Display for MountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MountError::InvalidMountPoint(path) => write!(f, "invalid mount point: {path}"),
            MountError::Driver(code) => write!(f, "driver failed with error: {code}"),
            MountError::ExitedPrematurely => write!(f, "driver loop exited prematurely"),
            MountError::Hung => write!(f, "mount never became reachable"),
            MountError::UnmountFailed(path) => {
                write!(f, "filesystem could not be unmounted: {path}")
            }
        }
    }
}

impl std::error::Error for MountError {}

pub type MountResult<T> = Result<T, MountError>;

const READY_POLL_ATTEMPTS: u32 = 100;
const READY_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Per-operation deadline handed to the driver.
const DRIVER_TIMEOUT_MS: u32 = 2000;
const SECTOR_SIZE: u32 = 512;
const ALLOCATION_UNIT_SIZE: u32 = 512;

/// Validate a user-supplied mount point before any driver call: a drive
/// letter in `X:\` form, or an existing empty directory.
pub fn check_mount_point(mount_point: &str) -> MountResult<()> {
    let bytes = mount_point.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && &bytes[1..3] == b":\\" {
        return Ok(());
    }
    let path = Path::new(mount_point);
    let empty_dir = path.is_dir()
        && std::fs::read_dir(path).map(|mut entries| entries.next().is_none()).unwrap_or(false);
    if empty_dir {
        return Ok(());
    }
    Err(MountError::InvalidMountPoint(mount_point.to_owned()))
}

/// Mount `fs` at `mount_point` and run the driver loop on this thread.
///
/// Blocks until the volume is unmounted. `ready_callback` fires from a
/// helper thread once the mount point becomes reachable;
/// `unmount_callback` fires after the loop exits cleanly.
pub fn mount_foreground(
    fs: Arc<dyn Vfs>,
    driver: Arc<dyn Driver>,
    mount_point: &str,
    options: MountOptions,
    ready_callback: Option<Box<dyn FnOnce() + Send>>,
    unmount_callback: Option<Box<dyn FnOnce() + Send>>,
) -> MountResult<()> {
    check_mount_point(mount_point)?;
    let driver_options = driver_options_for(mount_point, &options);
    let operations = Arc::new(FsOperations::new(fs, driver.clone(), &options));
    let table = Operations::bind(operations);

    if let Some(ready) = ready_callback {
        let path = mount_point.to_owned();
        thread::spawn(move || {
            if wait_ready(&path, || false).is_ok() {
                ready();
            }
        });
    }

    info!(mount_point, "entering driver main loop");
    let code = driver.main(&driver_options, table);
    if code != 0 {
        warn!(mount_point, code, "driver main loop failed");
        return Err(MountError::Driver(code));
    }
    info!(mount_point, "driver main loop finished");
    if let Some(callback) = unmount_callback {
        callback();
    }
    Ok(())
}

/// Handle to a mount whose driver loop runs on a background thread.
pub struct MountHandle {
    path: String,
    driver: Arc<dyn Driver>,
    worker: Option<JoinHandle<MountResult<()>>>,
}

impl std::fmt::Debug for MountHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountHandle").field("path", &self.path).finish()
    }
}

impl MountHandle {
    /// The mount point this volume lives at.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Cleanly unmount the volume and join the driver loop.
    pub fn unmount(mut self) -> MountResult<()> {
        if !self.driver.remove_mount_point(&self.path) {
            return Err(MountError::UnmountFailed(self.path.clone()));
        }
        match self.worker.take() {
            Some(worker) => match worker.join() {
                Ok(result) => result,
                Err(panic) => std::panic::resume_unwind(panic),
            },
            None => Ok(()),
        }
    }
}

/// Mount `fs` at `mount_point` on a background thread and wait for the
/// volume to come up.
pub fn mount_background(
    fs: Arc<dyn Vfs>,
    driver: Arc<dyn Driver>,
    mount_point: &str,
    options: MountOptions,
) -> MountResult<MountHandle> {
    check_mount_point(mount_point)?;
    let worker = {
        let driver = driver.clone();
        let mount_point = mount_point.to_owned();
        thread::spawn(move || mount_foreground(fs, driver, &mount_point, options, None, None))
    };
    match wait_ready(mount_point, || worker.is_finished()) {
        Ok(()) => {
            Ok(MountHandle { path: mount_point.to_owned(), driver, worker: Some(worker) })
        }
        Err(err) => {
            // Prefer the loop's own failure over the readiness verdict.
            if worker.is_finished() {
                match worker.join() {
                    Ok(Err(inner)) => return Err(inner),
                    Ok(Ok(())) => return Err(err),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            Err(err)
        }
    }
}

/// Unmount the volume at `mount_point` via the driver.
pub fn unmount(driver: &dyn Driver, mount_point: &str) -> MountResult<()> {
    check_mount_point(mount_point)?;
    if driver.remove_mount_point(mount_point) {
        Ok(())
    } else {
        Err(MountError::UnmountFailed(mount_point.to_owned()))
    }
}

fn driver_options_for(mount_point: &str, options: &MountOptions) -> DriverOptions {
    DriverOptions {
        version: MINIMUM_COMPATIBLE_VERSION,
        thread_count: options.num_threads,
        flags: options.flags,
        mount_point: mount_point.to_owned(),
        timeout_ms: DRIVER_TIMEOUT_MS,
        allocation_unit_size: ALLOCATION_UNIT_SIZE,
        sector_size: SECTOR_SIZE,
    }
}

/// Poll the mount point until it answers a stat, the poll budget runs
/// out, or `exited` reports the driver loop is gone.
fn wait_ready(mount_point: &str, exited: impl Fn() -> bool) -> MountResult<()> {
    for _ in 0..READY_POLL_ATTEMPTS {
        if exited() {
            return Err(MountError::ExitedPrematurely);
        }
        if std::fs::metadata(mount_point).is_ok() {
            return Ok(());
        }
        thread::sleep(READY_POLL_INTERVAL);
    }
    if exited() {
        Err(MountError::ExitedPrematurely)
    } else {
        Err(MountError::Hung)
    }
}
