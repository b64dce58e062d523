//! dokan-vfs - expose a virtual filesystem as a native Windows volume.
//!
//! The adapter sits between a Dokan-style user-mode driver and any
//! backend implementing [`vfs::Vfs`]: the driver delivers NT filesystem
//! callbacks on its own worker threads, the dispatcher in [`ops`] maps
//! them onto the backend, and [`mount`] runs the lifecycle. See
//! [`driver`] for the binding contract a native library has to satisfy.

pub mod driver;
pub mod mount;
pub mod ops;
pub mod path;
pub mod path_map;
pub mod registry;
pub mod safety;
pub mod status;
pub mod time;
pub mod vfs;
pub mod watcher;
