//! NT status codes and error translation.
//!
//! Backend errors cross the driver boundary in two steps: the error kind
//! picks a POSIX-style errno, and the errno picks an NT status. Anything
//! without a dedicated status passes through as its raw errno value,
//! which is what the driver's historical contract expects.

use num_derive::{FromPrimitive, ToPrimitive};

use crate::vfs::FsError;

/// 32-bit Windows kernel status; 0 is success.
pub type NtStatus = u32;

pub const STATUS_SUCCESS: NtStatus = 0x0000_0000;
pub const STATUS_NOT_IMPLEMENTED: NtStatus = 0xC000_0002;
pub const STATUS_ACCESS_DENIED: NtStatus = 0xC000_0022;
pub const STATUS_NOT_LOCKED: NtStatus = 0xC000_002A;
pub const STATUS_OBJECT_NAME_NOT_FOUND: NtStatus = 0xC000_0034;
pub const STATUS_OBJECT_NAME_COLLISION: NtStatus = 0xC000_0035;
pub const STATUS_OBJECT_PATH_NOT_FOUND: NtStatus = 0xC000_003A;
pub const STATUS_LOCK_NOT_GRANTED: NtStatus = 0xC000_0055;
pub const STATUS_NOT_SUPPORTED: NtStatus = 0xC000_00BB;
pub const STATUS_DIRECTORY_NOT_EMPTY: NtStatus = 0xC000_0101;
pub const STATUS_BUFFER_OVERFLOW: NtStatus = 0x8000_0005;

/// Win32 error returned when `FILE_CREATE` hits an existing file.
pub const ERROR_ALREADY_EXISTS: NtStatus = 183;

// NT create-action values. ZwCreateFile hands some of these back in
// place of a status; `FILE_DOES_NOT_EXIST` in particular is a numeric 5,
// not a real NT status, and the driver contract depends on it staying
// that way.
pub const FILE_SUPERSEDED: NtStatus = 0;
pub const FILE_OPENED: NtStatus = 1;
pub const FILE_CREATED: NtStatus = 2;
pub const FILE_OVERWRITTEN: NtStatus = 3;
pub const FILE_EXISTS: NtStatus = 4;
pub const FILE_DOES_NOT_EXIST: NtStatus = 5;

/// Errno values as defined by the MSVC C runtime, the only libc the
/// driver side ever sees.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Errno {
    NoEnt = 2,
    Acces = 13,
    Fault = 14,
    Exist = 17,
    Inval = 22,
    NoSpc = 28,
    NoSys = 40,
    NotEmpty = 41,
    NetDown = 116,
}

/// First stage: backend error kind to errno.
pub fn errno_for(err: FsError) -> Errno {
    match err {
        FsError::NotFound => Errno::NoEnt,
        FsError::Invalid => Errno::Inval,
        FsError::PermissionDenied => Errno::Acces,
        // Windows reports a foreign lock as an access failure.
        FsError::Locked => Errno::Acces,
        FsError::NotEmpty => Errno::NotEmpty,
        FsError::AlreadyExists => Errno::Exist,
        FsError::NoSpace => Errno::NoSpc,
        FsError::NetworkDown => Errno::NetDown,
        FsError::Unsupported => Errno::NoSys,
        FsError::InvalidHandle | FsError::Other => Errno::Fault,
    }
}

/// Second stage: errno to NT status; unmapped values pass through raw.
pub fn status_from_errno(errno: Errno) -> NtStatus {
    match errno {
        Errno::Exist => STATUS_OBJECT_NAME_COLLISION,
        Errno::NotEmpty => STATUS_DIRECTORY_NOT_EMPTY,
        Errno::NoSys => STATUS_NOT_SUPPORTED,
        Errno::Acces => STATUS_ACCESS_DENIED,
        other => other as NtStatus,
    }
}

/// Full translation used at the callback boundary.
pub fn status_for(err: FsError) -> NtStatus {
    // A stale handle number has no NT status of its own.
    if err == FsError::InvalidHandle {
        return STATUS_ACCESS_DENIED;
    }
    status_from_errno(errno_for(err))
}
