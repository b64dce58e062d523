//! User-facing mount options.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::driver::MountFlags;

/// Options accepted by the mount calls, loadable from a TOML document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MountOptions {
    /// Worker threads the driver should spawn (0 = driver default).
    pub num_threads: u16,
    /// Driver switches, spelled as names in config (e.g. `["removable"]`).
    #[serde(with = "flag_names")]
    pub flags: MountFlags,
    /// Filesystem name exposed via volume information.
    pub fs_name: String,
    /// Volume label exposed via volume information.
    pub volume_name: String,
    /// Host directory whose security descriptor templates backend
    /// directories.
    pub security_template_dir: PathBuf,
}

impl Default for MountOptions {
    fn default() -> Self {
        Self {
            num_threads: 0,
            flags: MountFlags::empty(),
            fs_name: "NTFS".to_owned(),
            volume_name: "Dokan Volume".to_owned(),
            security_template_dir: default_security_dir(),
        }
    }
}

impl MountOptions {
    /// Parse options from a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// The user profile mirrors typical volume ACLs well enough to act as
/// the default descriptor template.
fn default_security_dir() -> PathBuf {
    std::env::var_os("USERPROFILE")
        .or_else(|| std::env::var_os("HOME"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

mod flag_names {
    //! Mount flags as a list of lower-case switch names.

    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::driver::MountFlags;

    const NAMES: &[(&str, MountFlags)] = &[
        ("debug", MountFlags::DEBUG),
        ("stderr", MountFlags::STDERR),
        ("alt_stream", MountFlags::ALT_STREAM),
        ("write_protect", MountFlags::WRITE_PROTECT),
        ("network", MountFlags::NETWORK),
        ("removable", MountFlags::REMOVABLE),
        ("mount_manager", MountFlags::MOUNT_MANAGER),
        ("current_session", MountFlags::CURRENT_SESSION),
        ("filelock_user_mode", MountFlags::FILELOCK_USER_MODE),
    ];

    pub fn serialize<S: Serializer>(flags: &MountFlags, ser: S) -> Result<S::Ok, S::Error> {
        let mut seq = ser.serialize_seq(None)?;
        for (name, flag) in NAMES {
            if flags.contains(*flag) {
                seq.serialize_element(name)?;
            }
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<MountFlags, D::Error> {
        let names = Vec::<String>::deserialize(de)?;
        let mut flags = MountFlags::empty();
        for name in &names {
            let Some((_, flag)) = NAMES.iter().find(|(known, _)| known == name) else {
                return Err(serde::de::Error::custom(format!("unknown mount flag: {name}")));
            };
            flags |= *flag;
        }
        Ok(flags)
    }
}
