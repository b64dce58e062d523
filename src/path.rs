//! Canonical path handling.
//!
//! The driver hands over paths in Windows form (backslash separated,
//! rooted at the volume). The backend only ever sees the canonical form:
//! leading slash, forward slashes, `.` and `..` resolved. Every callback
//! normalizes its path argument before touching any table or the backend.

/// Convert a host path to canonical form.
///
/// Backslashes and slashes both separate components, empty and `.`
/// components disappear, and `..` pops the previous component (clamped at
/// the root, since nothing the driver sends can legally escape the
/// volume). The result always starts with `/`; the root itself is `"/"`.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for comp in path.split(['/', '\\']) {
        match comp {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            name => parts.push(name),
        }
    }
    if parts.is_empty() {
        "/".to_owned()
    } else {
        let mut out = String::with_capacity(path.len() + 1);
        for part in parts {
            out.push('/');
            out.push_str(part);
        }
        out
    }
}

/// Components of the canonical form of `path`, root first.
pub fn components(path: &str) -> Vec<String> {
    normalize(path)
        .split('/')
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Join a child name onto a canonical directory path.
pub fn combine(parent: &str, name: &str) -> String {
    if parent.ends_with('/') {
        format!("{parent}{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Final component of a canonical path; empty for the root.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or("")
}

/// Every ancestor of `path` from the root down, including `path` itself.
///
/// `"/a/b"` yields `["/", "/a", "/a/b"]`. Drives the pending-delete
/// prefix test: a path is doomed as soon as any ancestor is marked.
pub fn recurse_path(path: &str) -> Vec<String> {
    let mut out = vec!["/".to_owned()];
    let mut current = String::new();
    for comp in components(path) {
        current.push('/');
        current.push_str(&comp);
        out.push(current.clone());
    }
    out
}
