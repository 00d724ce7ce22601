//! Asset path handling.
//!
//! Store paths look like `mount/dir/file.png`. They use forward slashes,
//! never start or end with one, and never contain `.` or `..` segments once
//! normalized.

use crate::FetchError;

/// Normalize a raw asset path.
///
/// Backslashes count as separators, empty and `.` segments are dropped and
/// `..` is rejected.
pub fn normalize(raw: &str) -> Result<String, FetchError> {
    let mut out = String::with_capacity(raw.len());
    for segment in raw.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                return Err(FetchError::InvalidPath(format!(
                    "'{raw}' leaves its mount"
                )));
            }
            segment => {
                if !out.is_empty() {
                    out.push('/');
                }
                out.push_str(segment);
            }
        }
    }
    if out.is_empty() {
        return Err(FetchError::InvalidPath(format!("'{raw}' is empty")));
    }
    Ok(out)
}

/// Join a mount root and a relative asset name, then normalize.
pub fn join(root: &str, name: &str) -> Result<String, FetchError> {
    if root.is_empty() {
        normalize(name)
    } else {
        normalize(&format!("{root}/{name}"))
    }
}

/// Split a normalized path into its mount name and the rest.
pub(crate) fn split_mount(path: &str) -> (&str, &str) {
    path.split_once('/').unwrap_or((path, ""))
}
