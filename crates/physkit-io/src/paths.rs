//! Textual path helpers.
//!
//! Paths are treated as strings; both `/` and `\` count as separators.

use physkit_types::{PhysError, PhysResult};

fn last_separator(path: &str) -> Option<usize> {
    path.rfind(['/', '\\'])
}

/// Directory part of `path`, or `"."` when there is none.
///
/// ```
/// use physkit_io::paths::dir_name;
/// assert_eq!(dir_name("assets/mesh.obj"), "assets");
/// assert_eq!(dir_name("mesh.obj"), ".");
/// assert_eq!(dir_name("/mesh.obj"), "");
/// ```
pub fn dir_name(path: &str) -> &str {
    match last_separator(path) {
        Some(i) => &path[..i],
        None => ".",
    }
}

/// Final path component.
pub fn file_name_in_path(path: &str) -> &str {
    match last_separator(path) {
        Some(i) => &path[i + 1..],
        None => path,
    }
}

/// Joins `dir` and `relative` with a literal `/`.
pub fn join(dir: &str, relative: &str) -> String {
    format!("{dir}/{relative}")
}

/// Splits `path` at the first `.` of its final component.
///
/// Returns the prefix (everything before that dot) when the suffix is
/// exactly `expected`, a [`PhysError::Format`] otherwise.
pub fn split_suffix<'a>(path: &'a str, expected: &str) -> PhysResult<&'a str> {
    let name_start = last_separator(path).map_or(0, |i| i + 1);
    let dot = path[name_start..]
        .find('.')
        .map(|i| name_start + i)
        .ok_or_else(|| PhysError::Format(format!("'{path}' has no file extension")))?;

    let suffix = &path[dot..];
    if suffix != expected {
        return Err(PhysError::Format(format!(
            "'{path}' is not a {expected} file (suffix '{suffix}')"
        )));
    }
    Ok(&path[..dot])
}
