//! Directory relativization between module base directories.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` segments and resolve `..` against
/// the preceding segment. The filesystem is never consulted.
///
/// `..` at the root of an absolute path is discarded; leading `..` of a
/// relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Make `path` absolute against the current directory, then normalize it.
///
/// An empty path means the current directory. Falls back to the normalized
/// input when the current directory cannot be determined.
pub fn absolutize(path: &Path) -> PathBuf {
    let path = if path.as_os_str().is_empty() {
        Path::new(".")
    } else {
        path
    };
    match std::path::absolute(path) {
        Ok(abs) => normalize(&abs),
        Err(e) => {
            log::warn!("Cannot make {} absolute: {}", path.display(), e);
            normalize(path)
        }
    }
}

/// Express `target` relative to `base`, using `/` as separator.
///
/// Returns `Some("")` when both denote the same directory and `None` when
/// `target` is not at or below `base`. Containment is decided per path
/// component, so `/proj/ab` is not below `/proj/a`.
///
/// An absolute and a relative path never contain each other, and a result
/// that would climb out of `base` through `..` is `None`. Components that
/// are not valid UTF-8 also yield `None`.
pub fn relativize(base: &Path, target: &Path) -> Option<String> {
    let base = normalize(base);
    let target = normalize(target);
    if base.has_root() != target.has_root() {
        return None;
    }
    let rest = target.strip_prefix(&base).ok()?;

    let mut segments: Vec<&str> = Vec::new();
    for component in rest.components() {
        match component {
            Component::Normal(name) => segments.push(name.to_str()?),
            _ => return None,
        }
    }
    Some(segments.join("/"))
}
