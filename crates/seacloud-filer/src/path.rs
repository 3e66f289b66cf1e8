//! Path normalization between the filer's namespace and the external one.
//!
//! The filer stores every user-visible entry under a single root segment
//! (`/buckets/...` by default). Callers never see that segment: external paths
//! start at `/`, use `/` as the only separator and cannot climb above the root.

/// Collapse empty, `.` and `..` segments. `..` at the top is dropped.
fn clean_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

fn join_absolute(segments: &[&str]) -> String {
    format!("/{}", segments.join("/"))
}

/// Normalize an external path: leading slash, no trailing slash, no dot segments.
pub fn normalize(path: &str) -> String {
    join_absolute(&clean_segments(path))
}

/// Convert a remote full path into the external root-relative path.
///
/// The first segment is the filer root and is replaced by `/`.
pub fn strip_root(remote_full_path: &str) -> String {
    let mut segments = remote_full_path
        .split('/')
        .filter(|s| !s.is_empty());
    segments.next();

    let rest: Vec<&str> = segments.collect();
    normalize(&rest.join("/"))
}

/// Place an external path under the filer root segment.
pub fn to_remote(root: &str, path: &str) -> String {
    let root = root.trim_matches('/');
    let segments = clean_segments(path);
    if root.is_empty() {
        return join_absolute(&segments);
    }
    if segments.is_empty() {
        return format!("/{}", root);
    }
    format!("/{}/{}", root, segments.join("/"))
}

/// Leaf segment of a slash-separated path. The root itself has an empty name.
pub fn leaf_name(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
}

/// Join a directory and a file name into a normalized external path.
pub fn join(dir: &str, name: &str) -> String {
    normalize(&format!("{}/{}", dir, name))
}
