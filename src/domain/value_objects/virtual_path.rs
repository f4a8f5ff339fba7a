//! Virtual path helpers
//!
//! Virtual paths are application-relative, `/`-separated strings such as
//! `~/Modules/Foo/bin/Foo.dll`. They never contain `\` and never depend on
//! the host platform, so they are handled as plain strings here.

/// Join path segments with a single `/` between them.
///
/// Empty segments are skipped. Leading `/` on the first segment and the
/// `~` prefix are preserved.
pub fn combine<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::new();
    for segment in segments {
        let segment = segment.as_ref();
        if segment.is_empty() {
            continue;
        }
        if out.is_empty() {
            out.push_str(segment.trim_end_matches('/'));
            if out.is_empty() {
                // segment was only slashes
                out.push('/');
            }
            continue;
        }
        let trimmed = segment.trim_matches('/');
        if trimmed.is_empty() {
            continue;
        }
        if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(trimmed);
    }
    out
}

/// Directory part of a virtual path (everything before the last `/`).
pub fn directory_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => "",
    }
}

/// File name part of a virtual path.
pub fn file_name(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

/// File name without its final extension.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(idx) => &name[..idx],
    }
}

/// Final extension of the file name, without the dot.
pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => None,
        Some(idx) => Some(&name[idx + 1..]),
    }
}

/// Strip the `~` / `~/` application-root prefix.
pub fn relative_to_root(path: &str) -> &str {
    let path = path.strip_prefix('~').unwrap_or(path);
    path.trim_start_matches('/')
}
