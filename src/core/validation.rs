//! Validation for catalog paths and file names
//!
//! Catalog paths are absolute and `/`-separated, with `/` denoting the root.
//! Empty segments are tolerated and ignored, so `//a///b/` resolves the same
//! as `/a/b`. Segments are otherwise opaque: `.` and `..` have no special
//! meaning.

use crate::core::error::{CatalogError, Result};

/// Split an absolute path into its non-empty segments
///
/// # Errors
///
/// Returns `MalformedPath` if the path does not begin with `/`.
///
/// # Examples
///
/// ```
/// use file_catalog::core::validation::split_path;
///
/// assert_eq!(split_path("/home/user1").unwrap(), vec!["home", "user1"]);
/// assert_eq!(split_path("//home//user1/").unwrap(), vec!["home", "user1"]);
/// assert!(split_path("/").unwrap().is_empty());
/// assert!(split_path("home").is_err());
/// ```
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    if !path.starts_with('/') {
        return Err(CatalogError::MalformedPath(path.to_string()));
    }

    Ok(path.split('/').filter(|segment| !segment.is_empty()).collect())
}

/// Validate a file name for attachment under a directory
///
/// A name must be non-empty and must not contain `/`, otherwise the composed
/// full path would not resolve back to the leaf.
pub fn validate_file_name(name: &str) -> Result<()> {
    if name.is_empty() || name.contains('/') {
        return Err(CatalogError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Join segments into a normalized absolute path
///
/// ```
/// use file_catalog::core::validation::join_path;
///
/// assert_eq!(join_path(&["a", "b"]), "/a/b");
/// assert_eq!(join_path(&[]), "/");
/// ```
pub fn join_path(segments: &[&str]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }

    let capacity = segments.iter().map(|s| s.len() + 1).sum();
    let mut path = String::with_capacity(capacity);
    for segment in segments {
        path.push('/');
        path.push_str(segment);
    }
    path
}

/// Compose the full path of a file named `name` inside `dir_segments`
pub fn compose_full_path(dir_segments: &[&str], name: &str) -> String {
    let mut path = join_path(dir_segments);
    if !path.ends_with('/') {
        path.push('/');
    }
    path.push_str(name);
    path
}
