use std::path::Path;

/// Paths whose contents must NEVER be wiped, whatever a pattern expands to.
/// A last line of defense against a bad entry in the target catalog.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/System",
    "/System/Library",
    "/Applications",
    "/Users",
    "/Library",
    "/usr",
    "/bin",
    "/sbin",
    "/var",
    "/etc",
    "/opt",
    "/private",
    "/private/var",
    "/cores",
    "/Volumes",
];

/// Directories under home that must never be wiped
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Movies",
    "Library",
    "Library/Application Support",
    "Applications",
    ".ssh",
    ".gnupg",
];

/// Check if a path is protected, given the operator's home directory
pub fn is_protected(path: &Path, home: &Path) -> bool {
    // Path equality compares components, so a trailing '/' still matches
    if PROTECTED_PATHS.iter().any(|p| path == Path::new(p)) {
        return true;
    }

    PROTECTED_HOME_DIRS.iter().any(|dir| {
        let protected = if dir.is_empty() {
            home.to_path_buf()
        } else {
            home.join(dir)
        };
        path == protected.as_path()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> &'static Path {
        Path::new("/Users/tester")
    }

    #[test]
    fn test_root_is_protected() {
        assert!(is_protected(Path::new("/"), home()));
    }

    #[test]
    fn test_system_dirs_protected() {
        assert!(is_protected(Path::new("/System"), home()));
        assert!(is_protected(Path::new("/Users"), home()));
        assert!(is_protected(Path::new("/Applications"), home()));
        assert!(is_protected(Path::new("/Library"), home()));
        assert!(is_protected(Path::new("/private/var"), home()));
    }

    #[test]
    fn test_home_dir_protected() {
        let home = home();
        assert!(is_protected(home, home));
        assert!(is_protected(&home.join("Desktop"), home));
        assert!(is_protected(&home.join("Documents"), home));
        assert!(is_protected(&home.join("Library"), home));
        assert!(is_protected(&home.join(".ssh"), home));
    }

    #[test]
    fn test_trailing_slash_still_protected() {
        assert!(is_protected(Path::new("/Library/"), home()));
        assert!(is_protected(Path::new("/Users/tester/Documents/"), home()));
    }

    #[test]
    fn test_cache_dirs_not_protected() {
        let home = home();
        assert!(!is_protected(&home.join("Library/Caches"), home));
        assert!(!is_protected(&home.join("Library/Logs"), home));
        assert!(!is_protected(&home.join(".Trash"), home));
        assert!(!is_protected(Path::new("/Library/Caches"), home));
    }

    #[test]
    fn test_tmp_not_protected() {
        assert!(!is_protected(Path::new("/tmp/somefile"), home()));
    }
}
