// Filesystem path helpers shared by the project locator and lifecycle.

use std::io;
use std::path::{Path, PathBuf};

/// Resolve `path` to an absolute path with symlinks, `.` and `..` removed.
///
/// Fails with [`io::ErrorKind::NotFound`] when any component does not exist.
pub fn canonical_path(path: &Path) -> io::Result<PathBuf> {
    std::fs::canonicalize(path)
}

/// True iff both paths resolve to the same canonical path.
pub fn paths_canonically_equal(a: &Path, b: &Path) -> io::Result<bool> {
    Ok(canonical_path(a)? == canonical_path(b)?)
}

/// The process's current working directory as an absolute path.
pub fn current_dir() -> io::Result<PathBuf> {
    std::env::current_dir()
}

/// Final component of `path` as UTF-8, verbatim. `None` for the filesystem root or
/// for names that are not valid UTF-8.
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|name| name.to_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canonical_path_resolves_dot_segments() {
        let tmp = tempfile::tempdir().expect("tempdir should be created");
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).expect("nested dirs should be created");

        let dotted = tmp.path().join("a").join(".").join("b").join("..").join("b");
        let resolved = canonical_path(&dotted).expect("dotted path should resolve");
        assert_eq!(resolved, canonical_path(&nested).unwrap());
        assert!(resolved.is_absolute());
    }

    #[test]
    fn canonical_path_missing_component_is_not_found() {
        let tmp = tempfile::tempdir().expect("tempdir should be created");
        let error = canonical_path(&tmp.path().join("missing").join("child"))
            .expect_err("missing path should not resolve");
        assert_eq!(error.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_paths_are_canonically_equal() {
        let tmp = tempfile::tempdir().expect("tempdir should be created");
        let target = tmp.path().join("target");
        std::fs::create_dir(&target).unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).expect("symlink should be created");

        assert!(paths_canonically_equal(&target, &link).unwrap());
        assert!(!paths_canonically_equal(&target, tmp.path()).unwrap());
    }

    #[test]
    fn current_dir_is_absolute() {
        assert!(current_dir().unwrap().is_absolute());
    }

    #[test]
    fn base_name_of_regular_directory() {
        assert_eq!(base_name(Path::new("/tmp/my-project")).as_deref(), Some("my-project"));
    }

    #[test]
    fn base_name_keeps_surrounding_whitespace() {
        assert_eq!(base_name(Path::new("/srv/ app ")).as_deref(), Some(" app "));
        assert_eq!(base_name(Path::new("/srv/   ")).as_deref(), Some("   "));
    }

    #[test]
    fn base_name_of_root_is_none() {
        assert_eq!(base_name(Path::new("/")), None);
    }

    proptest! {
        #[test]
        fn canonical_path_is_idempotent(steps in proptest::collection::vec(
            ("[a-z]{1,8}", 0u8..3),
            0..6,
        )) {
            let tmp = tempfile::tempdir().unwrap();
            let mut path = tmp.path().to_path_buf();
            for (name, detour) in &steps {
                path.push(name);
                std::fs::create_dir_all(&path).unwrap();
                match detour {
                    1 => path.push("."),
                    2 => {
                        path.push("..");
                        path.push(name);
                    }
                    _ => {}
                }
            }

            let once = canonical_path(&path).unwrap();
            let twice = canonical_path(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
