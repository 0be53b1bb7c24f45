use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The directory-listing capability install discovery needs. Production
/// code goes through [`RealFs`]; tests swap in an in-memory tree.
pub trait DirLister {
    /// Immediate subdirectories of `path`, in no particular order.
    fn subdirs(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;
}

pub struct RealFs;

impl DirLister for RealFs {
    fn subdirs(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut dirs = Vec::new();
        let entries = fs::read_dir(path)?;
        for entry in entries.flatten() {
            let entry_path = entry.path();
            if entry_path.is_dir() {
                dirs.push(entry_path);
            }
        }
        Ok(dirs)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }
}

#[cfg(test)]
pub mod fake {
    use std::collections::BTreeSet;
    use std::io;
    use std::path::{Path, PathBuf};

    use super::DirLister;

    /// In-memory directory tree for locator tests. Registering a path
    /// registers all of its ancestors as directories too.
    #[derive(Default)]
    pub struct FakeFs {
        dirs: BTreeSet<PathBuf>,
        files: BTreeSet<PathBuf>,
    }

    impl FakeFs {
        pub fn new() -> FakeFs {
            FakeFs::default()
        }

        pub fn add_dir(&mut self, path: impl Into<PathBuf>) -> &mut FakeFs {
            let mut path = path.into();
            loop {
                if !self.dirs.insert(path.clone()) {
                    break;
                }
                match path.parent() {
                    Some(parent) if !parent.as_os_str().is_empty() => {
                        path = parent.to_path_buf();
                    }
                    _ => break,
                }
            }
            self
        }

        pub fn add_file(&mut self, path: impl Into<PathBuf>) -> &mut FakeFs {
            let path = path.into();
            if let Some(parent) = path.parent() {
                self.add_dir(parent.to_path_buf());
            }
            self.files.insert(path);
            self
        }
    }

    impl DirLister for FakeFs {
        fn subdirs(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
            if !self.dirs.contains(path) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no such directory"));
            }
            Ok(self
                .dirs
                .iter()
                .filter(|dir| dir.parent() == Some(path))
                .cloned()
                .collect())
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }
    }
}
