use std::path::{Path, PathBuf};

use log::debug;

use crate::channel::{Channel, PLAYER_EXECUTABLE, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME};
use crate::files::{DirLister, RealFs};
use crate::platform::{Platform, UserEnv};

/// Product families the launcher manages. Each family keeps its own
/// Versions root per install location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    ProjectX,
    Pekora,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::ProjectX, Family::Pekora];

    pub fn dir_name(self) -> &'static str {
        match self {
            Family::ProjectX => "ProjectX",
            Family::Pekora => "Pekora",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRoot {
    pub family: Family,
    pub path: PathBuf,
}

/// A concrete place the FastFlag overlay can be written to: one channel
/// folder of one installed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub channel: Channel,
    pub settings_dir: PathBuf,
    pub settings_path: PathBuf,
}

pub struct InstallFinder<F: DirLister> {
    platform: Platform,
    env: UserEnv,
    fs: F,
}

fn wine_versions_root(prefix: &Path, user: &str, family: Family) -> PathBuf {
    prefix
        .join("drive_c")
        .join("users")
        .join(user)
        .join("AppData")
        .join("Local")
        .join(family.dir_name())
        .join("Versions")
}

impl InstallFinder<RealFs> {
    pub fn for_host() -> InstallFinder<RealFs> {
        InstallFinder::new(Platform::current(), UserEnv::from_env(), RealFs)
    }
}

impl<F: DirLister> InstallFinder<F> {
    pub fn new(platform: Platform, env: UserEnv, fs: F) -> InstallFinder<F> {
        InstallFinder { platform, env, fs }
    }

    /// Candidate Versions roots for the platform, ProjectX before Pekora.
    /// Candidates are not required to exist; version listing skips the
    /// ones that do not.
    pub fn get_version_roots(&self) -> Vec<VersionRoot> {
        let mut roots = Vec::new();
        match self.platform {
            Platform::Windows => {
                if let Some(local_app_data) = &self.env.local_app_data {
                    for family in Family::ALL {
                        roots.push(VersionRoot {
                            family,
                            path: local_app_data.join(family.dir_name()).join("Versions"),
                        });
                    }
                }
            }
            Platform::Linux => {
                if let Some(home) = &self.env.home {
                    let prefix = home.join(".wine");
                    for family in Family::ALL {
                        roots.push(VersionRoot {
                            family,
                            path: wine_versions_root(&prefix, &self.env.user_name, family),
                        });
                    }
                }
            }
            Platform::Macos => {
                if let Some(home) = &self.env.home {
                    let prefix = home.join(".wine");
                    for family in Family::ALL {
                        roots.push(VersionRoot {
                            family,
                            path: wine_versions_root(&prefix, &self.env.user_name, family),
                        });
                    }

                    // CrossOver keeps one wine prefix per bottle
                    let bottles_dir = home.join("Library/Application Support/CrossOver/Bottles");
                    let mut bottles = self.fs.subdirs(&bottles_dir).unwrap_or_default();
                    bottles.sort();
                    for family in Family::ALL {
                        for bottle in &bottles {
                            roots.push(VersionRoot {
                                family,
                                path: wine_versions_root(bottle, &self.env.user_name, family),
                            });
                        }
                    }
                }
            }
        }
        roots
    }

    /// Installed version directories across every root, listed fresh from
    /// the filesystem on each call. Missing roots yield nothing.
    pub fn get_version_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        for root in self.get_version_roots() {
            if !self.fs.is_dir(&root.path) {
                continue;
            }
            match self.fs.subdirs(&root.path) {
                Ok(mut children) => {
                    children.sort();
                    dirs.extend(children);
                }
                Err(err) => debug!("Skipping unreadable root {:?}: {}", root.path, err),
            }
        }
        dirs
    }

    /// Pair every installed version with every requested channel whose
    /// folder is present. The settings file itself is not required to
    /// exist yet; writing it is the applier's job.
    pub fn get_settings_targets(&self, channels: &[Channel]) -> Vec<ResolvedTarget> {
        let mut targets = Vec::new();
        for version_dir in self.get_version_dirs() {
            for &channel in channels {
                let channel_dir = version_dir.join(channel.folder_name());
                if !self.fs.is_dir(&channel_dir) {
                    continue;
                }
                let settings_dir = channel_dir.join(SETTINGS_DIR_NAME);
                let settings_path = settings_dir.join(SETTINGS_FILE_NAME);
                targets.push(ResolvedTarget {
                    channel,
                    settings_dir,
                    settings_path,
                });
            }
        }
        targets
    }

    /// Every existing player executable for the channel, in enumeration
    /// order. Launch takes the first one.
    pub fn get_executable_paths(&self, channel: Channel) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for version_dir in self.get_version_dirs() {
            let exe = version_dir
                .join(channel.executable_folder())
                .join(PLAYER_EXECUTABLE);
            if self.fs.is_file(&exe) {
                paths.push(exe);
            }
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::fake::FakeFs;

    fn wine_env() -> UserEnv {
        UserEnv {
            home: Some(PathBuf::from("/home/kiko")),
            user_name: "kiko".to_string(),
            local_app_data: None,
        }
    }

    #[test]
    fn test_windows_roots() {
        let env = UserEnv {
            home: None,
            user_name: "user".to_string(),
            local_app_data: Some(PathBuf::from("/win/AppData/Local")),
        };
        let finder = InstallFinder::new(Platform::Windows, env, FakeFs::new());
        let roots = finder.get_version_roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].family, Family::ProjectX);
        assert_eq!(roots[0].path, PathBuf::from("/win/AppData/Local/ProjectX/Versions"));
        assert_eq!(roots[1].family, Family::Pekora);
        assert_eq!(roots[1].path, PathBuf::from("/win/AppData/Local/Pekora/Versions"));
    }

    #[test]
    fn test_windows_roots_without_local_app_data() {
        let env = UserEnv {
            home: None,
            user_name: "user".to_string(),
            local_app_data: None,
        };
        let finder = InstallFinder::new(Platform::Windows, env, FakeFs::new());
        assert!(finder.get_version_roots().is_empty());
    }

    #[test]
    fn test_linux_wine_roots() {
        let finder = InstallFinder::new(Platform::Linux, wine_env(), FakeFs::new());
        let roots = finder.get_version_roots();
        assert_eq!(roots.len(), 2);
        assert_eq!(
            roots[0].path,
            PathBuf::from("/home/kiko/.wine/drive_c/users/kiko/AppData/Local/ProjectX/Versions")
        );
        assert_eq!(
            roots[1].path,
            PathBuf::from("/home/kiko/.wine/drive_c/users/kiko/AppData/Local/Pekora/Versions")
        );
    }

    #[test]
    fn test_macos_bottle_roots_are_sorted_and_family_major() {
        let mut fs = FakeFs::new();
        fs.add_dir("/home/kiko/Library/Application Support/CrossOver/Bottles/Main");
        fs.add_dir("/home/kiko/Library/Application Support/CrossOver/Bottles/Alt");
        let finder = InstallFinder::new(Platform::Macos, wine_env(), fs);

        let roots = finder.get_version_roots();
        // 2 for ~/.wine plus one per family per bottle
        assert_eq!(roots.len(), 6);
        assert_eq!(roots[0].family, Family::ProjectX);
        assert!(roots[0].path.starts_with("/home/kiko/.wine"));
        assert!(roots[2]
            .path
            .starts_with("/home/kiko/Library/Application Support/CrossOver/Bottles/Alt"));
        assert_eq!(roots[2].family, Family::ProjectX);
        assert!(roots[3]
            .path
            .starts_with("/home/kiko/Library/Application Support/CrossOver/Bottles/Main"));
        assert_eq!(roots[4].family, Family::Pekora);
        assert!(roots[4]
            .path
            .starts_with("/home/kiko/Library/Application Support/CrossOver/Bottles/Alt"));
    }

    #[test]
    fn test_version_dirs_sorted_and_missing_roots_skipped() {
        let mut fs = FakeFs::new();
        let root = "/home/kiko/.wine/drive_c/users/kiko/AppData/Local/ProjectX/Versions";
        fs.add_dir(format!("{root}/version-b"));
        fs.add_dir(format!("{root}/version-a"));
        // Pekora root intentionally absent
        let finder = InstallFinder::new(Platform::Linux, wine_env(), fs);

        let dirs = finder.get_version_dirs();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from(format!("{root}/version-a")),
                PathBuf::from(format!("{root}/version-b")),
            ]
        );
    }

    #[test]
    fn test_settings_targets_require_channel_folder_only() {
        let mut fs = FakeFs::new();
        let root = "/home/kiko/.wine/drive_c/users/kiko/AppData/Local/ProjectX/Versions";
        fs.add_dir(format!("{root}/version-a/2020L"));
        fs.add_dir(format!("{root}/version-a/2017"));
        fs.add_dir(format!("{root}/version-b/2021M"));
        let finder = InstallFinder::new(Platform::Linux, wine_env(), fs);

        let targets = finder.get_settings_targets(&Channel::SETTINGS_CAPABLE);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].channel, Channel::V2020);
        assert_eq!(
            targets[0].settings_path,
            PathBuf::from(format!(
                "{root}/version-a/2020L/ClientSettings/ClientAppSettings.json"
            ))
        );
        assert_eq!(targets[1].channel, Channel::V2021);
        assert_eq!(
            targets[1].settings_dir,
            PathBuf::from(format!("{root}/version-b/2021M/ClientSettings"))
        );
    }

    #[test]
    fn test_executable_paths_use_legacy_sibling_folder() {
        let mut fs = FakeFs::new();
        let root = "/home/kiko/.wine/drive_c/users/kiko/AppData/Local/Pekora/Versions";
        fs.add_file(format!("{root}/version-a/2017L/ProjectXPlayerBeta.exe"));
        // a bare 2017 folder holds no executable
        fs.add_dir(format!("{root}/version-a/2017"));
        fs.add_file(format!("{root}/version-b/2020L/ProjectXPlayerBeta.exe"));
        let finder = InstallFinder::new(Platform::Linux, wine_env(), fs);

        let legacy = finder.get_executable_paths(Channel::V2017);
        assert_eq!(
            legacy,
            vec![PathBuf::from(format!(
                "{root}/version-a/2017L/ProjectXPlayerBeta.exe"
            ))]
        );

        let modern = finder.get_executable_paths(Channel::V2020);
        assert_eq!(
            modern,
            vec![PathBuf::from(format!(
                "{root}/version-b/2020L/ProjectXPlayerBeta.exe"
            ))]
        );

        assert!(finder.get_executable_paths(Channel::V2021).is_empty());
    }
}
