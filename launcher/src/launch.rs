use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use shared::channel::Channel;

#[derive(thiserror::Error, Debug)]
pub enum LaunchError {
    #[error("No {0} client is installed")]
    ExecutableNotFound(Channel),
    #[error("Failed to start {0}: {1}")]
    SpawnFailed(PathBuf, std::io::Error),
}

/// Start the first discovered executable for the channel and detach.
/// Browser mode is the default; app mode adds the standalone-app switch
/// the 2020/2021 players understand.
pub fn launch(
    channel: Channel,
    app_mode: bool,
    executables: &[PathBuf],
) -> Result<(), LaunchError> {
    let exe = executables
        .first()
        .ok_or(LaunchError::ExecutableNotFound(channel))?;
    if executables.len() > 1 {
        debug!(
            "Multiple {} executables found, using the first of {:?}",
            channel, executables
        );
    }

    let mut cmd = build_command(exe, app_mode);
    debug!("Launching {:?}", cmd);
    cmd.spawn()
        .map_err(|err| LaunchError::SpawnFailed(exe.clone(), err))?;
    Ok(())
}

#[cfg(target_os = "windows")]
fn build_command(exe: &Path, app_mode: bool) -> Command {
    let mut cmd = Command::new(exe);
    if app_mode {
        cmd.arg("--app");
    }
    cmd
}

#[cfg(not(target_os = "windows"))]
fn build_command(exe: &Path, app_mode: bool) -> Command {
    let mut cmd = Command::new(crate::compat::get_wine_command());
    cmd.arg(exe);
    if app_mode {
        cmd.arg("--app");
    }
    if cfg!(target_os = "linux") {
        // ask PRIME systems for the discrete GPU
        cmd.env("__NV_PRIME_RENDER_OFFLOAD", "1");
        cmd.env("__GLX_VENDOR_LIBRARY_NAME", "nvidia");
    }
    cmd
}
