use std::process::Command;

/// The wine binary to run the Windows players with: wine64 when it
/// answers a version probe, plain wine otherwise.
pub fn get_wine_command() -> &'static str {
    if probe("wine64") {
        "wine64"
    } else {
        "wine"
    }
}

fn probe(command: &str) -> bool {
    Command::new(command)
        .arg("--version")
        .output()
        .map(|output| output.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_rejects_missing_binaries() {
        assert!(!probe("definitely-not-a-wine-binary"));
    }
}
