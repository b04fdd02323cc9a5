//! OS-dependent selection of the privilege-elevation command.

/// Returns the elevation command for a host operating-system identifier.
///
/// Accepts both Rust (`macos`, `windows`) and Node-style (`darwin`, `win32`)
/// identifiers. macOS uses `sudo`; Linux and other Unix-likes use `pkexec`.
/// Windows also maps to `pkexec`, inherited from the system this replaces —
/// that is not a working elevation path on Windows and is preserved rather
/// than fixed (see DESIGN.md).
#[must_use]
pub fn elevation_command(os: &str) -> &'static str {
    match os {
        "macos" | "darwin" => "sudo",
        _ => "pkexec",
    }
}

/// Returns the elevation command for the current host.
#[must_use]
pub fn host_elevation_command() -> &'static str {
    elevation_command(std::env::consts::OS)
}

/// Returns whether the given elevation command is present on `PATH`.
#[must_use]
pub fn elevation_available(command: &str) -> bool {
    which::which(command).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darwin_uses_sudo() {
        assert_eq!(elevation_command("darwin"), "sudo");
        assert_eq!(elevation_command("macos"), "sudo");
    }

    #[test]
    fn linux_uses_pkexec() {
        assert_eq!(elevation_command("linux"), "pkexec");
    }

    #[test]
    fn windows_inherits_the_unix_command() {
        // Documented source behavior, not a corrected one.
        assert_eq!(elevation_command("win32"), "pkexec");
        assert_eq!(elevation_command("windows"), "pkexec");
    }

    #[test]
    fn unknown_os_falls_back_to_pkexec() {
        assert_eq!(elevation_command("freebsd"), "pkexec");
    }

    #[test]
    fn host_command_matches_os_mapping() {
        assert_eq!(
            host_elevation_command(),
            elevation_command(std::env::consts::OS)
        );
    }

    #[test]
    fn missing_binary_is_reported_unavailable() {
        assert!(!elevation_available("plens-no-such-elevation-binary"));
    }
}
