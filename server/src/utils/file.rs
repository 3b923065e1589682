//! File utility functions

use std::path::PathBuf;

/// Expand a config path argument to an absolute path.
///
/// `~` and `~/...` resolve against the home directory; relative paths and
/// bare names resolve against the current directory.
///
/// ```text
/// expand_path("~/.surveyseat/surveyseat.json") // -> /home/user/.surveyseat/surveyseat.json
/// expand_path("./surveyseat.json")             // -> /current/dir/surveyseat.json
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();

    if path.is_empty() {
        return std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    }

    let expanded = match path.strip_prefix('~') {
        Some("") => dirs::home_dir().unwrap_or_else(|| PathBuf::from(path)),
        Some(rest) if rest.starts_with('/') || rest.starts_with('\\') => dirs::home_dir()
            .map(|home| home.join(&rest[1..]))
            .unwrap_or_else(|| PathBuf::from(path)),
        _ => PathBuf::from(path),
    };

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_absolute_unchanged() {
        assert_eq!(
            expand_path("/etc/surveyseat.json"),
            PathBuf::from("/etc/surveyseat.json")
        );
    }

    #[test]
    fn test_relative_joins_cwd() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            expand_path("./surveyseat.json"),
            cwd.join("./surveyseat.json")
        );
        assert_eq!(expand_path("conf.json"), cwd.join("conf.json"));
    }

    #[test]
    fn test_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home);
            assert_eq!(
                expand_path("~/.surveyseat/surveyseat.json"),
                home.join(".surveyseat/surveyseat.json")
            );
        }
    }

    #[test]
    fn test_tilde_user_form_not_expanded() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("~other"), cwd.join("~other"));
    }

    #[test]
    fn test_trims_and_empty() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(expand_path("  conf.json  "), cwd.join("conf.json"));
        assert_eq!(expand_path("   "), cwd);
    }
}
