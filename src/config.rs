use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Server base URL used when neither config nor CLI supplies one.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";
/// Branding string carried in save payloads by default.
pub const DEFAULT_LOGO_TEXT: &str = "NoteSpace";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub server: Option<String>,
    pub logo: Option<String>,
    pub draft_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            server: other.server.clone().or_else(|| self.server.clone()),
            logo: other.logo.clone().or_else(|| self.logo.clone()),
            draft_file: other
                .draft_file
                .clone()
                .or_else(|| self.draft_file.clone()),
        }
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("notespace").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("notespace")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("notespace").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("notespace")
                .join("config");
        }
    }

    PathBuf::from(".notespacerc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".notespacerc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# notespace defaults (saved with --save)".to_string());
    if let Some(server) = &flags.server {
        lines.push(format!("--server {server}"));
    }
    if let Some(logo) = &flags.logo {
        lines.push(format!("--logo {logo}"));
    }
    if let Some(path) = &flags.draft_file {
        lines.push(format!("--draft-file {}", path.display()));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--server" {
            if let Some(next) = tokens.get(i + 1) {
                flags.server = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--server=") {
            flags.server = Some(value.to_string());
        } else if token == "--logo" {
            if let Some(next) = tokens.get(i + 1) {
                flags.logo = Some(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--logo=") {
            flags.logo = Some(value.to_string());
        } else if token == "--draft-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.draft_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--draft-file=") {
            flags.draft_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}
