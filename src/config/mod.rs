use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConfigFile {
    #[serde(alias = "api_url")]
    pub base_url: Option<String>,
    pub token: Option<String>,
    pub user_name: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    pub assume_yes: Option<bool>,
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".schoolboard").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    r#"# schoolboard config
#
# Location (default):
#   ~/.schoolboard/config.yml
#
# Command-line flags override every value here.

# Backend API root; scripts such as students.php live under it.
base_url: http://localhost/school/api/

# Bearer token issued by the backend login (optional)
# token: ""
# user_name: admin

# Seconds before a request is abandoned
timeout: 15

# HTTP (optional)
# proxy: http://127.0.0.1:8080

# Output: table, text, json or csv
output_format: table
no_color: false

# Skip delete confirmations
assume_yes: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), String> {
    if path.exists() {
        return Ok(());
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_yaml_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost/school/api/"));
        assert_eq!(cfg.timeout, Some(15));
        assert_eq!(cfg.token, None);
        assert_eq!(cfg.assume_yes, Some(false));
    }

    #[test]
    fn missing_file_is_allowed_when_requested() {
        let path = std::env::temp_dir().join("schoolboard-missing-config.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        assert!(load_config(&path, false).is_err());
    }

    #[test]
    fn tilde_expands_to_home() {
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.yml"), home.join("x.yml"));
        }
        assert_eq!(expand_tilde("/etc/x.yml"), PathBuf::from("/etc/x.yml"));
    }
}
