// Readshelf platform paths for Linux (XDG base directories)

use std::env;
use std::path::PathBuf;

fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    let base = match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
            fallback.iter().fold(PathBuf::from(home), |p, seg| p.join(seg))
        }
    };
    base.join(super::APP_DIR_NAME.to_lowercase())
}

pub fn get_config_dir() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", &[".config"])
}

pub fn get_data_dir() -> PathBuf {
    xdg_dir("XDG_DATA_HOME", &[".local", "share"])
}
