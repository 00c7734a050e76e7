// Readshelf platform paths for Windows

use std::env;
use std::path::PathBuf;

pub fn get_config_dir() -> PathBuf {
    let roaming = env::var("APPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(roaming).join(super::APP_DIR_NAME)
}

pub fn get_data_dir() -> PathBuf {
    let local = env::var("LOCALAPPDATA")
        .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Local"));
    PathBuf::from(local).join(super::APP_DIR_NAME)
}
