//! Path resolution for solowork data.
//!
//! Follows the XDG base directory layout: data lives under
//! `$XDG_DATA_HOME/solowork/`, falling back to `~/.local/share/solowork/`.
//! `SOLOWORK_DB` points the store at an explicit database file.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "solowork";
const DB_FILE: &str = "solowork.db";

/// Environment variable overriding the database file location.
pub const DB_ENV_VAR: &str = "SOLOWORK_DB";

/// Get the XDG-compliant data directory.
///
/// When neither `XDG_DATA_HOME` nor `HOME` is set the current directory is
/// used as the base.
pub fn get_data_dir() -> PathBuf {
    data_dir_from(env::var("XDG_DATA_HOME").ok(), env::var("HOME").ok())
}

/// Get the database file path, honouring `SOLOWORK_DB`.
pub fn get_db_path() -> PathBuf {
    match env::var(DB_ENV_VAR) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => get_data_dir().join(DB_FILE),
    }
}

fn data_dir_from(xdg_data_home: Option<String>, home: Option<String>) -> PathBuf {
    let data_home = match (xdg_data_home, home) {
        (Some(xdg), _) if !xdg.is_empty() => PathBuf::from(xdg),
        (_, Some(home)) => PathBuf::from(home).join(".local/share"),
        _ => PathBuf::from("."),
    };
    data_home.join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn data_dir_prefers_xdg_data_home() {
        let dir = data_dir_from(Some("/xdg".into()), Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/xdg/solowork"));
    }

    #[test]
    fn data_dir_falls_back_to_home() {
        let dir = data_dir_from(None, Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/home/me/.local/share/solowork"));

        let dir = data_dir_from(Some(String::new()), Some("/home/me".into()));
        assert_eq!(dir, PathBuf::from("/home/me/.local/share/solowork"));
    }

    #[test]
    fn data_dir_without_any_base_is_relative() {
        assert_eq!(data_dir_from(None, None), PathBuf::from("./solowork"));
    }

    #[test]
    #[serial]
    fn db_path_defaults_to_data_dir() {
        unsafe {
            env::remove_var(DB_ENV_VAR);
        }
        assert_eq!(get_db_path(), get_data_dir().join("solowork.db"));
    }

    #[test]
    #[serial]
    fn db_path_respects_env_var() {
        unsafe {
            env::set_var(DB_ENV_VAR, "/tmp/solowork-env-test.db");
        }

        assert_eq!(get_db_path(), PathBuf::from("/tmp/solowork-env-test.db"));
        assert_eq!(
            crate::db::SqliteConfig::default().path,
            PathBuf::from("/tmp/solowork-env-test.db")
        );

        // Cleanup
        unsafe {
            env::remove_var(DB_ENV_VAR);
        }
    }
}
