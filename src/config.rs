use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::discovery::ServiceDetails;
use crate::warn;

#[derive(Debug, Error)]
pub(crate) enum Error {
    #[error("failed to read config \"{}\": {}", .0.display(), .1)]
    Read(PathBuf, #[source] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to reserialize config: {0}")]
    Reserialize(#[from] toml::ser::Error),
}

/// A model registry service declared in the static catalog.
#[derive(Deserialize, Serialize, Default, Debug, Clone)]
pub(crate) struct ServiceEntry {
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    pub cluster_ip: String,
    pub http_port: i32,
    #[serde(default)]
    pub is_https: bool,
    #[serde(default)]
    pub external_address_rest: Option<String>,
}

impl From<&ServiceEntry> for ServiceDetails {
    fn from(value: &ServiceEntry) -> Self {
        ServiceDetails {
            name: value.name.clone(),
            description: value.description.clone(),
            display_name: value.display_name.clone(),
            cluster_ip: value.cluster_ip.clone(),
            http_port: value.http_port,
            is_https: value.is_https,
            external_address_rest: value.external_address_rest.clone().unwrap_or_default(),
        }
    }
}

#[derive(Deserialize, Serialize, Default, Debug)]
pub(crate) struct Config {
    /// Namespace used when none is given on the command line
    pub namespace: Option<String>,
    /// Resolve external addresses unless told otherwise
    #[serde(default)]
    pub federated: bool,
    #[serde(default)]
    pub services: Vec<ServiceEntry>,
}

fn get_config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME");

    if let Some(home) = home {
        let home = PathBuf::from(home);

        const USER_PATHS: [&str; 2] = [".config/modelreg/config.toml", ".modelreg.toml"];

        for &path in USER_PATHS.iter() {
            let fullpath = home.join(path);

            if fullpath.exists() {
                return Some(fullpath);
            }
        }
    }

    let system_config = PathBuf::from("/etc/modelreg.toml");

    if system_config.exists() {
        Some(system_config)
    } else {
        None
    }
}

/// Collects the dotted paths of keys in `user_config` that `config` lacks.
/// Arrays of tables are walked element by element.
fn extra_fields_helper(
    path: &mut Vec<String>,
    user_value: &toml::Value,
    config_value: &toml::Value,
    extra: &mut Vec<String>,
) {
    match (user_value, config_value) {
        (toml::Value::Table(user_table), toml::Value::Table(config_table)) => {
            for (user_key, user_value) in user_table {
                path.push(user_key.clone());

                match config_table.get(user_key) {
                    Some(config_value) => {
                        extra_fields_helper(path, user_value, config_value, extra)
                    }
                    None => extra.push(path.join(".")),
                }

                path.pop();
            }
        }
        (toml::Value::Array(user_array), toml::Value::Array(config_array)) => {
            for (i, (user_value, config_value)) in
                user_array.iter().zip(config_array.iter()).enumerate()
            {
                path.push(i.to_string());
                extra_fields_helper(path, user_value, config_value, extra);
                path.pop();
            }
        }
        _ => {}
    }
}

fn extra_fields(config: &Config, raw_config: &str) -> Result<Vec<String>, Error> {
    let user_config: toml::Table = toml::from_str(raw_config)?;
    let config: toml::Table = toml::from_str(&toml::to_string(config)?)?;

    let mut path = Vec::new();
    let mut extra = Vec::new();

    extra_fields_helper(
        &mut path,
        &toml::Value::Table(user_config),
        &toml::Value::Table(config),
        &mut extra,
    );

    Ok(extra)
}

pub(crate) fn parse_config(raw_config: &str) -> Result<Config, Error> {
    let config: Config = toml::from_str(raw_config)?;

    for key in extra_fields(&config, raw_config)? {
        warn!("config contains extraneous key \"{}\", ignoring", key);
    }

    Ok(config)
}

fn read_config_at(path: &Path) -> Result<Config, Error> {
    let raw_config =
        std::fs::read_to_string(path).map_err(|e| Error::Read(path.to_path_buf(), e))?;

    parse_config(&raw_config)
}

/// Reads the config at `config`, or at the first of the default locations that
/// exists. Without a config file the defaults apply.
pub(crate) fn read_config(config: Option<PathBuf>) -> Result<Config, Error> {
    match config.or_else(get_config_path) {
        Some(path) => read_config_at(&path),
        None => Ok(Config::default()),
    }
}
