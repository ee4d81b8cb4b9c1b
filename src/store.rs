use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::network::{Endpoint, NetworkProfile};

/// On-disk shape of the config file, before validation.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    rpc: Endpoint,
    networks: BTreeMap<String, NetworkProfile>,
}

/// Read-only network configuration: the default rpc endpoint and the
/// named deployment profiles.
///
/// A store only exists fully validated. Lookups never mutate it, so a
/// shared reference can be handed to any number of readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile")]
pub struct ConfigStore {
    rpc: Endpoint,
    networks: BTreeMap<String, NetworkProfile>,
}

impl TryFrom<ConfigFile> for ConfigStore {
    type Error = ConfigError;

    fn try_from(file: ConfigFile) -> Result<Self, Self::Error> {
        ConfigStore::from_file(file)
    }
}

impl ConfigStore {
    /// Builds a store from an rpc endpoint and a set of profiles, keyed by
    /// each profile's `name`.
    pub fn new(
        rpc: Endpoint,
        profiles: impl IntoIterator<Item = NetworkProfile>,
    ) -> Result<Self, ConfigError> {
        rpc.validate("rpc")?;
        let mut networks = BTreeMap::new();
        for profile in profiles {
            profile.validate()?;
            if networks.contains_key(&profile.name) {
                return Err(ConfigError::invalid(format!(
                    "network `{}` is defined twice",
                    profile.name
                )));
            }
            networks.insert(profile.name.clone(), profile);
        }
        Ok(ConfigStore { rpc, networks })
    }

    /// Parses a config in JSON form.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_json::from_str(s)?;
        Self::from_file(file)
    }

    /// Parses a config in TOML form.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        Self::from_file(file)
    }

    /// Reads a config file, picking the format from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&contents)?,
            Some("toml") => Self::from_toml_str(&contents)?,
            _ => {
                return Err(ConfigError::invalid(format!(
                    "{}: unsupported config format, expected .json or .toml",
                    path.display()
                )))
            }
        };
        debug!(
            path = %path.display(),
            networks = store.networks.len(),
            "loaded network config"
        );
        Ok(store)
    }

    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        // map values carry no name of their own
        let profiles = file.networks.into_iter().map(|(name, mut profile)| {
            profile.name = name;
            profile
        });
        Self::new(file.rpc, profiles)
    }

    /// The default rpc endpoint.
    pub fn get_rpc_endpoint(&self) -> &Endpoint {
        &self.rpc
    }

    /// The profile configured under `name`.
    pub fn get_network(&self, name: &str) -> Result<&NetworkProfile, ConfigError> {
        match self.networks.get(name) {
            Some(profile) => {
                debug!(network = name, network_id = %profile.network_id, "selected network");
                Ok(profile)
            }
            None => {
                warn!(network = name, "network is not configured");
                Err(ConfigError::not_found(name))
            }
        }
    }

    /// All configured network names, in lexical order.
    pub fn list_network_names(&self) -> Vec<&str> {
        self.networks.keys().map(String::as_str).collect()
    }

    pub fn networks(&self) -> impl Iterator<Item = &NetworkProfile> {
        self.networks.values()
    }

    /// Checks that every name the caller is going to select from exists.
    pub fn require<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Result<(), ConfigError> {
        for name in names {
            if !self.networks.contains_key(name) {
                return Err(ConfigError::not_found(name));
            }
        }
        Ok(())
    }

    /// Renders the store back into the config file format.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
