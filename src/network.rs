//! Connection parameters for one deployment target.
//!
//! These types mirror the shape of the network config file one to one.
//! Optional keys stay optional: an absent `from` and an empty `from` are
//! different values, and `gas` is simply missing unless set.

use std::fmt;

use alloy::primitives::Address;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Textual marker for a network id that accepts any chain.
pub const WILDCARD: &str = "*";

/// A port as written in the config file.
///
/// The `rpc` block quotes its port while network profiles use a bare
/// integer, and both are kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Port {
    Number(u16),
    Text(String),
}

impl Port {
    /// Resolves the port to a number, if it is one.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Port::Number(n) => Some(*n),
            Port::Text(s) => s.parse().ok(),
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Number(n) => write!(f, "{}", n),
            Port::Text(s) => f.write_str(s),
        }
    }
}

impl From<u16> for Port {
    fn from(n: u16) -> Self {
        Port::Number(n)
    }
}

impl From<&str> for Port {
    fn from(s: &str) -> Self {
        Port::Text(s.to_string())
    }
}

/// Host/port pair of the default rpc node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    pub host: String,
    pub port: Port,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: impl Into<Port>) -> Self {
        Endpoint {
            host: host.into(),
            port: port.into(),
        }
    }

    /// JSON-RPC url for this endpoint, e.g. `http://localhost:8545`.
    /// IPv6 hosts are bracketed.
    pub fn url(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }

    pub(crate) fn validate(&self, what: &str) -> Result<(), ConfigError> {
        check_host(&self.host, what)?;
        match self.port.as_u16() {
            Some(0) | None => Err(ConfigError::invalid(format!(
                "{}: port `{}` is not a valid port number",
                what, self.port
            ))),
            Some(_) => Ok(()),
        }
    }
}

/// Chain selector of a profile: a concrete id, or any chain.
///
/// A quoted numeric id such as `"4"` loads as `Numeric(4)` and is written
/// back as the bare integer `4`; only `"*"` keeps its quoted form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkId {
    Numeric(u64),
    Any,
}

impl NetworkId {
    /// Whether a node reporting `chain_id` is acceptable for this profile.
    pub fn matches(&self, chain_id: u64) -> bool {
        match self {
            NetworkId::Any => true,
            NetworkId::Numeric(id) => *id == chain_id,
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, NetworkId::Any)
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkId::Numeric(id) => write!(f, "{}", id),
            NetworkId::Any => f.write_str(WILDCARD),
        }
    }
}

impl Serialize for NetworkId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NetworkId::Numeric(id) => serializer.serialize_u64(*id),
            NetworkId::Any => serializer.serialize_str(WILDCARD),
        }
    }
}

struct NetworkIdVisitor;

impl<'de> Visitor<'de> for NetworkIdVisitor {
    type Value = NetworkId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a non-negative integer or \"{}\"", WILDCARD)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<NetworkId, E> {
        Ok(NetworkId::Numeric(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<NetworkId, E> {
        u64::try_from(v)
            .map(NetworkId::Numeric)
            .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<NetworkId, E> {
        if v == WILDCARD {
            return Ok(NetworkId::Any);
        }
        v.parse()
            .map(NetworkId::Numeric)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for NetworkId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<NetworkId, D::Error> {
        deserializer.deserialize_any(NetworkIdVisitor)
    }
}

/// One named entry under `networks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NetworkProfile {
    /// Key of the profile in the `networks` table. Filled in by the store.
    #[serde(skip)]
    pub name: String,
    pub host: String,
    pub port: u16,
    pub network_id: NetworkId,
    /// Default sender. `Some("")` means present but unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Gas limit for deploys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas: Option<u64>,
}

impl NetworkProfile {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        port: u16,
        network_id: NetworkId,
    ) -> Self {
        NetworkProfile {
            name: name.into(),
            host: host.into(),
            port,
            network_id,
            from: None,
            gas: None,
        }
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_gas(mut self, gas: u64) -> Self {
        self.gas = Some(gas);
        self
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.host.clone(), self.port)
    }

    /// The sender address, or `None` when `from` is absent or empty.
    pub fn from_address(&self) -> Option<Address> {
        match self.from.as_deref() {
            None | Some("") => None,
            Some(s) => s.parse().ok(),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let what = format!("networks.{}", self.name);
        if self.name.trim().is_empty() {
            return Err(ConfigError::invalid("network name must not be empty"));
        }
        check_host(&self.host, &what)?;
        if self.port == 0 {
            return Err(ConfigError::invalid(format!("{}: port must not be 0", what)));
        }
        if let Some(from) = self.from.as_deref() {
            if !from.is_empty() && from.parse::<Address>().is_err() {
                return Err(ConfigError::invalid(format!(
                    "{}: `from` is not a 20-byte hex address: {}",
                    what, from
                )));
            }
        }
        Ok(())
    }
}

fn check_host(host: &str, what: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::invalid(format!("{}: host must not be empty", what)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case("\"*\"", NetworkId::Any ; "wildcard")]
    #[test_case("4", NetworkId::Numeric(4) ; "integer")]
    #[test_case("\"1337\"", NetworkId::Numeric(1337) ; "numeric string")]
    fn network_id_parses(json: &str, expected: NetworkId) {
        let id: NetworkId = serde_json::from_str(json).unwrap();
        assert_eq!(id, expected);
    }

    #[test_case("-1" ; "negative")]
    #[test_case("\"any\"" ; "other text")]
    #[test_case("true" ; "bool")]
    fn network_id_rejects(json: &str) {
        assert!(serde_json::from_str::<NetworkId>(json).is_err());
    }

    #[test]
    fn wildcard_keeps_its_text_form() {
        assert_eq!(serde_json::to_string(&NetworkId::Any).unwrap(), "\"*\"");
        assert_eq!(serde_json::to_string(&NetworkId::Numeric(4)).unwrap(), "4");
        assert_eq!(NetworkId::Any.to_string(), "*");
    }

    #[test]
    fn wildcard_matches_every_chain() {
        assert!(NetworkId::Any.matches(1));
        assert!(NetworkId::Any.matches(31337));
        assert!(NetworkId::Numeric(4).matches(4));
        assert!(!NetworkId::Numeric(4).matches(1));
    }

    #[test]
    fn port_keeps_quoted_form() {
        let ep: Endpoint = serde_json::from_str(r#"{"host":"localhost","port":"8545"}"#).unwrap();
        assert_eq!(ep.port, Port::Text("8545".into()));
        assert_eq!(ep.port.as_u16(), Some(8545));
        assert_eq!(ep.url(), "http://localhost:8545");

        let ep: Endpoint = serde_json::from_str(r#"{"host":"localhost","port":8545}"#).unwrap();
        assert_eq!(ep.port, Port::Number(8545));
    }

    #[test]
    fn endpoint_validation() {
        assert!(Endpoint::new("localhost", "8545").validate("rpc").is_ok());
        assert!(Endpoint::new("localhost", "http").validate("rpc").is_err());
        assert!(Endpoint::new("localhost", 0u16).validate("rpc").is_err());
        assert!(Endpoint::new(" ", 8545u16).validate("rpc").is_err());
        assert!(Endpoint::new("localhost", " 8545 ").validate("rpc").is_err());
        assert!(Endpoint::new("localhost", "8545 ").validate("rpc").is_err());
    }

    #[test_case("localhost", "http://localhost:8545" ; "hostname")]
    #[test_case("127.0.0.1", "http://127.0.0.1:8545" ; "ipv4")]
    #[test_case("::1", "http://[::1]:8545" ; "ipv6")]
    #[test_case("[::1]", "http://[::1]:8545" ; "ipv6 already bracketed")]
    fn url_formats_host(host: &str, expected: &str) {
        assert_eq!(Endpoint::new(host, 8545u16).url(), expected);
    }

    #[test]
    fn quoted_numeric_id_is_written_back_bare() {
        let id: NetworkId = serde_json::from_str("\"4\"").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "4");
    }

    #[test]
    fn empty_from_is_not_absent() {
        let json = r#"{"host":"localhost","port":8545,"network_id":4,"from":""}"#;
        let profile: NetworkProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.from.as_deref(), Some(""));
        assert_eq!(profile.from_address(), None);
        assert_eq!(profile.gas, None);

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["from"], "");
        assert!(back.get("gas").is_none());
    }

    #[test]
    fn from_must_look_like_an_address() {
        let mut profile = NetworkProfile::new("rinkeby", "localhost", 8545, NetworkId::Numeric(4))
            .with_from("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert!(profile.validate().is_ok());
        assert!(profile.from_address().is_some());

        profile.from = Some("not-an-address".into());
        assert!(matches!(profile.validate(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let json = r#"{"host":"localhost","port":8545,"network_id":4,"gasPrice":1}"#;
        assert!(serde_json::from_str::<NetworkProfile>(json).is_err());
    }

    #[test]
    fn profile_endpoint_and_gas() {
        let profile = NetworkProfile::new("ganache", "127.0.0.1", 7545, NetworkId::Numeric(5777))
            .with_gas(6_721_975);
        assert_eq!(profile.gas, Some(6_721_975));
        assert_eq!(profile.endpoint().url(), "http://127.0.0.1:7545");
        assert!(profile.validate().is_ok());
    }
}
