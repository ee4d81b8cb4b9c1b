//! Built-in network configuration for the local development node.

use once_cell::sync::Lazy;

use crate::network::{Endpoint, NetworkId, NetworkProfile};
use crate::store::ConfigStore;

/// Host of the local node (geth or ganache).
pub const LOCAL_HOST: &str = "localhost";
/// Port of the local node's JSON-RPC interface.
pub const LOCAL_PORT: u16 = 8545;
/// The default rpc block quotes its port.
pub const RPC_PORT: &str = "8545";

pub const DEVELOPMENT: &str = "development";
pub const RINKEBY: &str = "rinkeby";
pub const RINKEBY_NETWORK_ID: u64 = 4;

static BUILTIN: Lazy<ConfigStore> = Lazy::new(builtin_store);

fn builtin_store() -> ConfigStore {
    let rpc = Endpoint::new(LOCAL_HOST, RPC_PORT);
    let networks = [
        NetworkProfile::new(DEVELOPMENT, LOCAL_HOST, LOCAL_PORT, NetworkId::Any),
        // no gas override: deploys use the toolchain's default limit
        NetworkProfile::new(
            RINKEBY,
            LOCAL_HOST,
            LOCAL_PORT,
            NetworkId::Numeric(RINKEBY_NETWORK_ID),
        )
        .with_from(""),
    ];
    ConfigStore::new(rpc, networks).expect("built-in network config is valid")
}

impl ConfigStore {
    /// A fresh copy of the built-in configuration.
    pub fn builtin() -> ConfigStore {
        builtin_store()
    }
}

/// The process-wide built-in configuration, constructed on first use.
pub fn get() -> &'static ConfigStore {
    &BUILTIN
}
