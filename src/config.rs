use crate::ledger::HorizonClient;

pub const TESTNET_HORIZON_URL: &str = "https://horizon-testnet.stellar.org";
pub const TESTNET_PASSPHRASE: &str = "Test SDF Network ; September 2015";

/// Minimum per-operation fee, in stroops.
pub const MIN_BASE_FEE: u32 = 100;

/// Which network to talk to and how to pay for it. Passed to every
/// operation explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub horizon_url: String,
    pub network_passphrase: String,
    pub base_fee: u32,
}

impl NetworkConfig {
    pub fn testnet() -> Self {
        Self {
            horizon_url: TESTNET_HORIZON_URL.to_string(),
            network_passphrase: TESTNET_PASSPHRASE.to_string(),
            base_fee: MIN_BASE_FEE,
        }
    }
}

pub fn create_ledger_client(network: &NetworkConfig) -> HorizonClient {
    HorizonClient::new(&network.horizon_url)
}
