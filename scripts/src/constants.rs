//! Constants used in the deploy scripts

/// The name of the environment variable holding the deployer's private key
pub const PRIVATE_KEY_ENV_VAR: &str = "PRIVATE_KEY";

/// The name of the environment variable holding the deployer's mnemonic
pub const MNEMONIC_ENV_VAR: &str = "MNEMONIC";

/// The name of the environment variable holding the network RPC URL
pub const RPC_URL_ENV_VAR: &str = "RPC_URL";

/// The RPC URL of a local development node
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// The directory in which compiled contract artifacts are expected
pub const DEFAULT_ARTIFACTS_DIR: &str = "contracts/build";

/// The default epoch length, in seconds, of the subscriptions contract
pub const DEFAULT_EPOCH_SECONDS: u64 = 3;

/// The number of accounts derived from a mnemonic
pub const MNEMONIC_ACCOUNT_COUNT: u32 = 20;

/// The number of confirmations to wait for on each transaction
pub const DEFAULT_CONFIRMATIONS: u64 = 1;

/// The name of the subscriptions contract artifact
pub const SUBSCRIPTIONS_ARTIFACT: &str = "Subscriptions";

/// The name of the registry contract artifact
pub const REGISTRY_ARTIFACT: &str = "Registry";

/// The extension of a raw hex bytecode artifact
pub const BIN_EXTENSION: &str = "bin";

/// The extension of a JSON compilation artifact
pub const JSON_EXTENSION: &str = "json";

/// The bytecode key in a JSON compilation artifact
pub const BYTECODE_KEY: &str = "bytecode";

/// The deployments key in the `deployments.json` file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The subscriptions contract key in the `deployments.json` file
pub const SUBSCRIPTIONS_CONTRACT_KEY: &str = "subscriptions_contract";

/// The registry contract key in the `deployments.json` file
pub const REGISTRY_CONTRACT_KEY: &str = "registry_contract";
