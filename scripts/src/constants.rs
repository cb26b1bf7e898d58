//! Constants used in the permissioning scripts

/// The default RPC URL of a local development node
pub const DEFAULT_RPC_URL: &str = "http://localhost:8545";

/// The default directory holding the Truffle compilation artifacts
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// The default path of the deployments file
pub const DEFAULT_DEPLOYMENTS_PATH: &str = "deployments.json";

/// The default path of the shared contracts env file, relative to the
/// working directory
pub const DEFAULT_CONTRACTS_ENV_PATH: &str = "../contracts.env";

/// The variable exported in the contracts env file for the rules contract
pub const CONTRACT_ACCOUNT_RULES_ENV_VAR: &str = "CONTRACT_ACCOUNT_RULES";

/// The registry name under which the admin contract is registered in the ingress contract
pub const ADMIN_CONTRACT_NAME: &str = "administration";

/// The registry name under which the rules contract is registered in the ingress contract
pub const RULES_CONTRACT_NAME: &str = "rules";

/// The number of bytes in a registry name key
pub const NUM_BYTES_NAME_KEY: usize = 32;

/// The key of the bytecode field in a Truffle artifact
pub const ARTIFACT_BYTECODE_KEY: &str = "bytecode";

/// The extension of a Truffle artifact file
pub const ARTIFACT_EXTENSION: &str = "json";

/// The deployments key in the deployments file
pub const DEPLOYMENTS_KEY: &str = "deployments";

/// The account ingress contract key in the deployments file
pub const ACCOUNT_INGRESS_CONTRACT_KEY: &str = "account_ingress_contract";

/// The admin contract key in the deployments file
pub const ADMIN_CONTRACT_KEY: &str = "admin_contract";

/// The account storage contract key in the deployments file
pub const ACCOUNT_STORAGE_CONTRACT_KEY: &str = "account_storage_contract";

/// The account rules contract key in the deployments file
pub const ACCOUNT_RULES_CONTRACT_KEY: &str = "account_rules_contract";
