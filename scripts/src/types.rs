//! Type definitions used throughout the scripts

use std::fmt::{self, Display};

use alloy::primitives::{Address, FixedBytes};

use crate::constants::{
    ACCOUNT_INGRESS_CONTRACT_KEY, ACCOUNT_RULES_CONTRACT_KEY, ACCOUNT_STORAGE_CONTRACT_KEY,
    ADMIN_CONTRACT_KEY, ADMIN_CONTRACT_NAME, NUM_BYTES_NAME_KEY, RULES_CONTRACT_NAME,
};

/// The contracts making up the account permissioning system
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PermissioningContract {
    /// The account ingress contract
    AccountIngress,
    /// The admin contract
    Admin,
    /// The account storage contract
    AccountStorage,
    /// The account rules contract
    AccountRules,
}

impl PermissioningContract {
    /// The name of the contract's Truffle artifact, without extension
    pub fn artifact_name(&self) -> &'static str {
        match self {
            PermissioningContract::AccountIngress => "AccountIngress",
            PermissioningContract::Admin => "Admin",
            PermissioningContract::AccountStorage => "AccountStorage",
            PermissioningContract::AccountRules => "AccountRules",
        }
    }

    /// The key of the contract in the deployments file
    pub fn deployments_key(&self) -> &'static str {
        match self {
            PermissioningContract::AccountIngress => ACCOUNT_INGRESS_CONTRACT_KEY,
            PermissioningContract::Admin => ADMIN_CONTRACT_KEY,
            PermissioningContract::AccountStorage => ACCOUNT_STORAGE_CONTRACT_KEY,
            PermissioningContract::AccountRules => ACCOUNT_RULES_CONTRACT_KEY,
        }
    }
}

impl Display for PermissioningContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.artifact_name())
    }
}

/// A symbolic name under which a contract address is registered
/// in the ingress contract
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ContractNameKey {
    /// The admin contract's registry entry
    Administration,
    /// The rules contract's registry entry
    Rules,
}

impl ContractNameKey {
    /// The human-readable registry name
    pub fn name(&self) -> &'static str {
        match self {
            ContractNameKey::Administration => ADMIN_CONTRACT_NAME,
            ContractNameKey::Rules => RULES_CONTRACT_NAME,
        }
    }

    /// Encode the name as a `bytes32`: the UTF-8 bytes left-aligned,
    /// zero-padded on the right
    pub fn to_bytes32(&self) -> FixedBytes<NUM_BYTES_NAME_KEY> {
        let name = self.name().as_bytes();
        let mut key = [0u8; NUM_BYTES_NAME_KEY];
        key[..name.len()].copy_from_slice(name);
        FixedBytes::from(key)
    }
}

impl Display for ContractNameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The addresses resolved during a deployment run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeploymentSummary {
    /// The account ingress contract address
    pub account_ingress: Address,
    /// Whether the ingress contract was deployed in this run
    pub deployed_ingress: bool,
    /// The admin contract address registered in the ingress contract
    pub admin: Address,
    /// The account storage contract address
    pub account_storage: Address,
    /// Whether the storage contract was deployed in this run
    pub deployed_storage: bool,
    /// The freshly deployed account rules contract address
    pub account_rules: Address,
    /// The accounts granted contract creation permission
    pub permissioned_accounts: Vec<Address>,
}

/// The result of a deployment run
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeployOutcome {
    /// The existing rules contract was retained, nothing was deployed
    Retained {
        /// The address of the retained rules contract
        account_rules: Address,
        /// The allowlist of the retained rules contract
        allowlist: Vec<Address>,
    },
    /// The rules contract was (re)deployed and linked
    Deployed(DeploymentSummary),
}
