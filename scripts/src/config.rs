//! The configuration record driving a deployment run

use alloy::primitives::Address;

use crate::cli::DeployAccountRulesArgs;

/// Configuration for a run of the account rules deployment
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeployConfig {
    /// Whether to keep the currently deployed rules contract
    pub retain_rules_contract: bool,
    /// The address of a pre-deployed ingress contract, if any
    pub account_ingress: Option<Address>,
    /// The address of a pre-deployed storage contract, if any
    pub account_storage: Option<Address>,
    /// The accounts to seed the allowlist with, if configured
    pub initial_allowlist: Option<Vec<Address>>,
}

impl DeployConfig {
    /// The configured initial allowlist, if it is present and non-empty
    pub fn seed_accounts(&self) -> Option<&[Address]> {
        self.initial_allowlist
            .as_deref()
            .filter(|accounts| !accounts.is_empty())
    }
}

impl From<DeployAccountRulesArgs> for DeployConfig {
    fn from(args: DeployAccountRulesArgs) -> Self {
        Self {
            retain_rules_contract: args.retain_rules_contract,
            account_ingress: args.account_ingress,
            account_storage: args.account_storage,
            initial_allowlist: args.initial_allowlisted_accounts,
        }
    }
}
