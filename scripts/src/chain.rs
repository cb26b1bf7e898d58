//! The on-chain collaborators of the deployment scripts
//!
//! [`AccountPermissioning`] abstracts the contract deployments and remote calls made
//! against the permissioning contracts, and [`ContractClient`] implements it over an
//! alloy provider.

use std::path::PathBuf;

use alloy::{
    network::TransactionBuilder,
    primitives::{Address, U256},
    providers::Provider,
    rpc::types::{TransactionReceipt, TransactionRequest},
    sol_types::SolValue,
};
use tracing::debug;

use crate::{
    errors::ScriptError,
    solidity::{AccountIngress, AccountRules, AccountStorage},
    types::{ContractNameKey, PermissioningContract},
    utils::{parse_addr_from_deployments_file, read_artifact_bytecode, write_deployed_address},
};

/// The deployments and remote calls the deployment scripts perform against the chain.
///
/// Attaching to a contract at a known address requires no remote call, so contracts are
/// referred to by address throughout.
#[allow(async_fn_in_trait)]
pub trait AccountPermissioning {
    /// Deploy a new account ingress contract
    async fn deploy_account_ingress(&self) -> Result<Address, ScriptError>;

    /// Query the version of the ingress contract at the given address
    async fn account_ingress_version(&self, account_ingress: Address)
        -> Result<U256, ScriptError>;

    /// Register `address` under `name` in the ingress contract's registry
    async fn set_contract_address(
        &self,
        account_ingress: Address,
        name: ContractNameKey,
        address: Address,
    ) -> Result<(), ScriptError>;

    /// Look up the already-deployed admin contract
    async fn deployed_admin(&self) -> Result<Address, ScriptError>;

    /// Deploy a new account storage contract bound to the given ingress contract
    async fn deploy_account_storage(&self, account_ingress: Address)
        -> Result<Address, ScriptError>;

    /// Hand control of the storage contract to the given rules contract
    async fn upgrade_storage_version(
        &self,
        account_storage: Address,
        account_rules: Address,
    ) -> Result<(), ScriptError>;

    /// Deploy a new account rules contract bound to the given ingress and storage contracts
    async fn deploy_account_rules(
        &self,
        account_ingress: Address,
        account_storage: Address,
    ) -> Result<Address, ScriptError>;

    /// Look up the already-deployed account rules contract
    async fn deployed_account_rules(&self) -> Result<Address, ScriptError>;

    /// Fetch the allowlist of the rules contract
    async fn get_accounts(&self, account_rules: Address) -> Result<Vec<Address>, ScriptError>;

    /// Add the given accounts to the allowlist of the rules contract
    async fn add_accounts(
        &self,
        account_rules: Address,
        accounts: &[Address],
    ) -> Result<(), ScriptError>;

    /// Set whether `account` may create contracts
    async fn set_create_contract_permission(
        &self,
        account_rules: Address,
        account: Address,
        allowed: bool,
    ) -> Result<(), ScriptError>;
}

/// An [`AccountPermissioning`] implementation that deploys Truffle artifacts and calls
/// the contracts through an alloy provider
pub struct ContractClient<P> {
    /// The provider, expected to sign transactions for the deployer
    provider: P,
    /// The directory containing the Truffle compilation artifacts
    artifacts_dir: PathBuf,
    /// The file tracking deployed contract addresses
    deployments_path: PathBuf,
    /// The admin contract address, if given explicitly
    admin_address: Option<Address>,
    /// The account rules contract address, if given explicitly
    account_rules_address: Option<Address>,
}

impl<P: Provider> ContractClient<P> {
    /// Construct a new client
    pub fn new(
        provider: P,
        artifacts_dir: PathBuf,
        deployments_path: PathBuf,
        admin_address: Option<Address>,
        account_rules_address: Option<Address>,
    ) -> Self {
        Self {
            provider,
            artifacts_dir,
            deployments_path,
            admin_address,
            account_rules_address,
        }
    }

    /// Deploy the given contract with the ABI-encoded constructor arguments,
    /// recording the resulting address in the deployments file
    async fn deploy_contract(
        &self,
        contract: PermissioningContract,
        constructor_args: Vec<u8>,
    ) -> Result<Address, ScriptError> {
        let code = self.deploy_code(contract, &constructor_args)?;

        let tx = TransactionRequest::default().with_deploy_code(code);
        let receipt = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        self.record_deployment(contract, &receipt)
    }

    /// The creation code of the given contract followed by its constructor arguments
    fn deploy_code(
        &self,
        contract: PermissioningContract,
        constructor_args: &[u8],
    ) -> Result<Vec<u8>, ScriptError> {
        let mut code = read_artifact_bytecode(&self.artifacts_dir, contract)?;
        code.extend_from_slice(constructor_args);

        Ok(code)
    }

    /// Check the receipt of a deployment and record the created contract's address
    fn record_deployment(
        &self,
        contract: PermissioningContract,
        receipt: &TransactionReceipt,
    ) -> Result<Address, ScriptError> {
        if !receipt.status() {
            return Err(ScriptError::ContractDeployment(format!(
                "{contract} deployment reverted in tx {:#x}",
                receipt.transaction_hash
            )));
        }

        let address = receipt.contract_address.ok_or_else(|| {
            ScriptError::ContractDeployment(format!("no contract address for {contract}"))
        })?;

        write_deployed_address(&self.deployments_path, contract.deployments_key(), address)?;
        debug!("recorded {contract} at {address} in deployments file");

        Ok(address)
    }

    /// Resolve a contract from an explicit address or the deployments file
    fn deployed_contract(
        &self,
        contract: PermissioningContract,
        explicit: Option<Address>,
    ) -> Result<Address, ScriptError> {
        match explicit {
            Some(address) => Ok(address),
            None => parse_addr_from_deployments_file(
                &self.deployments_path,
                contract.deployments_key(),
            )
            .map_err(|e| ScriptError::MissingDeployment(format!("{contract}: {e}"))),
        }
    }
}

/// Ensure that a transaction calling `method` succeeded
fn ensure_success(receipt: &TransactionReceipt, method: &str) -> Result<(), ScriptError> {
    if receipt.status() {
        Ok(())
    } else {
        Err(ScriptError::ContractInteraction(format!(
            "`{method}` reverted in tx {:#x}",
            receipt.transaction_hash
        )))
    }
}

impl<P: Provider> AccountPermissioning for ContractClient<P> {
    async fn deploy_account_ingress(&self) -> Result<Address, ScriptError> {
        self.deploy_contract(PermissioningContract::AccountIngress, Vec::new())
            .await
    }

    async fn account_ingress_version(
        &self,
        account_ingress: Address,
    ) -> Result<U256, ScriptError> {
        let ingress = AccountIngress::new(account_ingress, &self.provider);
        let version = ingress
            .getContractVersion()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;

        Ok(version)
    }

    async fn set_contract_address(
        &self,
        account_ingress: Address,
        name: ContractNameKey,
        address: Address,
    ) -> Result<(), ScriptError> {
        let ingress = AccountIngress::new(account_ingress, &self.provider);
        let receipt = ingress
            .setContractAddress(name.to_bytes32(), address)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        ensure_success(&receipt, "setContractAddress")
    }

    async fn deployed_admin(&self) -> Result<Address, ScriptError> {
        self.deployed_contract(PermissioningContract::Admin, self.admin_address)
    }

    async fn deploy_account_storage(
        &self,
        account_ingress: Address,
    ) -> Result<Address, ScriptError> {
        let constructor_args = (account_ingress,).abi_encode_params();
        self.deploy_contract(PermissioningContract::AccountStorage, constructor_args)
            .await
    }

    async fn upgrade_storage_version(
        &self,
        account_storage: Address,
        account_rules: Address,
    ) -> Result<(), ScriptError> {
        let storage = AccountStorage::new(account_storage, &self.provider);
        let receipt = storage
            .upgradeVersion(account_rules)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        ensure_success(&receipt, "upgradeVersion")
    }

    async fn deploy_account_rules(
        &self,
        account_ingress: Address,
        account_storage: Address,
    ) -> Result<Address, ScriptError> {
        let constructor_args = (account_ingress, account_storage).abi_encode_params();
        self.deploy_contract(PermissioningContract::AccountRules, constructor_args)
            .await
    }

    async fn deployed_account_rules(&self) -> Result<Address, ScriptError> {
        self.deployed_contract(
            PermissioningContract::AccountRules,
            self.account_rules_address,
        )
    }

    async fn get_accounts(&self, account_rules: Address) -> Result<Vec<Address>, ScriptError> {
        let rules = AccountRules::new(account_rules, &self.provider);
        let accounts = rules
            .getAccounts()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            ._0;

        Ok(accounts)
    }

    async fn add_accounts(
        &self,
        account_rules: Address,
        accounts: &[Address],
    ) -> Result<(), ScriptError> {
        let rules = AccountRules::new(account_rules, &self.provider);
        let receipt = rules
            .addAccounts(accounts.to_vec())
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        ensure_success(&receipt, "addAccounts")
    }

    async fn set_create_contract_permission(
        &self,
        account_rules: Address,
        account: Address,
        allowed: bool,
    ) -> Result<(), ScriptError> {
        let rules = AccountRules::new(account_rules, &self.provider);
        let receipt = rules
            .setCreateContractPermission(account, allowed)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        ensure_success(&receipt, "setCreateContractPermission")
    }
}
