//! An in-memory stand-in for the permissioning contracts, recording every call

use std::{collections::HashMap, sync::Mutex};

use alloy::primitives::{address, Address, U256};
use permissioning_scripts::{
    chain::AccountPermissioning, errors::ScriptError, types::ContractNameKey,
};

/// The address of the admin contract in the mock chain
pub const ADMIN: Address = address!("adadadadadadadadadadadadadadadadadadadad");

/// The address of the previously deployed rules contract in the mock chain
pub const EXISTING_RULES: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

/// A call made against the mock chain
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    DeployAccountIngress,
    AccountIngressVersion(Address),
    SetContractAddress(Address, ContractNameKey, Address),
    DeployedAdmin,
    DeployAccountStorage(Address),
    UpgradeStorageVersion(Address, Address),
    DeployAccountRules(Address, Address),
    DeployedAccountRules,
    GetAccounts(Address),
    AddAccounts(Address, Vec<Address>),
    SetCreateContractPermission(Address, Address, bool),
}

impl Call {
    /// Whether the call deploys a contract or mutates contract state
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Call::DeployAccountIngress
                | Call::SetContractAddress(..)
                | Call::DeployAccountStorage(_)
                | Call::UpgradeStorageVersion(..)
                | Call::DeployAccountRules(..)
                | Call::AddAccounts(..)
                | Call::SetCreateContractPermission(..)
        )
    }
}

/// The mutable state of the mock chain
#[derive(Default)]
struct State {
    calls: Vec<Call>,
    next_address: u8,
    registry: HashMap<(Address, ContractNameKey), Address>,
    allowlists: HashMap<Address, Vec<Address>>,
}

/// A mock chain implementing [`AccountPermissioning`]
#[derive(Default)]
pub struct MockChain {
    state: Mutex<State>,
    /// Accounts a freshly deployed rules contract reads back from storage
    migrated_accounts: Vec<Address>,
    /// Whether the ingress version query fails
    fail_version_check: bool,
    /// Whether adding accounts to the allowlist fails
    fail_add_accounts: bool,
}

impl MockChain {
    /// A mock chain with no deployed rules contract
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the allowlist of the previously deployed rules contract
    pub fn with_existing_allowlist(self, accounts: Vec<Address>) -> Self {
        self.state
            .lock()
            .unwrap()
            .allowlists
            .insert(EXISTING_RULES, accounts);
        self
    }

    /// Set the accounts a freshly deployed rules contract finds in storage
    pub fn with_migrated_accounts(mut self, accounts: Vec<Address>) -> Self {
        self.migrated_accounts = accounts;
        self
    }

    /// Make the ingress version query fail
    pub fn failing_version_check(mut self) -> Self {
        self.fail_version_check = true;
        self
    }

    /// Make adding accounts to the allowlist fail
    pub fn failing_add_accounts(mut self) -> Self {
        self.fail_add_accounts = true;
        self
    }

    /// All calls made so far, in order
    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The address registered under `name` in the given ingress contract
    pub fn registered(&self, account_ingress: Address, name: ContractNameKey) -> Option<Address> {
        self.state
            .lock()
            .unwrap()
            .registry
            .get(&(account_ingress, name))
            .copied()
    }

    /// Record a call
    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }

    /// Allocate the address of a new contract
    fn allocate(&self) -> Address {
        let mut state = self.state.lock().unwrap();
        state.next_address += 1;
        Address::repeat_byte(state.next_address)
    }
}

impl AccountPermissioning for MockChain {
    async fn deploy_account_ingress(&self) -> Result<Address, ScriptError> {
        self.record(Call::DeployAccountIngress);
        Ok(self.allocate())
    }

    async fn account_ingress_version(
        &self,
        account_ingress: Address,
    ) -> Result<U256, ScriptError> {
        self.record(Call::AccountIngressVersion(account_ingress));
        if self.fail_version_check {
            return Err(ScriptError::ContractInteraction("execution reverted".to_string()));
        }

        Ok(U256::from(1_000_000))
    }

    async fn set_contract_address(
        &self,
        account_ingress: Address,
        name: ContractNameKey,
        address: Address,
    ) -> Result<(), ScriptError> {
        self.record(Call::SetContractAddress(account_ingress, name, address));
        self.state
            .lock()
            .unwrap()
            .registry
            .insert((account_ingress, name), address);
        Ok(())
    }

    async fn deployed_admin(&self) -> Result<Address, ScriptError> {
        self.record(Call::DeployedAdmin);
        Ok(ADMIN)
    }

    async fn deploy_account_storage(
        &self,
        account_ingress: Address,
    ) -> Result<Address, ScriptError> {
        self.record(Call::DeployAccountStorage(account_ingress));
        Ok(self.allocate())
    }

    async fn upgrade_storage_version(
        &self,
        account_storage: Address,
        account_rules: Address,
    ) -> Result<(), ScriptError> {
        self.record(Call::UpgradeStorageVersion(account_storage, account_rules));
        Ok(())
    }

    async fn deploy_account_rules(
        &self,
        account_ingress: Address,
        account_storage: Address,
    ) -> Result<Address, ScriptError> {
        self.record(Call::DeployAccountRules(account_ingress, account_storage));
        let address = self.allocate();
        self.state
            .lock()
            .unwrap()
            .allowlists
            .insert(address, self.migrated_accounts.clone());
        Ok(address)
    }

    async fn deployed_account_rules(&self) -> Result<Address, ScriptError> {
        self.record(Call::DeployedAccountRules);
        Ok(EXISTING_RULES)
    }

    async fn get_accounts(&self, account_rules: Address) -> Result<Vec<Address>, ScriptError> {
        self.record(Call::GetAccounts(account_rules));
        Ok(self
            .state
            .lock()
            .unwrap()
            .allowlists
            .get(&account_rules)
            .cloned()
            .unwrap_or_default())
    }

    async fn add_accounts(
        &self,
        account_rules: Address,
        accounts: &[Address],
    ) -> Result<(), ScriptError> {
        self.record(Call::AddAccounts(account_rules, accounts.to_vec()));
        if self.fail_add_accounts {
            return Err(ScriptError::ContractInteraction("execution reverted".to_string()));
        }

        self.state
            .lock()
            .unwrap()
            .allowlists
            .entry(account_rules)
            .or_default()
            .extend_from_slice(accounts);
        Ok(())
    }

    async fn set_create_contract_permission(
        &self,
        account_rules: Address,
        account: Address,
        allowed: bool,
    ) -> Result<(), ScriptError> {
        self.record(Call::SetCreateContractPermission(
            account_rules,
            account,
            allowed,
        ));
        Ok(())
    }
}
