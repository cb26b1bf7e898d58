//! Implementations of the permissioning scripts

use std::path::Path;

use alloy::primitives::Address;
use itertools::Itertools;
use tracing::{error, info, warn};

use crate::{
    chain::AccountPermissioning,
    config::DeployConfig,
    errors::ScriptError,
    types::{ContractNameKey, DeployOutcome, DeploymentSummary},
    utils::append_contracts_env,
};

/// Deploy the account rules contract and link it with the ingress and storage contracts.
///
/// Unless the rules contract is retained, this always deploys a fresh rules contract;
/// the ingress and storage contracts are only deployed when no address is configured
/// for them. Only the ingress version check tolerates failure, every other error aborts
/// the run without rolling back what was already deployed.
pub async fn deploy_account_rules(
    client: &impl AccountPermissioning,
    config: DeployConfig,
    contracts_env_path: &Path,
) -> Result<DeployOutcome, ScriptError> {
    if config.retain_rules_contract {
        info!("not deploying AccountRules because retain=true");
        let account_rules = client.deployed_account_rules().await?;
        let allowlist = log_current_allowlist(client, account_rules).await?;

        return Ok(DeployOutcome::Retained {
            account_rules,
            allowlist,
        });
    }

    let (account_ingress, deployed_ingress) =
        resolve_account_ingress(client, config.account_ingress).await?;
    check_account_ingress(client, account_ingress).await;

    let admin = register_admin(client, account_ingress).await?;

    let (account_storage, deployed_storage) =
        resolve_account_storage(client, account_ingress, config.account_storage).await?;

    // rules -> storage
    let account_rules = client
        .deploy_account_rules(account_ingress, account_storage)
        .await?;
    info!(
        "AccountRules deployed to {account_rules} with AccountIngress = {account_ingress} \
         and AccountStorage = {account_storage}"
    );
    append_contracts_env(contracts_env_path, account_rules)?;

    // storage -> rules
    client
        .upgrade_storage_version(account_storage, account_rules)
        .await?;
    info!("set AccountStorage owner to AccountRules at {account_rules}");

    let permissioned_accounts = seed_allowlist(client, account_rules, &config).await?;
    for account in permissioned_accounts.iter() {
        client
            .set_create_contract_permission(account_rules, *account, true /* allowed */)
            .await?;
        info!("gave contract creation permission to {account}");
    }

    client
        .set_contract_address(account_ingress, ContractNameKey::Rules, account_rules)
        .await?;
    info!("updated AccountIngress with AccountRules address = {account_rules}");

    log_current_allowlist(client, account_rules).await?;

    Ok(DeployOutcome::Deployed(DeploymentSummary {
        account_ingress,
        deployed_ingress,
        admin,
        account_storage,
        deployed_storage,
        account_rules,
        permissioned_accounts,
    }))
}

/// Log the allowlist of the currently deployed account rules contract
pub async fn log_allowlist(
    client: &impl AccountPermissioning,
) -> Result<Vec<Address>, ScriptError> {
    let account_rules = client.deployed_account_rules().await?;
    log_current_allowlist(client, account_rules).await
}

// -----------
// | Helpers |
// -----------

/// Use the configured ingress contract or deploy a new one.
///
/// Returns the address and whether it was deployed in this run.
async fn resolve_account_ingress(
    client: &impl AccountPermissioning,
    configured: Option<Address>,
) -> Result<(Address, bool), ScriptError> {
    match configured {
        Some(address) => {
            info!("using existing AccountIngress at {address}");
            Ok((address, false))
        }
        None => {
            let address = client.deploy_account_ingress().await?;
            info!("deployed AccountIngress contract to {address}");
            Ok((address, true))
        }
    }
}

/// Check that the ingress contract responds to a version query, logging on failure
async fn check_account_ingress(client: &impl AccountPermissioning, account_ingress: Address) {
    match client.account_ingress_version(account_ingress).await {
        Ok(version) => {
            info!("AccountIngress initialised at {account_ingress}, version = {version}")
        }
        Err(e) => {
            error!("{e}");
            warn!(
                "AccountIngress contract at {account_ingress} is not responding like an \
                 AccountIngress contract"
            );
        }
    }
}

/// Register the deployed admin contract in the ingress registry
async fn register_admin(
    client: &impl AccountPermissioning,
    account_ingress: Address,
) -> Result<Address, ScriptError> {
    let admin = client.deployed_admin().await?;
    client
        .set_contract_address(account_ingress, ContractNameKey::Administration, admin)
        .await?;
    info!("updated AccountIngress with Admin address = {admin}");

    Ok(admin)
}

/// Use the configured storage contract or deploy a new one bound to the ingress contract.
///
/// Returns the address and whether it was deployed in this run.
async fn resolve_account_storage(
    client: &impl AccountPermissioning,
    account_ingress: Address,
    configured: Option<Address>,
) -> Result<(Address, bool), ScriptError> {
    match configured {
        Some(address) => {
            // TODO: query the contract to check that it is an AccountStorage contract
            info!("using existing AccountStorage at {address}");
            Ok((address, false))
        }
        None => {
            let address = client.deploy_account_storage(account_ingress).await?;
            info!("deployed AccountStorage contract to {address}");
            Ok((address, true))
        }
    }
}

/// Determine the accounts to grant contract creation permission to.
///
/// A non-empty configured allowlist is added to the rules contract and is itself the
/// result; otherwise the accounts already present on the rules contract are used.
async fn seed_allowlist(
    client: &impl AccountPermissioning,
    account_rules: Address,
    config: &DeployConfig,
) -> Result<Vec<Address>, ScriptError> {
    match config.seed_accounts() {
        Some(accounts) => {
            info!("adding initial allowlisted accounts ...");
            client.add_accounts(account_rules, accounts).await?;
            info!("initial allowlisted accounts added: {}", accounts.iter().join(", "));
            Ok(accounts.to_vec())
        }
        None => client.get_accounts(account_rules).await,
    }
}

/// Fetch and log the allowlist of the given rules contract
async fn log_current_allowlist(
    client: &impl AccountPermissioning,
    account_rules: Address,
) -> Result<Vec<Address>, ScriptError> {
    let allowlist = client.get_accounts(account_rules).await?;

    info!("<<< current ACCOUNT allowlist >>>");
    info!("[{}]", allowlist.iter().join(", "));
    info!("<<< end of current ACCOUNT allowlist >>>");

    Ok(allowlist)
}
