//! Utilities for the permissioning scripts.

use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::{
    network::EthereumWallet,
    primitives::{hex, Address},
    providers::{Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
};
use serde_json::{Map, Value};

use crate::{
    chain::ContractClient,
    constants::{
        ARTIFACT_BYTECODE_KEY, ARTIFACT_EXTENSION, CONTRACT_ACCOUNT_RULES_ENV_VAR, DEPLOYMENTS_KEY,
    },
    errors::ScriptError,
    types::PermissioningContract,
};

/// Sets up a signing provider for the deployer against the given RPC url
pub async fn setup_client(priv_key: &str, rpc_url: &str) -> Result<impl Provider, ScriptError> {
    let signer = PrivateKeySigner::from_str(priv_key)
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;
    let wallet = EthereumWallet::from(signer);

    ProviderBuilder::new()
        .wallet(wallet)
        .on_builtin(rpc_url)
        .await
        .map_err(|e| ScriptError::ClientInitialization(e.to_string()))
}

/// Sets up the contract client used by the commands
pub async fn setup_contract_client(
    priv_key: &str,
    rpc_url: &str,
    artifacts_dir: PathBuf,
    deployments_path: PathBuf,
    admin_address: Option<Address>,
    account_rules_address: Option<Address>,
) -> Result<ContractClient<impl Provider>, ScriptError> {
    let provider = setup_client(priv_key, rpc_url).await?;

    Ok(ContractClient::new(
        provider,
        artifacts_dir,
        deployments_path,
        admin_address,
        account_rules_address,
    ))
}

/// Read the creation bytecode of a contract from its Truffle artifact
pub fn read_artifact_bytecode(
    artifacts_dir: &Path,
    contract: PermissioningContract,
) -> Result<Vec<u8>, ScriptError> {
    let artifact_path = artifacts_dir
        .join(contract.artifact_name())
        .with_extension(ARTIFACT_EXTENSION);
    let contents = fs::read_to_string(&artifact_path).map_err(|e| {
        ScriptError::ArtifactParsing(format!("{}: {}", artifact_path.display(), e))
    })?;
    let artifact: Value =
        serde_json::from_str(&contents).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    let bytecode_hex = artifact[ARTIFACT_BYTECODE_KEY].as_str().ok_or_else(|| {
        ScriptError::ArtifactParsing(format!("no bytecode in {} artifact", contract))
    })?;
    let bytecode =
        hex::decode(bytecode_hex).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;

    // Interfaces and abstract contracts compile to empty bytecode
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "empty bytecode in {} artifact",
            contract
        )));
    }

    Ok(bytecode)
}

/// Read the deployments file as JSON
pub fn get_json_from_file(file_path: &Path) -> Result<Value, ScriptError> {
    let file_contents =
        fs::read_to_string(file_path).map_err(|e| ScriptError::ReadDeployments(e.to_string()))?;

    serde_json::from_str(&file_contents).map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Parse the address stored under `contract_key` in the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadDeployments(format!(
                    "no `{}` address in deployments file",
                    contract_key
                ))
            })?,
    )
    .map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record `address` under `contract_key` in the deployments file
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path)?;

    let deployments = parsed_json
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments("deployments file is not a JSON object".to_string())
        })?
        .entry(DEPLOYMENTS_KEY)
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| {
            ScriptError::WriteDeployments(format!("`{}` is not a JSON object", DEPLOYMENTS_KEY))
        })?;
    deployments.insert(contract_key.to_string(), Value::String(format!("{address:#x}")));

    let serialized = serde_json::to_string_pretty(&parsed_json)
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    fs::write(file_path, serialized).map_err(|e| ScriptError::WriteDeployments(e.to_string()))
}

/// Append the export line for the rules contract to the contracts env file,
/// creating the file if needed
pub fn append_contracts_env(file_path: &Path, account_rules: Address) -> Result<(), ScriptError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(file_path)
        .map_err(|e| ScriptError::WriteFile(format!("{}: {}", file_path.display(), e)))?;

    writeln!(
        file,
        "export {}={}",
        CONTRACT_ACCOUNT_RULES_ENV_VAR, account_rules
    )
    .map_err(|e| ScriptError::WriteFile(e.to_string()))
}
