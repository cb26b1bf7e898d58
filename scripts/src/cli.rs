//! Definitions of CLI arguments and commands for the permissioning scripts

use std::{path::PathBuf, str::FromStr};

use alloy::primitives::Address;
use clap::{builder::FalseyValueParser, Args, Parser, Subcommand};

use crate::{
    chain::AccountPermissioning,
    commands::{deploy_account_rules, log_allowlist},
    config::DeployConfig,
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONTRACTS_ENV_PATH, DEFAULT_DEPLOYMENTS_PATH,
        DEFAULT_RPC_URL,
    },
    errors::ScriptError,
    utils::setup_contract_client,
};

/// Deploy and link the account permissioning contracts
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = "PKEY")]
    pub priv_key: String,

    /// Network RPC URL
    #[arg(short, long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Directory containing the Truffle compilation artifacts
    #[arg(long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Path to the file tracking deployed contract addresses
    #[arg(short, long, default_value = DEFAULT_DEPLOYMENTS_PATH)]
    pub deployments_path: PathBuf,

    /// Address of the deployed admin contract, overrides the deployments file
    #[arg(long, env = "ADMIN_CONTRACT_ADDRESS", value_parser = parse_address)]
    pub admin_address: Option<Address>,

    /// Address of the deployed account rules contract, overrides the deployments file
    #[arg(long, env = "CONTRACT_ACCOUNT_RULES", value_parser = parse_address)]
    pub account_rules_address: Option<Address>,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Connect to the node and run the selected command
    pub async fn run(self) -> Result<(), ScriptError> {
        let client = setup_contract_client(
            &self.priv_key,
            &self.rpc_url,
            self.artifacts_dir,
            self.deployments_path,
            self.admin_address,
            self.account_rules_address,
        )
        .await?;

        self.command.run(&client).await
    }
}

/// The commands supported by the scripts
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the account rules contract, deploying or reusing the
    /// ingress and storage contracts, and link them together
    DeployAccountRules(DeployAccountRulesArgs),
    /// Log the allowlist of the currently deployed account rules contract
    LogAllowlist,
}

impl Command {
    /// Run the command against the given contract client
    pub async fn run(self, client: &impl AccountPermissioning) -> Result<(), ScriptError> {
        match self {
            Command::DeployAccountRules(args) => {
                let contracts_env_path = args.contracts_env_path.clone();
                deploy_account_rules(client, DeployConfig::from(args), &contracts_env_path)
                    .await
                    .map(|_| ())
            }
            Command::LogAllowlist => log_allowlist(client).await.map(|_| ()),
        }
    }
}

/// Deploy the account rules contract
#[derive(Args, Clone, Debug)]
pub struct DeployAccountRulesArgs {
    /// Skip redeploying the account rules contract and only log its allowlist
    #[arg(long, env = "RETAIN_ACCOUNT_RULES_CONTRACT", value_parser = FalseyValueParser::new())]
    pub retain_rules_contract: bool,

    /// Address of a pre-deployed account ingress contract
    #[arg(long, env = "ACCOUNT_INGRESS_CONTRACT_ADDRESS", value_parser = parse_address)]
    pub account_ingress: Option<Address>,

    /// Address of a pre-deployed account storage contract
    #[arg(long, env = "ACCOUNT_STORAGE_CONTRACT_ADDRESS", value_parser = parse_address)]
    pub account_storage: Option<Address>,

    /// Comma-separated accounts to seed the allowlist with
    #[arg(
        long,
        env = "INITIAL_ALLOWLISTED_ACCOUNTS",
        value_delimiter = ',',
        value_parser = parse_address
    )]
    pub initial_allowlisted_accounts: Option<Vec<Address>>,

    /// File to which the deployed rules contract address is appended
    #[arg(long, default_value = DEFAULT_CONTRACTS_ENV_PATH)]
    pub contracts_env_path: PathBuf,
}

/// Parse an address, ignoring surrounding whitespace
fn parse_address(s: &str) -> Result<Address, String> {
    Address::from_str(s.trim()).map_err(|e| format!("invalid address `{}`: {}", s.trim(), e))
}
