//! Scripts for deploying and linking the account permissioning contracts.

#![deny(missing_docs)]

pub mod chain;
pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
mod solidity;
pub mod types;
pub mod utils;
