//! Scripts for deploying the subscriptions contracts.

#![deny(missing_docs)]

pub mod accounts;
pub mod cli;
mod commands;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod tickets;
mod solidity;
pub mod types;
pub mod utils;
