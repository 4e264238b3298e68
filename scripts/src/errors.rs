//! Definitions of errors that can occur during the execution of the deploy scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

use crate::constants::{MNEMONIC_ENV_VAR, PRIVATE_KEY_ENV_VAR};

/// Errors that can occur during the execution of the deploy scripts
#[derive(Debug)]
pub enum ScriptError {
    /// No signing accounts were configured for the deployer
    NoAccounts,
    /// Error deriving a signing account from the configured credentials
    AccountConfiguration(String),
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading or parsing a contract bytecode artifact
    ArtifactParsing(String),
    /// Error reading the `deployments.json` file
    ReadDeployments(String),
    /// Error writing the `deployments.json` file
    WriteDeployments(String),
    /// Error constructing calldata for a contract method
    CalldataConstruction(String),
    /// Error deploying a contract
    ContractDeployment(String),
    /// Error calling a contract method
    ContractInteraction(String),
    /// Error converting between contract and script types
    Conversion(String),
    /// Error encoding, signing, or verifying a ticket
    Ticket(String),
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::NoAccounts => write!(
                f,
                "no accounts available: set the {} or {} environment variable",
                PRIVATE_KEY_ENV_VAR, MNEMONIC_ENV_VAR
            ),
            ScriptError::AccountConfiguration(s) => {
                write!(f, "error configuring deployer account: {}", s)
            }
            ScriptError::ClientInitialization(s) => write!(f, "error initializing client: {}", s),
            ScriptError::ArtifactParsing(s) => write!(f, "error parsing artifact: {}", s),
            ScriptError::ReadDeployments(s) => write!(f, "error reading deployments: {}", s),
            ScriptError::WriteDeployments(s) => write!(f, "error writing deployments: {}", s),
            ScriptError::CalldataConstruction(s) => write!(f, "error constructing calldata: {}", s),
            ScriptError::ContractDeployment(s) => write!(f, "error deploying contract: {}", s),
            ScriptError::ContractInteraction(s) => {
                write!(f, "error interacting with contract: {}", s)
            }
            ScriptError::Conversion(s) => write!(f, "error converting between types: {}", s),
            ScriptError::Ticket(s) => write!(f, "invalid ticket: {}", s),
        }
    }
}

impl Error for ScriptError {}

#[cfg(test)]
mod tests {
    use super::ScriptError;

    #[test]
    fn no_accounts_names_credential_variables() {
        let msg = ScriptError::NoAccounts.to_string();
        assert!(msg.starts_with("no accounts available"));
        assert!(msg.contains("PRIVATE_KEY"));
        assert!(msg.contains("MNEMONIC"));
    }
}
