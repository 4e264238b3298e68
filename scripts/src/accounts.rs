//! Resolution of the deployer's signing accounts from the configured credentials

use std::str::FromStr;

use alloy::signers::local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};

use crate::errors::ScriptError;

/// Builds the list of signing accounts available to the deploy commands.
///
/// A private key takes precedence and yields a single account. Otherwise a
/// mnemonic yields `mnemonic_count` accounts along the default Ethereum
/// derivation path. With neither configured the list is empty, and it is up
/// to the caller to reject it.
pub fn load_accounts(
    priv_key: Option<&str>,
    mnemonic: Option<&str>,
    mnemonic_count: u32,
) -> Result<Vec<PrivateKeySigner>, ScriptError> {
    if let Some(priv_key) = non_blank(priv_key) {
        let signer = PrivateKeySigner::from_str(priv_key)
            .map_err(|e| ScriptError::AccountConfiguration(e.to_string()))?;
        return Ok(vec![signer]);
    }

    let Some(phrase) = non_blank(mnemonic) else {
        return Ok(Vec::new());
    };

    (0..mnemonic_count)
        .map(|index| {
            MnemonicBuilder::<English>::default()
                .phrase(phrase)
                .index(index)
                .and_then(|builder| builder.build())
                .map_err(|e| ScriptError::AccountConfiguration(e.to_string()))
        })
        .collect()
}

/// Returns the first account, the one used as the deployer
pub fn first_account(accounts: &[PrivateKeySigner]) -> Result<&PrivateKeySigner, ScriptError> {
    accounts.first().ok_or(ScriptError::NoAccounts)
}

/// Treat empty and whitespace-only credentials as unset
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    /// The well-known development mnemonic shared by local EVM nodes
    const DEV_MNEMONIC: &str = "test test test test test test test test test test test junk";

    /// The private key of the first account derived from [`DEV_MNEMONIC`]
    const DEV_PRIV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn private_key_yields_single_account() {
        let accounts = load_accounts(Some(DEV_PRIV_KEY), Some(DEV_MNEMONIC), 3).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(
            accounts[0].address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
    }

    #[test]
    fn mnemonic_yields_derived_accounts() {
        let accounts = load_accounts(None, Some(DEV_MNEMONIC), 2).unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(
            accounts[0].address(),
            address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")
        );
        assert_eq!(
            accounts[1].address(),
            address!("70997970C51812dc3A010C7d01b50e0d17dc79C8")
        );
    }

    #[test]
    fn blank_credentials_yield_no_accounts() {
        let accounts = load_accounts(Some("  "), Some(""), 20).unwrap();
        assert!(accounts.is_empty());
        assert!(matches!(
            first_account(&accounts),
            Err(ScriptError::NoAccounts)
        ));
    }

    #[test]
    fn malformed_credentials_are_rejected() {
        assert!(matches!(
            load_accounts(Some("0xdeadbeef"), None, 1),
            Err(ScriptError::AccountConfiguration(_))
        ));
        assert!(matches!(
            load_accounts(None, Some("not a real phrase"), 1),
            Err(ScriptError::AccountConfiguration(_))
        ));
    }
}
