//! Utilities for the deploy scripts.

use std::{
    fs::{self, File},
    io::Read,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::primitives::{Address, Bytes};
use json::JsonValue;

use crate::{
    constants::{BIN_EXTENSION, BYTECODE_KEY, DEPLOYMENTS_KEY, JSON_EXTENSION},
    errors::ScriptError,
};

/// Whether the given string is a well-formed Ethereum address.
///
/// Accepts 40 hex digits with an optional `0x` prefix. Mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn is_address(candidate: &str) -> bool {
    checked_address(candidate).is_some()
}

/// Parse an address argument under the same rules as [`is_address`],
/// failing with a calldata construction error
pub fn parse_address(address: &str) -> Result<Address, ScriptError> {
    checked_address(address).ok_or_else(|| {
        ScriptError::CalldataConstruction(format!("invalid address `{}`", address))
    })
}

/// Parse an address, rejecting mixed-case input with a bad EIP-55 checksum
fn checked_address(candidate: &str) -> Option<Address> {
    let address = Address::from_str(candidate).ok()?;

    let digits = candidate.strip_prefix("0x").unwrap_or(candidate);
    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower
        && has_upper
        && address.to_checksum(None /* chain_id */).strip_prefix("0x") != Some(digits)
    {
        return None;
    }

    Some(address)
}

/// Reads the creation bytecode of the named contract from the artifacts directory.
///
/// Looks for a `<name>.bin` file of hex bytecode first, then for a `<name>.json`
/// compilation artifact with a top-level `bytecode` field.
pub fn read_bytecode(artifacts_dir: &Path, contract_name: &str) -> Result<Bytes, ScriptError> {
    let bin_path = artifacts_dir.join(contract_name).with_extension(BIN_EXTENSION);
    let json_path = artifacts_dir.join(contract_name).with_extension(JSON_EXTENSION);

    let hex = if bin_path.exists() {
        fs::read_to_string(&bin_path).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?
    } else if json_path.exists() {
        let artifact = get_json_from_file(&json_path, ScriptError::ArtifactParsing)?;
        artifact[BYTECODE_KEY]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ArtifactParsing(format!(
                    "no {} field in {}",
                    BYTECODE_KEY,
                    json_path.display()
                ))
            })?
            .to_string()
    } else {
        return Err(ScriptError::ArtifactParsing(format!(
            "no artifact for {} in {}",
            contract_name,
            artifacts_dir.display()
        )));
    };

    let bytecode =
        Bytes::from_str(hex.trim()).map_err(|e| ScriptError::ArtifactParsing(e.to_string()))?;
    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "empty bytecode for {}",
            contract_name
        )));
    }

    Ok(bytecode)
}

/// Read and parse a JSON file, reporting failures through `to_error`
pub fn get_json_from_file(
    file_path: &Path,
    to_error: fn(String) -> ScriptError,
) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| to_error(format!("{}: {}", file_path.display(), e)))?
        .read_to_string(&mut file_contents)
        .map_err(|e| to_error(format!("{}: {}", file_path.display(), e)))?;

    json::parse(&file_contents).map_err(|e| to_error(format!("{}: {}", file_path.display(), e)))
}

/// Read the address recorded under `contract_key` in the deployments file
pub fn parse_addr_from_deployments_file(
    file_path: &Path,
    contract_key: &str,
) -> Result<Address, ScriptError> {
    let parsed_json = get_json_from_file(file_path, ScriptError::ReadDeployments)?;

    Address::from_str(
        parsed_json[DEPLOYMENTS_KEY][contract_key]
            .as_str()
            .ok_or_else(|| {
                ScriptError::ReadDeployments(format!(
                    "could not parse {} address from deployments file",
                    contract_key
                ))
            })?,
    )
    .map_err(|e| ScriptError::ReadDeployments(e.to_string()))
}

/// Record a deployed contract address under `contract_key` in the deployments file
pub fn write_deployed_address(
    file_path: &Path,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !PathBuf::from(file_path).exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;
    }
    let mut parsed_json = get_json_from_file(file_path, ScriptError::WriteDeployments)?;

    parsed_json[DEPLOYMENTS_KEY][contract_key] = JsonValue::String(format!("{address:#x}"));

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::WriteDeployments(e.to_string()))?;

    Ok(())
}
