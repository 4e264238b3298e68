//! The deployment helpers the commands delegate to

#![allow(async_fn_in_trait)]

use std::path::PathBuf;

use alloy::{
    network::{Ethereum, TransactionBuilder},
    primitives::{Address, TxHash},
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionReceipt, TransactionRequest},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use tracing::info;

use crate::{
    constants::{REGISTRY_ARTIFACT, SUBSCRIPTIONS_ARTIFACT},
    errors::ScriptError,
    solidity::{
        IOwnable::{self, IOwnableInstance},
        Subscriptions,
    },
    types::{Subscription, SubscriptionsParams},
    utils::read_bytecode,
};

/// The provider type used for deployments, with the deployer's wallet attached
pub type DeployClient = DynProvider<Ethereum>;

/// A deployed contract whose administrative control can be handed over
pub trait OwnableContract {
    /// The address of the deployed contract
    fn address(&self) -> Address;

    /// Transfer ownership of the contract to `new_owner`
    async fn transfer_ownership(&self, new_owner: Address) -> Result<TxHash, ScriptError>;
}

/// Deploys the contracts of the subscriptions system
pub trait Deployer {
    /// The handle returned for a deployed registry
    type Registry: OwnableContract;

    /// Deploy the subscriptions contract, returning its address
    async fn deploy_subscriptions(
        &self,
        params: SubscriptionsParams,
        signer: &PrivateKeySigner,
    ) -> Result<Address, ScriptError>;

    /// Deploy the registry contract, returning a handle to it
    async fn deploy_registry(
        &self,
        signer: &PrivateKeySigner,
    ) -> Result<Self::Registry, ScriptError>;

    /// Read `user`'s subscription from a deployed subscriptions contract
    async fn subscription(
        &self,
        contract: Address,
        user: Address,
    ) -> Result<Subscription, ScriptError>;
}

// ----------------
// | RPC Deployer |
// ----------------

/// Deploys contracts over JSON-RPC from compiled bytecode artifacts
pub struct RpcDeployer {
    /// The network RPC URL
    rpc_url: Url,
    /// The directory holding the compiled contract artifacts
    artifacts_dir: PathBuf,
    /// The number of confirmations to wait for on each transaction
    confirmations: u64,
}

impl RpcDeployer {
    /// Create a deployer for the given network and artifacts directory
    pub fn new(
        rpc_url: &str,
        artifacts_dir: PathBuf,
        confirmations: u64,
    ) -> Result<Self, ScriptError> {
        let rpc_url =
            Url::parse(rpc_url).map_err(|e| ScriptError::ClientInitialization(e.to_string()))?;

        Ok(Self {
            rpc_url,
            artifacts_dir,
            confirmations,
        })
    }

    /// Connect to the network with the given signer attached
    pub fn client(&self, signer: &PrivateKeySigner) -> DeployClient {
        let provider = ProviderBuilder::new()
            .wallet(signer.clone())
            .connect_http(self.rpc_url.clone());
        DynProvider::new(provider)
    }

    /// Send a contract creation transaction for `artifact`, with the given
    /// ABI-encoded constructor arguments appended to its bytecode
    async fn deploy_artifact(
        &self,
        artifact: &str,
        constructor_args: &[u8],
        signer: &PrivateKeySigner,
    ) -> Result<(Address, DeployClient), ScriptError> {
        let bytecode = read_bytecode(&self.artifacts_dir, artifact)?;
        let deploy_code = [bytecode.as_ref(), constructor_args].concat();

        let client = self.client(signer);
        let tx = TransactionRequest::default()
            .with_from(signer.address())
            .with_deploy_code(deploy_code);

        let receipt = client
            .send_transaction(tx)
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractDeployment(e.to_string()))?;

        let address = deployed_address(&receipt)?;
        info!(
            "{} deployed at {:#x} in tx {:#x}",
            artifact, address, receipt.transaction_hash
        );

        Ok((address, client))
    }
}

impl Deployer for RpcDeployer {
    type Registry = RegistryContract;

    async fn deploy_subscriptions(
        &self,
        params: SubscriptionsParams,
        signer: &PrivateKeySigner,
    ) -> Result<Address, ScriptError> {
        let (address, _) = self
            .deploy_artifact(SUBSCRIPTIONS_ARTIFACT, &params.abi_encode(), signer)
            .await?;
        Ok(address)
    }

    async fn deploy_registry(
        &self,
        signer: &PrivateKeySigner,
    ) -> Result<RegistryContract, ScriptError> {
        let (address, client) = self
            .deploy_artifact(REGISTRY_ARTIFACT, &[], signer)
            .await?;

        Ok(RegistryContract {
            contract: IOwnable::new(address, client),
            confirmations: self.confirmations,
        })
    }

    async fn subscription(
        &self,
        contract: Address,
        user: Address,
    ) -> Result<Subscription, ScriptError> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let subscriptions = Subscriptions::new(contract, DynProvider::new(provider));

        let sub = subscriptions
            .subscriptions(user)
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        Subscription::try_from((sub.start, sub.end, sub.rate))
    }
}

/// Extract the created contract's address from a deployment receipt
fn deployed_address(receipt: &TransactionReceipt) -> Result<Address, ScriptError> {
    if !receipt.status() {
        return Err(ScriptError::ContractDeployment(format!(
            "deployment tx {:#x} reverted",
            receipt.transaction_hash
        )));
    }

    receipt.contract_address.ok_or_else(|| {
        ScriptError::ContractDeployment(format!(
            "no contract address in receipt for tx {:#x}",
            receipt.transaction_hash
        ))
    })
}

/// A deployed registry contract, bound to the deployer's client
pub struct RegistryContract {
    /// The ownable interface of the registry
    contract: IOwnableInstance<DeployClient, Ethereum>,
    /// The number of confirmations to wait for on each transaction
    confirmations: u64,
}

impl OwnableContract for RegistryContract {
    fn address(&self) -> Address {
        *self.contract.address()
    }

    async fn transfer_ownership(&self, new_owner: Address) -> Result<TxHash, ScriptError> {
        let receipt = self
            .contract
            .transferOwnership(new_owner)
            .send()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?
            .with_required_confirmations(self.confirmations)
            .get_receipt()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;

        if !receipt.status() {
            return Err(ScriptError::ContractInteraction(format!(
                "ownership transfer tx {:#x} reverted",
                receipt.transaction_hash
            )));
        }

        let owner = self
            .contract
            .owner()
            .call()
            .await
            .map_err(|e| ScriptError::ContractInteraction(e.to_string()))?;
        if owner != new_owner {
            return Err(ScriptError::ContractInteraction(format!(
                "owner is {:#x} after transfer to {:#x}",
                owner, new_owner
            )));
        }

        Ok(receipt.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use alloy::primitives::address;
    use tempfile::tempdir;

    use super::*;

    /// A throwaway signer for requests that never reach a node
    fn test_signer() -> PrivateKeySigner {
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
            .parse()
            .unwrap()
    }

    #[test]
    fn rejects_malformed_rpc_url() {
        assert!(matches!(
            RpcDeployer::new("not a url", PathBuf::new(), 1),
            Err(ScriptError::ClientInitialization(_))
        ));
    }

    #[tokio::test]
    async fn missing_artifact_fails_before_sending() {
        let dir = tempdir().unwrap();
        // Nothing listens on this port; reaching the network would fail differently
        let deployer = RpcDeployer::new("http://127.0.0.1:1", dir.path().to_path_buf(), 1).unwrap();
        let signer = test_signer();

        let res = deployer
            .deploy_subscriptions(
                SubscriptionsParams {
                    token: address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"),
                    epoch_seconds: 3,
                },
                &signer,
            )
            .await;
        assert!(matches!(res, Err(ScriptError::ArtifactParsing(_))));
    }

    #[tokio::test]
    async fn unreachable_node_is_a_deployment_error() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Registry.bin"), "0x6080604052").unwrap();
        let deployer = RpcDeployer::new("http://127.0.0.1:1", dir.path().to_path_buf(), 1).unwrap();
        let signer = test_signer();

        let res = deployer.deploy_registry(&signer).await;
        assert!(matches!(res, Err(ScriptError::ContractDeployment(_))));
    }

    #[tokio::test]
    async fn unreachable_node_fails_subscription_read() {
        let deployer = RpcDeployer::new("http://127.0.0.1:1", PathBuf::new(), 1).unwrap();

        let res = deployer
            .subscription(
                address!("dddddddddddddddddddddddddddddddddddddddd"),
                address!("bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb"),
            )
            .await;
        assert!(matches!(res, Err(ScriptError::ContractInteraction(_))));
    }
}
