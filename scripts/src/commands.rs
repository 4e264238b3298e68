//! Implementations of the deploy commands

use std::path::Path;

use alloy::{primitives::Address, signers::local::PrivateKeySigner};
use tracing::{info, warn};

use crate::{
    accounts::first_account,
    cli::{DeployArgs, DeployRegistryArgs, SubscriptionArgs, TicketArgs, VerifyTicketArgs},
    constants::{REGISTRY_CONTRACT_KEY, SUBSCRIPTIONS_CONTRACT_KEY},
    deployer::{Deployer, OwnableContract},
    errors::ScriptError,
    tickets::TicketPayload,
    types::{Subscription, SubscriptionsParams},
    utils::{is_address, parse_address, write_deployed_address},
};

/// Deploy the subscriptions contract from the first available account
pub async fn deploy_subscriptions<D: Deployer>(
    args: DeployArgs,
    accounts: &[PrivateKeySigner],
    deployer: &D,
    deployments_path: Option<&Path>,
) -> Result<Address, ScriptError> {
    let signer = first_account(accounts)?;
    info!("Deploying subscriptions with account {:#x}", signer.address());

    let params = SubscriptionsParams {
        token: parse_address(&args.token)?,
        epoch_seconds: args.epoch_seconds,
    };
    let address = deployer.deploy_subscriptions(params, signer).await?;
    info!(
        "Subscriptions contract deployed at {:#x} (token {:#x}, epoch {}s)",
        address, params.token, params.epoch_seconds
    );

    record_deployment(deployments_path, SUBSCRIPTIONS_CONTRACT_KEY, address)?;
    Ok(address)
}

/// Deploy the registry contract from the first available account,
/// handing ownership to `args.owner` when it is a valid address
pub async fn deploy_registry<D: Deployer>(
    args: DeployRegistryArgs,
    accounts: &[PrivateKeySigner],
    deployer: &D,
    deployments_path: Option<&Path>,
) -> Result<Address, ScriptError> {
    let signer = first_account(accounts)?;
    info!("Deploying registry with account {:#x}", signer.address());

    let registry = deployer.deploy_registry(signer).await?;
    let address = registry.address();
    info!("Registry contract deployed at {:#x}", address);
    record_deployment(deployments_path, REGISTRY_CONTRACT_KEY, address)?;

    match args.owner.as_deref().filter(|owner| !owner.is_empty()) {
        Some(owner) if is_address(owner) => {
            let new_owner = parse_address(owner)?;
            info!(
                "Transferring registry ownership from {:#x} to {:#x}",
                signer.address(),
                new_owner
            );
            let tx_hash = registry.transfer_ownership(new_owner).await?;
            info!("Ownership transferred in tx {:#x}", tx_hash);
        }
        Some(owner) => {
            warn!(
                "Ignoring owner `{}`: not a valid address, ownership not transferred",
                owner
            );
        }
        None => {}
    }

    Ok(address)
}

/// Read a user's subscription from a deployed subscriptions contract
pub async fn show_subscription<D: Deployer>(
    args: SubscriptionArgs,
    deployer: &D,
) -> Result<Subscription, ScriptError> {
    let contract = parse_address(&args.contract)?;
    let user = parse_address(&args.user)?;

    let sub = deployer.subscription(contract, user).await?;
    info!(
        "Subscription of {:#x}: {} to {} at rate {}",
        user, sub.start, sub.end, sub.rate
    );

    Ok(sub)
}

/// Sign a ticket for the subscriptions contract with the first available account
pub fn create_ticket(
    args: TicketArgs,
    accounts: &[PrivateKeySigner],
) -> Result<String, ScriptError> {
    let signer = first_account(accounts)?;

    let payload = TicketPayload {
        chain_id: args.chain_id,
        contract: parse_address(&args.contract)?,
        signer: signer.address(),
        user: args.user.as_deref().map(parse_address).transpose()?,
        name: args.name,
        allowed_subgraphs: args.allowed_subgraphs,
        allowed_deployments: args.allowed_deployments,
        allowed_domains: args.allowed_domains,
    };
    info!(
        "Signing ticket for {:#x} with account {:#x}",
        payload.user(),
        signer.address()
    );

    payload.to_ticket_base64(signer)
}

/// Decode a ticket and check its signature
pub fn verify_ticket(args: VerifyTicketArgs) -> Result<TicketPayload, ScriptError> {
    let (payload, _) = TicketPayload::from_ticket_base64(args.ticket.trim())?;
    info!(
        "Ticket signed by {:#x} for {:#x} on chain {}",
        payload.signer,
        payload.user(),
        payload.chain_id
    );

    Ok(payload)
}

/// Write the deployed address to the deployments file, if one is configured
fn record_deployment(
    deployments_path: Option<&Path>,
    contract_key: &str,
    address: Address,
) -> Result<(), ScriptError> {
    if let Some(path) = deployments_path {
        write_deployed_address(path, contract_key, address)?;
        info!("Recorded {} in {}", contract_key, path.display());
    }

    Ok(())
}
