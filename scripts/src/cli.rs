//! Definitions of CLI arguments and commands for deploy scripts

use std::path::{Path, PathBuf};

use alloy::signers::local::PrivateKeySigner;
use clap::{Args, Parser, Subcommand};

use crate::{
    accounts::load_accounts,
    commands::{
        create_ticket, deploy_registry, deploy_subscriptions, show_subscription, verify_ticket,
    },
    constants::{
        DEFAULT_ARTIFACTS_DIR, DEFAULT_CONFIRMATIONS, DEFAULT_EPOCH_SECONDS, DEFAULT_RPC_URL,
        MNEMONIC_ACCOUNT_COUNT, MNEMONIC_ENV_VAR, PRIVATE_KEY_ENV_VAR, RPC_URL_ENV_VAR,
    },
    deployer::Deployer,
    errors::ScriptError,
};

/// Deploy the subscriptions contracts to an EVM chain
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Private key of the deployer
    #[arg(short, long, env = PRIVATE_KEY_ENV_VAR, hide_env_values = true)]
    pub priv_key: Option<String>,

    /// Mnemonic from which the deployer accounts are derived,
    /// used when no private key is given
    #[arg(short, long, env = MNEMONIC_ENV_VAR, hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Network RPC URL
    #[arg(short, long, env = RPC_URL_ENV_VAR, default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Directory containing the compiled contract artifacts
    #[arg(short, long, default_value = DEFAULT_ARTIFACTS_DIR)]
    pub artifacts_dir: PathBuf,

    /// Path to the deployments file in which to record deployed addresses
    #[arg(short, long)]
    pub deployments_path: Option<PathBuf>,

    /// Number of confirmations to wait for on each transaction
    #[arg(short, long, default_value_t = DEFAULT_CONFIRMATIONS)]
    pub confirmations: u64,

    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// The signing accounts available to the deploy commands
    pub fn accounts(&self) -> Result<Vec<PrivateKeySigner>, ScriptError> {
        load_accounts(
            self.priv_key.as_deref(),
            self.mnemonic.as_deref(),
            MNEMONIC_ACCOUNT_COUNT,
        )
    }
}

/// The deploy commands
#[derive(Subcommand)]
pub enum Command {
    /// Deploy the subscriptions contract
    #[command(name = "deploy")]
    Deploy(DeployArgs),
    /// Deploy the registry contract
    #[command(name = "deploy:registry")]
    DeployRegistry(DeployRegistryArgs),
    /// Read a user's subscription from a deployed subscriptions contract
    #[command(name = "subscription")]
    Subscription(SubscriptionArgs),
    /// Sign a ticket for a subscriptions contract with the first account
    #[command(name = "ticket")]
    Ticket(TicketArgs),
    /// Decode a ticket and verify its signature
    #[command(name = "verify-ticket")]
    VerifyTicket(VerifyTicketArgs),
}

impl Command {
    /// Run the command with the given accounts and deployer
    pub async fn run<D: Deployer>(
        self,
        accounts: &[PrivateKeySigner],
        deployer: &D,
        deployments_path: Option<&Path>,
    ) -> Result<(), ScriptError> {
        match self {
            Command::Deploy(args) => {
                deploy_subscriptions(args, accounts, deployer, deployments_path).await?;
            }
            Command::DeployRegistry(args) => {
                deploy_registry(args, accounts, deployer, deployments_path).await?;
            }
            Command::Subscription(args) => {
                show_subscription(args, deployer).await?;
            }
            Command::Ticket(args) => {
                let ticket = create_ticket(args, accounts)?;
                println!("{}", ticket);
            }
            Command::VerifyTicket(args) => {
                let payload = verify_ticket(args)?;
                println!("{:#?}", payload);
            }
        }

        Ok(())
    }
}

/// Deploy the subscriptions contract.
///
/// The contract is constructed with `[token, epochSeconds]` from the first
/// available account.
#[derive(Args)]
pub struct DeployArgs {
    /// Address of the ERC20 token in which subscriptions are paid
    #[arg(short, long)]
    pub token: String,

    /// Length of a subscription epoch, in seconds
    #[arg(
        short,
        long = "epochSeconds",
        visible_alias = "epoch-seconds",
        default_value_t = DEFAULT_EPOCH_SECONDS
    )]
    pub epoch_seconds: u64,
}

/// Deploy the registry contract, optionally handing ownership to a new owner
#[derive(Args)]
pub struct DeployRegistryArgs {
    /// Address to transfer ownership of the registry to.
    ///
    /// Ownership stays with the deployer if omitted or not a valid address.
    #[arg(short, long)]
    pub owner: Option<String>,
}

/// Read a user's subscription
#[derive(Args)]
pub struct SubscriptionArgs {
    /// Address of the subscriptions contract
    #[arg(short, long)]
    pub contract: String,

    /// Address of the subscriber
    #[arg(short, long)]
    pub user: String,
}

/// Sign a ticket authorizing queries against a subscription
#[derive(Args)]
pub struct TicketArgs {
    /// Address of the subscriptions contract
    #[arg(long)]
    pub contract: String,

    /// EIP-155 ID of the chain the contract is deployed on
    #[arg(long)]
    pub chain_id: u64,

    /// The subscriber, if not the signing account
    #[arg(long)]
    pub user: Option<String>,

    /// A name for the ticket
    #[arg(long)]
    pub name: Option<String>,

    /// Comma-separated subgraphs the ticket may query
    #[arg(long)]
    pub allowed_subgraphs: Option<String>,

    /// Comma-separated subgraph deployments the ticket may query
    #[arg(long)]
    pub allowed_deployments: Option<String>,

    /// Comma-separated origin domains that may send queries with the ticket
    #[arg(long)]
    pub allowed_domains: Option<String>,
}

/// Verify a ticket
#[derive(Args)]
pub struct VerifyTicketArgs {
    /// The base64 encoded ticket
    pub ticket: String,
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn deploy_defaults_epoch_seconds() {
        let cli = Cli::try_parse_from(["deploy-scripts", "deploy", "--token", "0xaaaa"]).unwrap();
        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy command");
        };
        assert_eq!(args.token, "0xaaaa");
        assert_eq!(args.epoch_seconds, 3);
    }

    #[test]
    fn deploy_forwards_epoch_seconds() {
        for flag in ["--epochSeconds", "--epoch-seconds"] {
            let cli =
                Cli::try_parse_from(["deploy-scripts", "deploy", "--token", "0xaaaa", flag, "10"])
                    .unwrap();
            let Command::Deploy(args) = cli.command else {
                panic!("expected deploy command");
            };
            assert_eq!(args.epoch_seconds, 10);
        }
    }

    #[test]
    fn deploy_requires_token() {
        assert!(Cli::try_parse_from(["deploy-scripts", "deploy"]).is_err());
    }

    #[test]
    fn registry_owner_is_optional() {
        let cli = Cli::try_parse_from(["deploy-scripts", "deploy:registry"]).unwrap();
        let Command::DeployRegistry(args) = cli.command else {
            panic!("expected deploy:registry command");
        };
        assert!(args.owner.is_none());

        let cli = Cli::try_parse_from(["deploy-scripts", "deploy:registry", "--owner", "0xbbbb"])
            .unwrap();
        let Command::DeployRegistry(args) = cli.command else {
            panic!("expected deploy:registry command");
        };
        assert_eq!(args.owner.as_deref(), Some("0xbbbb"));
    }

    #[test]
    fn subscription_requires_contract_and_user() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "subscription",
            "--contract",
            "0xdddd",
            "--user",
            "0xbbbb",
        ])
        .unwrap();
        let Command::Subscription(args) = cli.command else {
            panic!("expected subscription command");
        };
        assert_eq!(args.contract, "0xdddd");
        assert_eq!(args.user, "0xbbbb");

        assert!(Cli::try_parse_from(["deploy-scripts", "subscription", "-c", "0xdddd"]).is_err());
    }

    #[test]
    fn ticket_claims_parse() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "ticket",
            "--contract",
            "0xdddd",
            "--chain-id",
            "1337",
            "--allowed-domains",
            "example.com",
        ])
        .unwrap();
        let Command::Ticket(args) = cli.command else {
            panic!("expected ticket command");
        };
        assert_eq!(args.chain_id, 1337);
        assert!(args.user.is_none());
        assert_eq!(args.allowed_domains.as_deref(), Some("example.com"));
    }

    #[test]
    fn verify_ticket_takes_positional_ticket() {
        let cli = Cli::try_parse_from(["deploy-scripts", "verify-ticket", "abcd"]).unwrap();
        let Command::VerifyTicket(args) = cli.command else {
            panic!("expected verify-ticket command");
        };
        assert_eq!(args.ticket, "abcd");
    }

    #[test]
    fn global_options_parse() {
        let cli = Cli::try_parse_from([
            "deploy-scripts",
            "--priv-key",
            "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80",
            "--rpc-url",
            "http://localhost:8547",
            "--deployments-path",
            "deployments.json",
            "--confirmations",
            "3",
            "deploy:registry",
        ])
        .unwrap();

        assert_eq!(cli.rpc_url, "http://localhost:8547");
        assert_eq!(cli.confirmations, 3);
        assert_eq!(cli.deployments_path, Some(PathBuf::from("deployments.json")));
        assert_eq!(cli.accounts().unwrap().len(), 1);
    }
}
