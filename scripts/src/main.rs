use clap::Parser;
use scripts::{cli::Cli, deployer::RpcDeployer, errors::ScriptError};

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let accounts = cli.accounts()?;
    let deployer = RpcDeployer::new(&cli.rpc_url, cli.artifacts_dir, cli.confirmations)?;

    cli.command
        .run(&accounts, &deployer, cli.deployments_path.as_deref())
        .await
}
