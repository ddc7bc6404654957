use clap::Parser;
use pmp_prompt_client::cli::{self, Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Get(args) => cli::get::run(args, &cli.client).await,
        Command::Compile(args) => cli::compile::run(args, &cli.client).await,
    }
}
