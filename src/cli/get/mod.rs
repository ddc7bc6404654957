//! Get command - fetch a prompt version and print it

use std::io::Write;

use clap::Args;

use super::{init_client, ClientArgs};
use crate::PromptClient;

#[derive(Args, Clone, Debug)]
pub struct GetArgs {
    /// Prompt reference, `slug@version` or `slug` for latest
    pub reference: String,
}

pub async fn run(args: GetArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    let client = init_client(client_args)?;
    execute(&args, &client, &mut std::io::stdout().lock()).await
}

async fn execute(
    args: &GetArgs,
    client: &PromptClient,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let prompt = client.get_prompt(&args.reference).await?;

    writeln!(out, "{}", serde_json::to_string_pretty(&prompt)?)?;

    Ok(())
}
