//! Compile command - fetch a prompt version and render it

use std::io::Write;

use anyhow::anyhow;
use clap::Args;

use super::{init_client, ClientArgs};
use crate::domain::VariableMapping;
use crate::PromptClient;

#[derive(Args, Clone, Debug)]
pub struct CompileArgs {
    /// Prompt reference, `slug@version` or `slug` for latest
    pub reference: String,

    /// Variable as key=value, may be repeated
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Print the full compile result as JSON
    #[arg(long)]
    pub json: bool,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

pub async fn run(args: CompileArgs, client_args: &ClientArgs) -> anyhow::Result<()> {
    let client = init_client(client_args)?;
    execute(args, &client, &mut std::io::stdout().lock()).await
}

async fn execute(
    args: CompileArgs,
    client: &PromptClient,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let variables: VariableMapping = args.vars.into_iter().collect();

    let prompt = client.get_prompt(&args.reference).await?;
    let compiled = prompt
        .compile(&variables)
        .map_err(|e| anyhow!("Failed to compile '{}': {}", prompt.reference(), e))?;

    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&compiled)?)?;
    } else {
        writeln!(out, "{}", compiled)?;
    }

    Ok(())
}
