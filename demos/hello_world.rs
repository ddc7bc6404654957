//! Fetch `hello-world@0.0.1` and render it for John.
//!
//! Credentials come from `PROMPT_CLIENT__CLIENT__API_KEY` and
//! `PROMPT_CLIENT__CLIENT__TENANT_ID`.

use std::collections::HashMap;

use pmp_prompt_client::PromptClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let api_key = std::env::var("PROMPT_CLIENT__CLIENT__API_KEY")?;
    let tenant_id = std::env::var("PROMPT_CLIENT__CLIENT__TENANT_ID")?;

    let client = PromptClient::new(api_key, tenant_id);

    let hello_world_prompt = client.get_prompt("hello-world@0.0.1").await?;

    let compiled_prompt = hello_world_prompt.compile(&HashMap::from([(
        "name".to_string(),
        "John".to_string(),
    )]))?;

    println!("{}", compiled_prompt);

    Ok(())
}
