//! API-key command handlers

use super::output::{format_api_keys_table, format_json};
use super::KeysCommands;
use crate::client::ApiClient;

/// Handle `pingpad keys ...`
pub async fn handle_keys(cmd: KeysCommands, client: ApiClient) -> anyhow::Result<String> {
    match cmd {
        KeysCommands::List(args) => {
            let keys = client.list_api_keys().await?.records;
            if args.json {
                if args.reveal {
                    return format_json(&keys);
                }
                let masked: Vec<_> = keys
                    .into_iter()
                    .map(|mut k| {
                        k.key_value = k.masked_value();
                        k
                    })
                    .collect();
                format_json(&masked)
            } else {
                Ok(format_api_keys_table(&keys, args.reveal))
            }
        }
        KeysCommands::Add(args) => {
            let key = client.create_api_key(&args.name, &args.value).await?;
            Ok(format!("✓ Stored API key '{}' ({})", key.name, key.id))
        }
        KeysCommands::Update(args) => {
            let key = client
                .update_api_key(&args.id, &args.name, args.value.as_deref())
                .await?;
            Ok(format!("✓ Updated API key '{}' ({})", key.name, key.id))
        }
        KeysCommands::Delete(args) => {
            client.delete_api_key(&args.id).await?;
            Ok(format!("✓ Deleted API key {}", args.id))
        }
    }
}
