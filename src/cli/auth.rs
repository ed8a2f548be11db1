//! Session and profile command handlers

use super::output::{format_json, format_user};
use super::{JsonArgs, ProfileCommands, TokenOutputArgs};
use crate::client::ApiClient;
use crate::model::AuthGrant;

/// Render a freshly issued token.
///
/// With `--token-only` the bare token is printed so it can be captured into
/// `PINGPAD_TOKEN`.
pub fn format_grant(grant: &AuthGrant, output: &TokenOutputArgs) -> String {
    if output.token_only {
        return grant.token.clone();
    }
    let who = grant
        .user
        .as_ref()
        .map(format_user)
        .unwrap_or_else(|| "unknown user".to_string());
    format!(
        "✓ Logged in as {}\n  export PINGPAD_TOKEN={}",
        who, grant.token
    )
}

pub async fn handle_login(
    client: ApiClient,
    email: &str,
    password: &str,
    output: &TokenOutputArgs,
) -> anyhow::Result<String> {
    let grant = client.login(email, password).await?;
    Ok(format_grant(&grant, output))
}

pub async fn handle_register(
    client: ApiClient,
    email: &str,
    name: &str,
    password: &str,
    output: &TokenOutputArgs,
) -> anyhow::Result<String> {
    let grant = client.register(email, name, password).await?;
    Ok(format_grant(&grant, output))
}

pub async fn handle_login_as_test(
    client: ApiClient,
    output: &TokenOutputArgs,
) -> anyhow::Result<String> {
    let grant = client.login_as_test().await?;
    Ok(format_grant(&grant, output))
}

/// Handle `pingpad whoami`
pub async fn handle_whoami(client: ApiClient, args: &JsonArgs) -> anyhow::Result<String> {
    let user = client.me().await?;
    if args.json {
        format_json(&user)
    } else {
        Ok(format_user(&user))
    }
}

/// Handle `pingpad profile ...`
pub async fn handle_profile(cmd: ProfileCommands, client: ApiClient) -> anyhow::Result<String> {
    match cmd {
        ProfileCommands::Rename(args) => {
            let user = client.update_profile(&args.name).await?;
            Ok(format!("✓ Profile updated: {}", format_user(&user)))
        }
        ProfileCommands::Password(args) => {
            client.change_password(&args.current, &args.new).await?;
            Ok("✓ Password changed".to_string())
        }
    }
}
