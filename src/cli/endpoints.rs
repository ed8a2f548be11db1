//! Endpoints command handlers

use super::output::{
    format_endpoint_detail, format_endpoints_table, format_json, format_test_outcome,
};
use super::{EndpointCreateArgs, EndpointIdArgs, EndpointUpdateArgs, EndpointsCommands, JsonArgs};
use crate::client::ApiClient;
use crate::model::{EndpointDraft, Headers};
use crate::views::EndpointsView;
use anyhow::Context;

/// Join repeated `-H "Key: Value"` flags into a header mapping.
pub fn headers_from_flags(flags: &[String]) -> Headers {
    Headers::parse(&flags.join("\n"))
}

/// Draft for `endpoints create`
pub fn draft_from_create(args: &EndpointCreateArgs) -> EndpointDraft {
    EndpointDraft {
        name: args.name.clone(),
        url: args.url.clone(),
        method: args.method,
        headers: headers_from_flags(&args.headers),
        body: args.body.clone(),
        recurring_interval: args.every,
    }
}

/// Apply `endpoints update` flags on top of the current endpoint.
pub fn apply_update(mut draft: EndpointDraft, args: &EndpointUpdateArgs) -> EndpointDraft {
    if let Some(name) = &args.name {
        draft.name = name.clone();
    }
    if let Some(url) = &args.url {
        draft.url = url.clone();
    }
    if let Some(method) = args.method {
        draft.method = method;
    }
    if args.clear_headers {
        draft.headers = Headers::new();
    } else if !args.headers.is_empty() {
        draft.headers = headers_from_flags(&args.headers);
    }
    if let Some(body) = &args.body {
        draft.body = Some(body.clone());
    }
    if args.no_recurring {
        draft.recurring_interval = None;
    } else if let Some(every) = args.every {
        draft.recurring_interval = Some(every);
    }
    draft
}

/// Handle `pingpad endpoints ...`
pub async fn handle_endpoints(cmd: EndpointsCommands, client: ApiClient) -> anyhow::Result<String> {
    let mut view = EndpointsView::new(client.clone());

    match cmd {
        EndpointsCommands::List(JsonArgs { json }) => {
            view.refresh().await;
            if let Some(error) = view.error() {
                anyhow::bail!("{}", error);
            }
            if json {
                format_json(view.endpoints())
            } else {
                Ok(format_endpoints_table(view.endpoints()))
            }
        }
        EndpointsCommands::Show(EndpointIdArgs { id, json }) => {
            let endpoint = client
                .get_endpoint(&id)
                .await
                .with_context(|| format!("Failed to load endpoint {}", id))?;
            if json {
                format_json(&endpoint)
            } else {
                Ok(format_endpoint_detail(&endpoint))
            }
        }
        EndpointsCommands::Create(args) => {
            let endpoint = view.create(&draft_from_create(&args)).await?;
            if args.json {
                format_json(&endpoint)
            } else {
                Ok(format!("✓ Created endpoint '{}' ({})", endpoint.name, endpoint.id))
            }
        }
        EndpointsCommands::Update(args) => {
            let current = client
                .get_endpoint(&args.id)
                .await
                .with_context(|| format!("Failed to load endpoint {}", args.id))?;
            let draft = apply_update(EndpointDraft::from_endpoint(&current), &args);
            let endpoint = view.update(&args.id, &draft).await?;
            if args.json {
                format_json(&endpoint)
            } else {
                Ok(format!("✓ Updated endpoint '{}' ({})", endpoint.name, endpoint.id))
            }
        }
        EndpointsCommands::Delete(EndpointIdArgs { id, .. }) => {
            view.delete(&id).await?;
            Ok(format!("✓ Deleted endpoint {}", id))
        }
        EndpointsCommands::Test(EndpointIdArgs { id, json }) => {
            let outcome = view.run_test(&id).await?;
            if json {
                format_json(&outcome.result)
            } else {
                Ok(format_test_outcome(&outcome))
            }
        }
    }
}
