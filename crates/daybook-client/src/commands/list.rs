//! `daybook list`

use daybook_core::{Event, FormatOptions, event_block, filter_events};

use crate::cli::ListArgs;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

use super::build_store;

pub async fn run(args: &ListArgs, config: &ClientConfig) -> ClientResult<()> {
    let store = build_store(config)?;
    let events = store.list_events().await?;
    let term = args.query.as_deref().unwrap_or("");
    let shown = filter_events(&events, term, args.view());

    if args.json {
        let json = serde_json::to_string_pretty(&shown)
            .map_err(|e| ClientError::Config(format!("failed to serialize events: {}", e)))?;
        println!("{}", json);
        return Ok(());
    }

    let mut options = FormatOptions::default().with_ids(args.ids || config.display.show_ids);
    if let Some(max) = args.max_title_length.or(config.display.max_title_length) {
        options = options.with_max_title_length(max);
    }
    println!("{}", render(&shown, &options));
    Ok(())
}

/// Renders a listing, one block per event separated by blank lines.
pub fn render(events: &[&Event], options: &FormatOptions) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    events
        .iter()
        .map(|event| event_block(event, options))
        .collect::<Vec<_>>()
        .join("\n\n")
}
