//! Suggest command implementation

use crate::cli::output::{format_suggestions_json, format_suggestions_table};
use crate::cli::{load_config_with_overrides, SuggestArgs};
use crate::fetcher::{delivery_channel, SuggestionFetcher};
use crate::logging::init_tracing;
use crate::provider::factory::create_provider;
use crate::provider::PlacesProvider;
use std::sync::Arc;

/// Handle `waypoint suggest` command
pub async fn run_suggest(args: SuggestArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.config, args.log_level.as_deref())?;
    init_tracing(&config.logging)?;

    let provider = create_provider(&config.provider, Arc::new(reqwest::Client::new()))?;
    let output = suggest(provider, &args.query, args.json).await?;
    println!("{}", output);
    Ok(())
}

/// Look up suggestions for a single query and format them.
pub async fn suggest(
    provider: Arc<dyn PlacesProvider>,
    query: &str,
    json: bool,
) -> Result<String, Box<dyn std::error::Error>> {
    // One-shot lookup; nothing listens for deliveries.
    let (tx, _rx) = delivery_channel();
    let fetcher = SuggestionFetcher::new(provider, tx);
    let suggestions = fetcher.lookup(query).await?;

    if json {
        return Ok(format_suggestions_json(&suggestions)?);
    }
    if suggestions.is_empty() {
        return Ok(format!("No suggestions for '{}'", query.trim()));
    }
    Ok(format_suggestions_table(&suggestions))
}
