//! Planning session.
//!
//! A `Session` is the single controller of a route form: it owns the
//! `FormState`, the receiving end of the delivery channel and the shared
//! provider handle. Field state is only ever mutated from the task driving
//! the session; lookups run on spawned tasks and come back as deliveries.

pub mod command;
mod error;

pub use command::{parse_line, CommandError, FieldRef, SelectTarget, ShellCommand, HELP};
pub use error::{ResolveError, SubmitError};

use crate::config::WaypointConfig;
use crate::fetcher::{delivery_channel, DeliveryReceiver, SuggestionFetcher};
use crate::field::{is_current, FieldId, FieldState};
use crate::form::{DeliveryOutcome, FormState};
use crate::provider::factory::create_provider;
use crate::provider::{
    PlacesProvider, ProviderError, RouteRenderer, RouteRequest, RouteResult, Suggestion,
};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub struct Session {
    form: FormState,
    provider: Arc<dyn PlacesProvider>,
    deliveries: DeliveryReceiver,
}

impl Session {
    /// Start a session around an already constructed provider.
    pub fn new(provider: Arc<dyn PlacesProvider>, config: &WaypointConfig) -> Self {
        let (tx, rx) = delivery_channel();
        let fetcher = SuggestionFetcher::new(Arc::clone(&provider), tx)
            .with_query_logging(config.logging.log_queries);
        Self {
            form: FormState::new(&config.form, fetcher),
            provider,
            deliveries: rx,
        }
    }

    /// Build the provider from configuration and start a session.
    pub fn from_config(config: &WaypointConfig) -> Result<Self, ProviderError> {
        let client = Arc::new(reqwest::Client::new());
        let provider = create_provider(&config.provider, client)?;
        tracing::info!(provider = provider.name(), "Session started");
        Ok(Self::new(provider, config))
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn provider(&self) -> &Arc<dyn PlacesProvider> {
        &self.provider
    }

    /// Wait for the next delivery and apply it to the form.
    ///
    /// Returns `None` once the delivery channel is closed.
    pub async fn apply_next_delivery(&mut self) -> Option<(FieldId, DeliveryOutcome)> {
        let delivery = self.deliveries.recv().await?;
        let field_id = delivery.field_id;
        Some((field_id, self.form.apply_delivery(delivery)))
    }

    /// Type `text` into a field, wait for its suggestions and confirm the
    /// best one.
    pub async fn resolve(&mut self, id: FieldId, text: &str) -> Result<Suggestion, ResolveError> {
        let mut resolved = self.resolve_all(&[(id, text.to_string())]).await?;
        resolved.pop().ok_or(ResolveError::UnknownField(id))
    }

    /// Resolve several fields at once. Lookups for different fields run
    /// concurrently; the selections are returned in input order.
    ///
    /// Stops on the first field that cannot be resolved.
    pub async fn resolve_all(
        &mut self,
        entries: &[(FieldId, String)],
    ) -> Result<Vec<Suggestion>, ResolveError> {
        let mut waiting: HashMap<FieldId, String> = HashMap::new();
        for (id, text) in entries {
            if self.form.field(*id).is_none() {
                return Err(ResolveError::UnknownField(*id));
            }
            self.form.update_field(*id, text);
            if self.form.field(*id).map(|f| f.state()) != Some(FieldState::Editing) {
                return Err(ResolveError::NoSuggestions {
                    query: text.clone(),
                });
            }
            waiting.insert(*id, text.clone());
        }

        let mut chosen: HashMap<FieldId, Suggestion> = HashMap::new();
        while !waiting.is_empty() {
            let delivery = self.deliveries.recv().await.ok_or(ResolveError::Closed)?;
            let field_id = delivery.field_id;
            let current = self
                .form
                .field(field_id)
                .is_some_and(|f| is_current(f.pending_token(), delivery.token));

            if current && waiting.contains_key(&field_id) {
                if let Err(source) = &delivery.outcome {
                    let query = waiting.remove(&field_id).unwrap_or_default();
                    self.form.apply_delivery(delivery.clone());
                    return Err(ResolveError::Provider {
                        query,
                        source: source.clone(),
                    });
                }
            }

            if !matches!(
                self.form.apply_delivery(delivery),
                DeliveryOutcome::Applied { .. }
            ) {
                continue;
            }
            let Some(query) = waiting.remove(&field_id) else {
                continue;
            };

            let best = self
                .form
                .field(field_id)
                .and_then(|f| best_match(&query, f.suggestions()))
                .cloned()
                .ok_or_else(|| ResolveError::NoSuggestions {
                    query: query.clone(),
                })?;

            tracing::debug!(field_id = %field_id, suggestion_id = %best.id, "Address resolved");
            self.form.select_suggestion(field_id, &best);
            chosen.insert(field_id, best);
        }

        Ok(entries
            .iter()
            .filter_map(|(id, _)| chosen.get(id).cloned())
            .collect())
    }

    /// Validate the form and ask the provider for the route.
    ///
    /// The form is left untouched on failure so the user can retry.
    pub async fn submit(&self) -> Result<(RouteRequest, RouteResult), SubmitError> {
        let request = self.form.submit()?;
        tracing::info!(
            provider = self.provider.name(),
            waypoints = request.waypoints.len(),
            optimize = request.optimize,
            "Computing route"
        );

        let route = self
            .provider
            .compute_route(&request)
            .await
            .map_err(SubmitError::Route)?;

        tracing::info!(
            legs = route.legs.len(),
            distance_m = route.total_distance_meters(),
            duration_s = route.total_duration_seconds(),
            "Route computed"
        );
        Ok((request, route))
    }

    /// Run the interactive shell until `quit` or end of input.
    ///
    /// Suggestions are printed as soon as they arrive, interleaved with
    /// command handling.
    pub async fn run<R, W>(
        &mut self,
        input: R,
        out: &mut W,
        renderer: &mut dyn RouteRenderer,
    ) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(out, "Type 'help' for commands.")?;

        loop {
            let event = tokio::select! {
                line = lines.next_line() => Event::Line(line?),
                delivery = self.deliveries.recv() => Event::Delivery(delivery),
            };

            match event {
                Event::Line(None) => break,
                Event::Line(Some(line)) => {
                    if self.execute(&line, out, renderer).await? == Flow::Quit {
                        break;
                    }
                }
                Event::Delivery(None) => break,
                Event::Delivery(Some(delivery)) => {
                    let field_id = delivery.field_id;
                    if let DeliveryOutcome::Applied { .. } = self.form.apply_delivery(delivery) {
                        write_suggestions(&self.form, field_id, out)?;
                    }
                }
            }
            out.flush()?;
        }

        Ok(())
    }

    async fn execute<W: Write>(
        &mut self,
        line: &str,
        out: &mut W,
        renderer: &mut dyn RouteRenderer,
    ) -> std::io::Result<Flow> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(Flow::Continue),
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(Flow::Continue);
            }
        };

        match command {
            ShellCommand::Edit { field, text } => {
                let id = field.resolve(&self.form);
                if self.form.field(id).is_none() {
                    writeln!(out, "No field #{}", id)?;
                } else {
                    self.form.update_field(id, &text);
                }
            }
            ShellCommand::Select { field, target } => {
                let id = field.resolve(&self.form);
                let suggestion_id = match (&target, self.form.field(id)) {
                    (_, None) => {
                        writeln!(out, "No field #{}", id)?;
                        return Ok(Flow::Continue);
                    }
                    (SelectTarget::Index(index), Some(f)) => index
                        .checked_sub(1)
                        .and_then(|i| f.suggestions().get(i))
                        .map(|s| s.id.clone()),
                    (SelectTarget::Id(sid), Some(_)) => Some(sid.clone()),
                };
                match suggestion_id.and_then(|sid| self.form.select_suggestion_by_id(id, &sid)) {
                    Some(selected) => writeln!(out, "{} set to {}", self.label(id), selected.label)?,
                    None => writeln!(out, "No such suggestion for {}", self.label(id))?,
                }
            }
            ShellCommand::Add => {
                let id = self.form.add_stop();
                writeln!(out, "Added {} (#{})", self.label(id), id)?;
            }
            ShellCommand::Remove { field } => {
                let id = field.resolve(&self.form);
                if !self.form.remove_stop(id) {
                    writeln!(out, "#{} is not a stop", id)?;
                }
            }
            ShellCommand::Clear { field } => {
                let id = field.resolve(&self.form);
                self.form.clear_field(id);
            }
            ShellCommand::Optimize(optimize) => {
                self.form.set_optimize_waypoints(optimize);
                writeln!(
                    out,
                    "Waypoint optimization {}",
                    if optimize { "on" } else { "off" }
                )?;
            }
            ShellCommand::Show => write_form(&self.form, out)?,
            ShellCommand::Submit => match self.submit().await {
                Ok((request, route)) => renderer.render_route(&request, &route),
                Err(e) => writeln!(out, "{}", e)?,
            },
            ShellCommand::Help => writeln!(out, "{}", HELP)?,
            ShellCommand::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    fn label(&self, id: FieldId) -> String {
        self.form
            .placeholder(id)
            .unwrap_or_else(|| format!("#{}", id))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("provider", &self.provider.name())
            .field("form", &self.form)
            .finish()
    }
}

enum Event {
    Line(Option<String>),
    Delivery(Option<crate::fetcher::Delivery>),
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Prefer a suggestion whose label equals the query (ignoring case),
/// otherwise the provider's first ranking.
pub fn best_match<'a>(query: &str, suggestions: &'a [Suggestion]) -> Option<&'a Suggestion> {
    let query = query.trim();
    suggestions
        .iter()
        .find(|s| s.label.eq_ignore_ascii_case(query))
        .or_else(|| suggestions.first())
}

fn write_suggestions<W: Write>(form: &FormState, id: FieldId, out: &mut W) -> std::io::Result<()> {
    let (Some(field), Some(label)) = (form.field(id), form.placeholder(id)) else {
        return Ok(());
    };
    if field.suggestions().is_empty() {
        return writeln!(out, "{} (#{}): no suggestions", label, id);
    }
    writeln!(out, "{} (#{}) suggestions:", label, id)?;
    for (index, suggestion) in field.suggestions().iter().enumerate() {
        writeln!(out, "  {}. {}", index + 1, suggestion.label)?;
    }
    Ok(())
}

fn write_form<W: Write>(form: &FormState, out: &mut W) -> std::io::Result<()> {
    for field in form.fields() {
        let label = form.placeholder(field.id()).unwrap_or_default();
        let marker = match field.state() {
            FieldState::Empty => " ",
            FieldState::Editing => "?",
            FieldState::Confirmed => "✓",
        };
        writeln!(out, "[{}] {} (#{}): {}", marker, label, field.id(), field.raw_value())?;
    }
    writeln!(
        out,
        "optimize: {}, ready: {}",
        form.optimize_waypoints(),
        form.can_submit()
    )
}
