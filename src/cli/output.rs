//! Output formatting helpers for CLI commands

use crate::provider::{RouteRenderer, RouteRequest, RouteResult, Suggestion};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use serde_json::json;

/// Format a duration in seconds as `1h 05m` or `7m`.
pub fn format_duration(seconds: u64) -> String {
    let minutes = (seconds + 30) / 60;
    if minutes >= 60 {
        format!("{}h {:02}m", minutes / 60, minutes % 60)
    } else {
        format!("{}m", minutes)
    }
}

/// Stops in the order the route visits them.
pub fn visiting_order(request: &RouteRequest, route: &RouteResult) -> Vec<String> {
    let mut stops = vec![request.origin.clone()];
    if route.waypoint_order.len() == request.waypoints.len() {
        stops.extend(
            route
                .waypoint_order
                .iter()
                .filter_map(|&i| request.waypoints.get(i).cloned()),
        );
    } else {
        stops.extend(request.waypoints.iter().cloned());
    }
    stops.push(request.destination.clone());
    stops
}

/// Format a route as a leg table followed by totals
pub fn format_route_table(request: &RouteRequest, route: &RouteResult) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "From", "To", "Distance", "Duration"]);

    for (index, leg) in route.legs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&leg.start_address),
            Cell::new(&leg.end_address),
            Cell::new(format!("{:.1} km", leg.distance_meters as f64 / 1000.0)),
            Cell::new(format_duration(leg.duration_seconds)),
        ]);
    }

    let mut output = String::new();
    if !route.summary.is_empty() {
        output.push_str(&format!("Route via {}\n", route.summary.bold()));
    }
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n{} {:.1} km, {}",
        "Total:".green().bold(),
        route.total_distance_km(),
        format_duration(route.total_duration_seconds())
    ));
    if request.optimize && request.waypoints.len() > 1 {
        output.push_str(&format!(
            "\n{} {}",
            "Order:".cyan(),
            visiting_order(request, route).join(" → ")
        ));
    }
    output
}

/// Format a route as JSON
pub fn format_route_json(
    request: &RouteRequest,
    route: &RouteResult,
) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({
        "request": request,
        "route": route,
        "total_distance_meters": route.total_distance_meters(),
        "total_duration_seconds": route.total_duration_seconds(),
        "visiting_order": visiting_order(request, route),
    }))
}

/// Format suggestions as a numbered table
pub fn format_suggestions_table(suggestions: &[Suggestion]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Address", "Id"]);

    for (index, s) in suggestions.iter().enumerate() {
        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(&s.label),
            Cell::new(s.id.as_str()),
        ]);
    }

    table.to_string()
}

/// Format suggestions as JSON
pub fn format_suggestions_json(suggestions: &[Suggestion]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&json!({ "suggestions": suggestions }))
}

/// Prints computed routes to stdout.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    json: bool,
}

impl TerminalRenderer {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl RouteRenderer for TerminalRenderer {
    fn render_route(&mut self, request: &RouteRequest, route: &RouteResult) {
        if self.json {
            match format_route_json(request, route) {
                Ok(output) => println!("{}", output),
                Err(e) => eprintln!("Error: {}", e),
            }
        } else {
            println!("{}", format_route_table(request, route));
        }
    }
}
