//! Plan command implementation

use crate::cli::output::TerminalRenderer;
use crate::cli::{load_config_with_overrides, PlanArgs};
use crate::logging::init_tracing;
use crate::provider::{RouteRenderer, RouteResult};
use crate::session::Session;

/// Handle `waypoint plan` command
pub async fn run_plan(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.config, args.log_level.as_deref())?;
    init_tracing(&config.logging)?;

    let mut session = Session::from_config(&config)?;
    let mut renderer = TerminalRenderer::new(args.json);
    plan_route(&mut session, &args, &mut renderer).await?;
    Ok(())
}

/// Fill the session's form from the arguments, confirm every address with
/// its best suggestion, then compute and render the route.
///
/// Blank `--stop` values are skipped.
pub async fn plan_route(
    session: &mut Session,
    args: &PlanArgs,
    renderer: &mut dyn RouteRenderer,
) -> Result<RouteResult, Box<dyn std::error::Error>> {
    let form = session.form_mut();
    if args.no_optimize {
        form.set_optimize_waypoints(false);
    }

    let mut entries = vec![
        (form.origin().id(), args.origin.clone()),
        (form.destination().id(), args.destination.clone()),
    ];
    for stop in args.stops.iter().filter(|s| !s.trim().is_empty()) {
        entries.push((form.add_stop(), stop.clone()));
    }

    let resolved = session.resolve_all(&entries).await?;
    for ((_, typed), suggestion) in entries.iter().zip(&resolved) {
        tracing::info!(query = %typed, resolved = %suggestion.label, "Address confirmed");
    }

    let (request, route) = session.submit().await?;
    renderer.render_route(&request, &route);
    Ok(route)
}
