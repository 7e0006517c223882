//! Shell command implementation

use crate::cli::output::TerminalRenderer;
use crate::cli::{load_config_with_overrides, ShellArgs};
use crate::logging::init_tracing;
use crate::session::Session;
use tokio::io::BufReader;

/// Handle `waypoint shell` command
pub async fn run_shell(args: ShellArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_overrides(&args.config, args.log_level.as_deref())?;
    init_tracing(&config.logging)?;

    let mut session = Session::from_config(&config)?;
    if args.no_optimize {
        session.form_mut().set_optimize_waypoints(false);
    }

    let mut renderer = TerminalRenderer::new(args.json);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    session.run(stdin, &mut stdout, &mut renderer).await?;
    Ok(())
}
