use clap::Parser;
use waypoint::cli::{
    handle_completions, handle_config_init, plan, shell, suggest, Cli, Commands, ConfigCommands,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan(args) => plan::run_plan(args).await,
        Commands::Suggest(args) => suggest::run_suggest(args).await,
        Commands::Shell(args) => shell::run_shell(args).await,
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init(args) => handle_config_init(&args),
        },
        Commands::Completions(args) => {
            handle_completions(&args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
