use clap::Parser;
use pagebind::cli::commands::{cmd_describe, cmd_validate};
use pagebind::cli::config::{Cli, Commands, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Validate { schema } => {
            let path = schema.unwrap_or(config.schema.path);
            let clean = cmd_validate(&path, cli.verbose)?;
            if !clean {
                std::process::exit(1);
            }
        }
        Commands::Describe { schema, page } => {
            let path = schema.unwrap_or(config.schema.path);
            cmd_describe(&path, page.as_deref())?;
        }
    }

    Ok(())
}
