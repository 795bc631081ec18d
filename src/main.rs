use clap::{Parser as ClapParser, Subcommand};
use sqlweave::cli::{self, CliError, RenderOptions};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "sqlweave")]
#[command(about = "Expand templated SQL into placeholder-bound SQL plus a bind table")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Expand a template with parameter values
    Render {
        /// Template file (reads from stdin if not provided)
        file: Option<String>,

        /// JSON object with named parameter values
        #[arg(short, long)]
        params: Option<String>,

        /// Pretty-print the bind table
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a template without rendering it
    Check {
        /// Template file (reads from stdin if not provided)
        file: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render {
            file,
            params,
            pretty,
        } => run_render(file, params, pretty),
        Commands::Check { file } => run_check(file),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn read_template(file: Option<String>) -> Result<String, CliError> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(CliError::Io),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(CliError::Io)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_render(
    file: Option<String>,
    params: Option<String>,
    pretty: bool,
) -> Result<(), CliError> {
    let template = read_template(file)?;
    let options = RenderOptions { template, params };

    let result = cli::execute_render(&options)?;
    println!("{}", result.sql);
    let json = if pretty {
        serde_json::to_string_pretty(&result.bindings)
    } else {
        serde_json::to_string(&result.bindings)
    }
    .unwrap();
    println!("{}", json);
    Ok(())
}

fn run_check(file: Option<String>) -> Result<(), CliError> {
    let template = read_template(file)?;
    cli::execute_check(&template)?;
    println!("Template is valid");
    Ok(())
}
