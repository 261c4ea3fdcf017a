use std::process;

use calculator_cli::calculate::run_calculation;
use calculator_cli::cli::{Cli, Invocation};
use calculator_cli::config::Config;
use calculator_cli::error::{handle_cli_result, CliError, IntoCliResult};
use calculator_cli::exit_codes::{EXIT_FAILURE, EXIT_SUCCESS};
use calculator_cli::logging::init_logging;
use clap::error::ErrorKind;

fn main() {
    let cli = match Cli::parse_invocation(std::env::args_os()) {
        Ok(Invocation::Help) => {
            process::exit(handle_cli_result(Cli::print_help().cli_general_error()))
        }
        Ok(Invocation::Version) => {
            print!("{}", Cli::render_version());
            process::exit(EXIT_SUCCESS)
        }
        Ok(Invocation::Calculate(cli)) => cli,
        Err(error) => process::exit(handle_parse_error(error)),
    };

    let config = Config::from_env().with_verbosity(cli.verbose, cli.quiet);
    init_logging(&config);

    process::exit(run_calculate(cli));
}

/// Every parse failure is reported as a usage error.
fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::MissingRequiredArgument
        | ErrorKind::UnknownArgument
        | ErrorKind::TooManyValues
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            handle_cli_result::<()>(Err(CliError::usage()))
        }
        _ => handle_cli_result::<()>(Err(CliError::new(
            error.kind().as_str().unwrap_or("invalid arguments"),
            EXIT_FAILURE,
        ))),
    }
}

fn run_calculate(cli: Cli) -> i32 {
    tracing::debug!(operation = %cli.operation, "running calculate command");

    let result = run_calculation(&cli.operation, &cli.num1, &cli.num2);
    if let Ok(number) = &result {
        println!("{number}");
    }
    handle_cli_result(result)
}
