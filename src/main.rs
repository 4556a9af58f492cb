use clap::Parser;
use passvault::cli::{Cli, Commands};
use passvault::generator::PasswordOptions;
use passvault::logging::{init_logging, LogFormat};

fn main() {
    let cli = Cli::parse();

    let log_format = std::env::current_dir()
        .ok()
        .and_then(|cwd| passvault::config::Settings::load(&cwd).ok())
        .map_or(LogFormat::Pretty, |s| s.log_format());
    init_logging(if cli.verbose { "debug" } else { "warn" }, log_format);

    let result = match cli.command {
        Commands::Init => passvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref name,
            ref value,
            generate,
            length,
        } => passvault::cli::commands::add::execute(&cli, name, value.as_deref(), generate, length),
        Commands::Get { ref name } => passvault::cli::commands::get::execute(&cli, name),
        Commands::List => passvault::cli::commands::list::execute(&cli),
        Commands::Search { ref pattern } => passvault::cli::commands::search::execute(&cli, pattern),
        Commands::Delete { ref name, force } => {
            passvault::cli::commands::delete::execute(&cli, name, force)
        }
        Commands::Generate {
            length,
            no_lower,
            no_upper,
            no_numbers,
            no_symbols,
            allow_ambiguous,
            url_safe,
        } => {
            let options = PasswordOptions {
                skip_lower_case: no_lower,
                skip_upper_case: no_upper,
                skip_numbers: no_numbers,
                skip_symbols: no_symbols,
                exclude_ambiguous_chars: !allow_ambiguous,
                url_safe_only: url_safe,
            };
            passvault::cli::commands::generate::execute(length, &options)
        }
        Commands::Completions { ref shell } => passvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
