use clap::Parser;
use point_sampler::{
    logging, OutputFormatter, OutputMode, PartialCli, PointSampler, SamplerError,
    UserFriendlyError,
};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = PartialCli::parse();
    logging::init_logging(cli.common.verbose, cli.common.quiet);

    if let Some(ref config_path) = cli.common.generate_config {
        return handle_generate_config(config_path);
    }

    // Validate arguments and configuration before touching any file
    let sampler = match PointSampler::from_partial_cli(&cli) {
        Ok(sampler) => sampler,
        Err(e) => {
            print_startup_error(&e);
            return e.exit_code();
        }
    };

    let run_config = match cli.run_config() {
        Ok(run_config) => run_config,
        Err(e) => {
            sampler.handle_error(&e);
            return e.exit_code();
        }
    };

    tracing::info!(
        input = %run_config.input.display(),
        output = %run_config.output.display(),
        row_limit = run_config.row_limit,
        "Starting partial extraction"
    );

    match sampler.run_partial(&run_config) {
        Ok(summary) => {
            sampler.output_formatter().print_extraction_summary(&summary);
            0
        }
        Err(e) => {
            sampler.handle_error(&e);
            e.exit_code()
        }
    }
}

fn handle_generate_config(config_path: &std::path::Path) -> i32 {
    match PointSampler::generate_sample_config(config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path.display());
            println!("\nTo use this configuration:");
            println!(
                "  sample-points-partial <input> <n> <output> --config {}",
                config_path.display()
            );
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &SamplerError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
