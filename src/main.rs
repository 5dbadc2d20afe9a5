use csv_export::config::cli::is_informational;
use csv_export::utils::logger;
use csv_export::{convert, CliConfig, EtlError};

fn main() {
    let config = match CliConfig::parse_args(std::env::args_os()) {
        Ok(config) => config,
        Err(err) if is_informational(&err) => err.exit(),
        Err(err) => fail(&EtlError::from(err)),
    };

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!("CLI config: {:?}", config);

    match config.to_options().and_then(convert) {
        Ok(output) => {
            tracing::info!("Conversion completed successfully");
            println!("{}", output);
        }
        Err(err) => {
            tracing::error!("Conversion failed: {} (category: {:?})", err, err.category());
            fail(&err)
        }
    }
}

fn fail(err: &EtlError) -> ! {
    eprintln!("{}", err.user_friendly_message());
    eprintln!("Suggestion: {}", err.recovery_suggestion());
    std::process::exit(1)
}
