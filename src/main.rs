use std::env;
use std::process::ExitCode;

use quantity1d::configuration::Configuration;
use quantity1d::manager::manager::IManager;

const USAGE: &str = "usage: quantity1d <config.json> [x]";

fn main() -> ExitCode {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let Some(config_path) = args.get(1) else {
        eprintln!("{}", USAGE);
        return ExitCode::FAILURE;
    };
    let at = match args.get(2).map(|arg| arg.parse::<f64>()) {
        Some(Ok(x)) => Some(x),
        Some(Err(error)) => {
            eprintln!("invalid x '{}': {}\n{}", args[2], error, USAGE);
            return ExitCode::FAILURE;
        },
        None => None
    };

    let mut config = Configuration::new();
    if let Err(error) = config.from_reader(config_path) {
        tracing::error!(%error, path = %config_path, "failed to load configuration");
        return ExitCode::FAILURE;
    }

    for name in config.quantity_manager().names() {
        let quantity = match config.quantity_manager().get(&name) {
            Ok(quantity) => quantity,
            Err(error) => {
                tracing::error!(%error, "quantity disappeared from the manager");
                return ExitCode::FAILURE;
            }
        };
        println!("{}: {}", name, quantity);
        if let Some(x) = at {
            match config.value(&name, x) {
                Ok(value) => println!("  {}({}) = {}", name, x, value),
                Err(error) => println!("  {}({}): {}", name, x, error)
            }
        }
    }
    ExitCode::SUCCESS
}
