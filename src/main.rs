use std::path::Path;
use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

use tdm_generator::{logging, timestamp, Config};

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenv().ok();

    let logging = match logging::init(Path::new("."), &timestamp()) {
        Ok(logging) => logging,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("********************************************");
    info!("**********   TDM_generator   ***************");
    info!("********************************************");
    info!("Starting datetime: {}", now());
    info!("Logging to {}", logging.path().display());

    let config_path = Config::default_path();
    info!("Reading configuration from {}", config_path.display());

    match tdm_generator::run(&config_path, Some(&logging)).await {
        Ok(summary) => {
            summary.print_stats();
            info!("Ending datetime: {}", now());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
