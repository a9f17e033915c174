use dotenv::dotenv;
use std::process::ExitCode;

use recipe_keeper::{config::StoreConfig, error::ServerError, server};

async fn run() -> Result<(), ServerError> {
    let config = StoreConfig::load()?;
    server::start_server(config).await
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    recipe_keeper::init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
