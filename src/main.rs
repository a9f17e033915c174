use dotenv::dotenv;
use std::process::ExitCode;

use recipe_keeper::{
    bot,
    browser::Browser,
    config::BrowserConfig,
    directory::DirectoryClient,
    store_client::StoreClient,
};

#[tokio::main]
async fn main() -> ExitCode {
    // Load all env variables from .env file.
    dotenv().ok();
    recipe_keeper::init_logging();
    log::info!("Starting bot...");

    let config = match BrowserConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let directory = match DirectoryClient::new(config.directory_url.clone(), config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build directory client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let store = match StoreClient::new(config.store_url.clone(), config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to build store client: {e}");
            return ExitCode::FAILURE;
        }
    };
    log::info!("Using recipe store at {}", config.store_url);

    bot::run(config, Browser::new(directory, store)).await;
    ExitCode::SUCCESS
}
