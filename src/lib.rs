//! Recipe lookup and bookmarking.
//!
//! Two binaries share this crate:
//!
//! - `recipe-store`: the saved-recipe HTTP backend ([`server`] over [`db`]).
//! - `recipe-keeper`: a Telegram bot that searches the public recipe
//!   directory ([`directory`]) and saves recipes through the store
//!   ([`store_client`]), driven by [`browser`].

pub mod bot;
pub mod browser;
pub mod config;
pub mod db;
pub mod directory;
pub mod error;
pub mod recipe;
pub mod render;
pub mod server;
pub mod store_client;

/// Starts `pretty_env_logger`, defaulting `RUST_LOG` to `info`.
pub fn init_logging() {
    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init();
}
