pub mod config;
pub mod error;
pub mod logging;
pub mod server;

pub use config::{load_or_create_server_config, ServerConfig};
pub use error::{CoreError, CoreResult};
pub use server::Server;
