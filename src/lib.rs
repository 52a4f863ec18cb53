pub mod cache;
pub mod cli;
pub mod loader;
pub mod page;
pub mod server;
pub mod source;

pub use loader::{AdsConfig, Clock, Config, Context};
pub use server::router;
pub use source::Source;
