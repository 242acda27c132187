pub mod bootstrap;
pub mod session;

pub use bootstrap::{AppConfig, Cli, Command, LoadArgs, PlayArgs};
pub use session::{PlayerSession, SessionReport};
