//! CLI library for testing purposes

pub mod check;
pub mod config;
pub mod edit;
pub mod message;
pub mod report;
pub mod sync;
pub mod validation;
pub mod view;
pub mod watch;

pub use config::Config;
pub use report::ConsoleNotifier;
pub use resxcodec::ResxDocument;
