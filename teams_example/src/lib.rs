pub mod bot;
pub mod config;
pub mod logging;
pub mod storage;

pub use bot::CounterBot;
pub use config::Config;
