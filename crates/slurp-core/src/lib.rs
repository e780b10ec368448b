pub mod config;
pub mod error;
pub mod logging;

pub mod credentials;
pub mod keywords;
pub mod request;
pub mod retry;
pub mod sink;
pub mod supervisor;
pub mod transport;
pub mod watchdog;
