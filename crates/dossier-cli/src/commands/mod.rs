//! Command implementations.

pub mod config;
pub mod identify;
pub mod resolve;
pub mod run;
pub mod search;

pub use self::config::execute_config;
pub use self::identify::execute_identify;
pub use self::resolve::execute_resolve;
pub use self::search::execute_search;
