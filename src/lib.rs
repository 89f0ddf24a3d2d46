pub mod bindings;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod page;
pub mod server;
