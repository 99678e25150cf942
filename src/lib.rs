pub mod availability;
pub mod config;
pub mod editor;
pub mod error;
pub mod shutdown;
pub mod startup;
pub mod store;
pub mod utils;
