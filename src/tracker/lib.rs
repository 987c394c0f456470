pub mod config;
pub mod curve;
pub mod error;
pub mod judge;
pub mod options;
pub mod problem;
pub mod settings;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod types;
