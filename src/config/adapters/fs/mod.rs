//! JSON configuration file.

mod store;

pub use store::ConfigStore;
