//! The multiversion B+tree (MVBT): the persistent engine answering
//! key-timestamp, range-timestamp and range-lifespan queries over
//! records indexed by their record id.

pub mod config;
pub mod entry;
pub mod node;
pub mod tree;

pub use config::Config;
pub use tree::Mvbt;
