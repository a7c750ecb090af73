//! Live adapters that interact with real external systems.

pub mod filesystem;

pub use filesystem::LiveFileSystem;
