pub mod config;
pub mod equipment;
pub mod movements;
pub mod notices;
pub mod suppliers;
