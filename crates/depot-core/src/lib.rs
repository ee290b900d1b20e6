pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod inventory;
pub mod io;
pub mod movement;
pub mod mutator;
pub mod paths;
pub mod screen;
pub mod table;
pub mod types;
pub mod view;

pub use error::{DepotError, Result};
