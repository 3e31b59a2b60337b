// src/lib.rs

pub mod augment;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod scrape;
pub mod selection;

pub use error::{Error, Result};
