pub mod config;
pub mod core;
pub mod predict;
pub mod setters;

pub use config::{BoosterConfig, ConfigIO};
pub use core::RevenueBooster;
