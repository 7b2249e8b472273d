//! Route handlers

pub mod analysis;
pub mod forecast;
pub mod health;
pub mod location;
pub mod observations;
