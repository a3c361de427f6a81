//! Open-Elevation compatible elevation provider.

mod dto;
mod provider;

pub use provider::HttpElevationProvider;
