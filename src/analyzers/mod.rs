//! Descriptive views over the stored streaming records.
//!
//! This module derives the top songs by rank, the distribution of stream
//! counts with its mean, and the artists with the most summed streams.

pub mod report;
pub mod types;
pub mod utility;
pub mod views;
