//! Main module for CWEB classification functionality

pub mod cancel;
pub mod classifier;
pub mod encoding;
pub mod legend;
pub mod token;
