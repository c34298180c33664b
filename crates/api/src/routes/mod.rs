//! Route Handlers

pub mod chart;
pub mod measurements;
