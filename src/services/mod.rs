//! Services Layer
//!
//! Business logic for the two reporting batch jobs, kept free of any
//! rendering concerns so it can be exercised directly in tests.

pub mod report_service;
pub mod trend_service;
