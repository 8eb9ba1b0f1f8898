// Public entities for the health records API
// This module contains data structures that are shared across the application boundary

// Health record request and response bodies
pub mod health_record;

// Common entities for error handling
pub mod common;
