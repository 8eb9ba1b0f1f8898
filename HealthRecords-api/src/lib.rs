// HealthRecords-api lib.rs
//
// Main library file for the health records API.
// It re-exports the APIs from the various modules.

// Public modules
pub mod api;
pub mod entities;
pub mod openapi;
