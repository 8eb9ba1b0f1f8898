// Health Records Data
// This crate handles the document store connection and record persistence

// Persistence gateway and backend connections
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;
