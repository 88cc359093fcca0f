// Loosely-typed records exchanged with the backend
pub mod entity;

// Snapshot plus live copy for dirty checking
pub mod draft;

// Client-side table projection (filter, sort, page)
pub mod table;

// REST backend client
pub mod api;

// Console configuration
pub mod config;

// Cross-view notification bus
pub mod bus;

// Routes and navigation
pub mod navigation;

// Per-screen view models
pub mod views;

// Navigation shell
pub mod console;

#[cfg(test)]
pub(crate) mod testing;
