// Tabshell Browser Library Entry Point
// This file exposes all modules so they can be imported by main.rs
// and tested independently.

// Core modules
pub mod registers;
pub mod session;
pub mod settings;
pub mod surface;

// Shared state
pub mod state;

// Pure logic modules (no Tauri imports)
pub mod modules;
