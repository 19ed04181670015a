// src/ui/widgets/mod.rs

// Module declarations for every widget drawn by `ui::render`.
pub mod footer;  // Key bindings for the current state.
pub mod input;   // The domain input box.
pub mod results; // One card per probed domain.
pub mod summary; // Counters and progress.
