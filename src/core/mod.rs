pub mod config;
pub mod geometry;
pub mod session_manager;

// Rep counting state machines
pub mod rep_counter;
pub mod squat;
pub mod pushup;
pub mod bicep_curl;

// Frame analysis
pub mod analyzer;
