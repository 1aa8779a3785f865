// Data models for landmarks, exercises and analysis errors

pub mod error;
pub mod exercise;
pub mod pose;
