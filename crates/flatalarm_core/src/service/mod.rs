//! Core use-case services.
//!
//! # Responsibility
//! - Own the in-memory alarm collection on behalf of UI callers.
//! - Keep list surfaces decoupled from store and codec details.

pub mod alarm_service;
