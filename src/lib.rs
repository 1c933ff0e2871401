//! MentorBridge - A tutoring marketplace backend
//!
//! This library provides the core functionality for MentorBridge: account
//! signup/login, the mentor/mentee directory, the session-request workflow,
//! pull-based notifications, and mentor availability scheduling.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
