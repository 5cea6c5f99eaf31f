//! Nutrisense API Library
//!
//! A thin HTTP gateway over a hosted auth and table service. The gateway
//! turns requests into provider calls, classifies provider failures and
//! shapes JSON responses.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
