//! Waypoint - Multi-stop route planner
//!
//! This library provides a route form (origin, destination and any number of
//! stops) with debounced address autocomplete against a hosted places
//! provider, and turns a fully confirmed form into a driving route.
//!
//! Suggestion lookups are tagged with per-field request tokens so that a slow
//! response can never overwrite the results of a newer edit.

pub mod cli;
pub mod config;
pub mod debounce;
pub mod fetcher;
pub mod field;
pub mod form;
pub mod logging;
pub mod provider;
pub mod session;
