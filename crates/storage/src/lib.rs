//! Storage layer for the Presence site
//!
//! This crate provides the device-local key-value store that keeps the
//! active theme across sessions.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod kv;

pub use kv::{DeviceStore, KvConfig, KvError, KvStore, MemoryPreferenceStore, PreferenceStore};
