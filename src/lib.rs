//! TheraHand: hand-tracking rehabilitation exercises.
//!
//! Landmark frames flow from a [`landmarks::Camera`] + [`landmarks::HandDetector`]
//! pair through the [`gesture`] classifier into one of four [`exercise`]
//! engines.  The [`session`] controller owns the whole loop; terminal results
//! leave through [`stats`].

pub mod config;
pub mod exercise;
pub mod gesture;
pub mod i18n;
pub mod landmarks;
pub mod session;
pub mod stats;
