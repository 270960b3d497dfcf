//! sectionspy: a scroll spy for document sections.
//!
//! Sections are registered into a hierarchy, ordered for a table of contents, and kept in
//! step with whichever section a [`tracking::TrackingService`] reports as centred in the
//! viewport. The bundled service is a terminal viewport over a tree-sitter parsed document.
#![allow(clippy::multiple_crate_versions)]

pub mod app_state;
pub mod config;
pub mod document;
pub mod error;
pub mod formats;
pub mod logging;
pub mod registry;
pub mod section;
pub mod spy;
pub mod tracker;
pub mod tracking;
pub mod ui;
pub mod viewport;
