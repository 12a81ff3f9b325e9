//! tourfolio - portfolio site generator for 360° panorama tours.
//!
//! Loads a YAML catalog of projects and panorama texture sets, renders the
//! home grid and the tour pages, and serves them with live reload. The
//! in-browser engine lives in the `tourfolio-viz` crate.

pub mod catalog;
pub mod placement;
pub mod server;
pub mod site;
