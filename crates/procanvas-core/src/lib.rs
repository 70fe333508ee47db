//! Procanvas Core Types and Definitions
//!
//! This crate provides the foundational types for procanvas process diagrams.
//! It includes:
//!
//! - **Identifiers**: Element and connection identifiers ([`identifier`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Model**: Diagram elements, connections and their kinds ([`model`] module)
//! - **Draw**: Visual definitions for diagram nodes and flows ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod model;
