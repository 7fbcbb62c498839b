//! Trellis Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Trellis parser,
//! the layout engine and any rendering collaborator. It includes:
//!
//! - **Identifiers**: Path-like node identifiers ([`identifier::NodeId`])
//! - **Spans**: Byte ranges into diagram source ([`span::Span`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Graph**: The node/container/edge model ([`graph`] module)

pub mod geometry;
pub mod graph;
pub mod identifier;
pub mod span;
