//! Warning codes for the Trellis diagnostic system.
//!
//! Codes are organized by the stage that reports them:
//! - `W0xx` - Syntax warnings from the line classifier and graph builder
//! - `W1xx` - Structural warnings from the layout engine

use std::fmt;

/// Codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Syntax Warnings (W0xx)
    // =========================================================================
    /// Malformed property list.
    ///
    /// A `[` was never closed, a `]` appeared without a `[`, or a quoted
    /// value inside the brackets was never terminated. The line is ignored.
    W001,

    /// Missing identifier.
    ///
    /// A property list or opening brace appeared without a node name before it.
    W002,

    /// Unmatched closing brace.
    ///
    /// A `}` was found while no container was open. It is ignored.
    W003,

    /// Unclosed container.
    ///
    /// The input ended while a container was still open. It is closed
    /// implicitly.
    W004,

    /// Duplicate node.
    ///
    /// A node with the same qualified id was already declared. The first
    /// declaration is kept and the later properties are merged into it.
    W005,

    /// Unresolved connection endpoint.
    ///
    /// A connection names a node that was never declared. The connection is
    /// dropped.
    W006,

    /// Ambiguous connection endpoint.
    ///
    /// A connection names a local name shared by several nested nodes. The
    /// connection is dropped.
    W007,

    /// Malformed connection.
    ///
    /// A line contains `->` or `<->` but is not a valid connection, for
    /// example because an endpoint is missing. The line is ignored.
    W008,

    // =========================================================================
    // Structural Warnings (W1xx)
    // =========================================================================
    /// Cycle broken during ranking.
    ///
    /// The connection closes a cycle and was ignored when assigning ranks.
    W100,
}

/// Broad family a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Problems with the source text itself.
    Syntax,
    /// Problems with the shape of the resulting graph.
    Structural,
}

impl ErrorCode {
    /// Returns the code as a string (e.g., "W001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::W001 => "W001",
            ErrorCode::W002 => "W002",
            ErrorCode::W003 => "W003",
            ErrorCode::W004 => "W004",
            ErrorCode::W005 => "W005",
            ErrorCode::W006 => "W006",
            ErrorCode::W007 => "W007",
            ErrorCode::W008 => "W008",
            ErrorCode::W100 => "W100",
        }
    }

    /// Returns a short description of what this code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::W001 => "malformed property list",
            ErrorCode::W002 => "missing identifier",
            ErrorCode::W003 => "unmatched closing brace",
            ErrorCode::W004 => "unclosed container",
            ErrorCode::W005 => "duplicate node",
            ErrorCode::W006 => "unresolved connection endpoint",
            ErrorCode::W007 => "ambiguous connection endpoint",
            ErrorCode::W008 => "malformed connection",
            ErrorCode::W100 => "cycle broken during ranking",
        }
    }

    /// Returns the family this code belongs to.
    pub fn category(&self) -> Category {
        match self {
            ErrorCode::W100 => Category::Structural,
            _ => Category::Syntax,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
