//! Bookshelf Core Types and Definitions
//!
//! This crate provides the value types shared by the bookshelf layout engine
//! and its command-line shell. It includes:
//!
//! - **Identifiers**: Opaque item and series identifiers ([`identifier::ItemId`], [`identifier::SeriesId`])
//! - **Geometry**: Spans, rectangles and grid snapping ([`geometry`] module)
//! - **Items**: Placed books and their boundary records ([`item`] module)
//! - **Shelf**: Shelf geometry and its validation ([`shelf`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Draw**: Layered SVG output for shelf previews ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
pub mod item;
pub mod shelf;
