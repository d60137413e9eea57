//! Bookshelf - a layout engine for virtual bookshelves.
//!
//! Items (books, volumes) sit on the rows of a shelf at grid-snapped
//! positions. Vertical items stand side by side; horizontal items lie flat
//! and can be stacked into depth layers, each resting on the layer below.
//!
//! The engine answers three questions about a shelf:
//!
//! - [`slot::find_next_available_slot`]: where does a new item fit?
//! - [`placement::validate_placement`]: may an item move or turn here?
//! - [`grouping::detect_adjacent_series_groups`]: which volumes of a series
//!   sit together?
//!
//! All three are pure functions over an item list and a [`shelf::ShelfGeometry`].
//! [`state::ShelfState`] wraps them into an owner of one shelf's items with
//! a load/save boundary.
//!
//! # Example
//!
//! ```
//! use bookshelf::{
//!     config::ShelfConfig,
//!     item::Orientation,
//!     state::ShelfState,
//! };
//!
//! let geometry = ShelfConfig::default().geometry()?;
//! let mut state = ShelfState::new(geometry);
//!
//! state.place_new("berserk-1", Orientation::Vertical, Some("berserk".into()), 0)?;
//! state.place_new("berserk-2", Orientation::Vertical, Some("berserk".into()), 0)?;
//!
//! let groups = state.groups();
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].len(), 2);
//! # Ok::<(), bookshelf::ShelfError>(())
//! ```

pub mod cache;
pub mod config;
pub mod export;
pub mod grouping;
pub mod placement;
pub mod slot;
pub mod state;

mod error;

pub use bookshelf_core::{color, draw, geometry, identifier, item, shelf};

pub use error::ShelfError;
