//! Command-line argument definitions for the bookshelf CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments select the shelf file, configuration
//! file and logging verbosity; the [`Command`] picks the operation.

use clap::{Parser, Subcommand, ValueEnum};

use bookshelf::item::Orientation;

/// Command-line arguments for the bookshelf tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the shelf file (TOML)
    #[arg(help = "Path to the shelf file")]
    pub input: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations on a shelf
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Find the next free slot for a new item
    Slot {
        #[arg(long, value_enum, default_value_t = OrientationArg::Vertical)]
        orientation: OrientationArg,

        /// Row to start searching from
        #[arg(long, default_value_t = 0)]
        row: u32,
    },

    /// Add a new item at the next free slot
    Place {
        /// Id of the new item
        id: String,

        #[arg(long)]
        series: Option<String>,

        #[arg(long, value_enum, default_value_t = OrientationArg::Vertical)]
        orientation: OrientationArg,

        /// Row to start searching from
        #[arg(long, default_value_t = 0)]
        row: u32,

        /// Write the updated shelf back to the input file
        #[arg(long)]
        write: bool,
    },

    /// Check whether an item may be placed at a position
    Validate {
        /// Id of the item being placed
        id: String,

        #[arg(long)]
        row: u32,

        #[arg(long)]
        x: f32,

        /// Orientation at the target; defaults to the item's current one
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Depth layer at the target; defaults to the item's current one
        #[arg(long)]
        z: Option<u32>,
    },

    /// Move an item, snapping the position to the grid
    Move {
        /// Id of the item to move
        id: String,

        #[arg(long)]
        row: u32,

        #[arg(long)]
        x: f32,

        /// Depth layer at the target; defaults to the item's current one
        #[arg(long)]
        z: Option<u32>,

        /// Write the updated shelf back to the input file
        #[arg(long)]
        write: bool,
    },

    /// Turn an item in place
    Rotate {
        /// Id of the item to turn
        id: String,

        /// Target orientation; toggles when omitted
        #[arg(long, value_enum)]
        orientation: Option<OrientationArg>,

        /// Write the updated shelf back to the input file
        #[arg(long)]
        write: bool,
    },

    /// List groups of adjacent same-series items
    Groups,

    /// Render the shelf as SVG
    Render {
        /// Path to the output SVG file
        #[arg(short, long, default_value = "shelf.svg")]
        output: String,
    },
}

/// Orientation as accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrientationArg {
    Vertical,
    Horizontal,
}

impl From<OrientationArg> for Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Vertical => Orientation::Vertical,
            OrientationArg::Horizontal => Orientation::Horizontal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_move_command() {
        let args = Args::try_parse_from([
            "bookshelf", "shelf.toml", "move", "berserk-1", "--row", "1", "--x", "42", "--write",
        ])
        .unwrap();

        assert_eq!(args.input, "shelf.toml");
        assert_eq!(args.log_level, "info");
        match args.command {
            Command::Move {
                id, row, x, z, write,
            } => {
                assert_eq!(id, "berserk-1");
                assert_eq!(row, 1);
                assert_eq!(x, 42.0);
                assert_eq!(z, None);
                assert!(write);
            }
            other => panic!("Expected Move, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_slot_defaults() {
        let args = Args::try_parse_from(["bookshelf", "shelf.toml", "slot"]).unwrap();
        match args.command {
            Command::Slot { orientation, row } => {
                assert_eq!(orientation, OrientationArg::Vertical);
                assert_eq!(row, 0);
            }
            other => panic!("Expected Slot, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_command_is_rejected() {
        assert!(Args::try_parse_from(["bookshelf", "shelf.toml"]).is_err());
    }
}
