//! Bookshelf CLI library
//!
//! This module contains the core CLI logic for the bookshelf tool: it loads
//! a shelf file, runs one engine operation on it and reports the outcome.

pub mod error_adapter;

mod args;
mod config;
mod shelf_file;

pub use args::{Args, Command, OrientationArg};
pub use shelf_file::ShelfFile;

use std::path::Path;

use log::info;

use bookshelf::{
    ShelfError,
    config::AppConfig,
    export::svg::SvgRenderer,
    identifier::{ItemId, SeriesId},
    item::Orientation,
    placement::{PlacementError, PlacementRequest, validate_placement},
    slot::find_slot_for,
    state::ShelfState,
};

/// Run the bookshelf CLI application
///
/// Loads the configuration and the shelf file, then executes the selected
/// command. Results are printed to standard output; commands with `--write`
/// save the updated shelf back to the input file.
///
/// # Errors
///
/// Returns `ShelfError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Invalid shelf files (syntax, geometry or item records)
/// - Rejected placements
/// - Rendering errors
pub fn run(args: &Args) -> Result<(), ShelfError> {
    info!(input_path = args.input; "Processing shelf");

    let app_config = config::load_config(args.config.as_ref())?;
    let mut file = ShelfFile::open(&args.input)?;

    // A geometry stored with the shelf wins over the configured one
    let app_config = match file.geometry() {
        Some(geometry) => app_config.with_shelf(geometry.clone()),
        None => app_config,
    };
    let geometry = app_config.shelf().geometry()?;

    let mut state = ShelfState::new(geometry);
    state.load(&file)?;

    match &args.command {
        Command::Slot { orientation, row } => {
            let slot = find_slot_for(
                state.items(),
                state.geometry(),
                Orientation::from(*orientation),
                *row,
            )
            .ok_or(PlacementError::NoSpace)?;
            println!("row {} at x = {}", slot.row_index(), slot.position_x());
        }
        Command::Place {
            id,
            series,
            orientation,
            row,
            write,
        } => {
            let series_id = series.as_deref().map(SeriesId::from);
            let edit = |state: &mut ShelfState| {
                state
                    .place_new(id.as_str(), Orientation::from(*orientation), series_id, *row)
                    .cloned()
            };
            let placed = if *write {
                state.commit(&mut file, edit)?
            } else {
                edit(&mut state)?
            };
            println!(
                "placed {} on row {} at x = {}",
                placed.id(),
                placed.row_index(),
                placed.position_x()
            );
        }
        Command::Validate {
            id,
            row,
            x,
            orientation,
            z,
        } => {
            let item_id = ItemId::from(id.as_str());
            let current = state
                .find(&item_id)
                .ok_or_else(|| PlacementError::UnknownItem(item_id.clone()))?;
            let request = PlacementRequest::for_item(current)
                .with_position(*row, *x)
                .with_orientation(orientation.map_or(current.orientation(), Orientation::from))
                .with_z_index(z.unwrap_or(current.z_index()))
                .snapped(state.geometry());
            validate_placement(state.items(), state.geometry(), &request)?;
            println!(
                "valid: {} on row {} at x = {}",
                item_id,
                request.row_index(),
                request.position_x()
            );
        }
        Command::Move {
            id,
            row,
            x,
            z,
            write,
        } => {
            let item_id = ItemId::from(id.as_str());
            let current = state
                .find(&item_id)
                .ok_or_else(|| PlacementError::UnknownItem(item_id.clone()))?;
            let request = PlacementRequest::for_item(current)
                .with_position(*row, *x)
                .with_z_index(z.unwrap_or(current.z_index()));
            let edit = |state: &mut ShelfState| state.move_item(request).cloned();
            let moved = if *write {
                state.commit(&mut file, edit)?
            } else {
                edit(&mut state)?
            };
            println!(
                "moved {} to row {} at x = {}",
                moved.id(),
                moved.row_index(),
                moved.position_x()
            );
        }
        Command::Rotate {
            id,
            orientation,
            write,
        } => {
            let item_id = ItemId::from(id.as_str());
            let edit = |state: &mut ShelfState| {
                let turned = match orientation {
                    Some(orientation) => {
                        state.change_orientation(&item_id, Orientation::from(*orientation))
                    }
                    None => state.toggle_orientation(&item_id),
                };
                turned.cloned()
            };
            let turned = if *write {
                state.commit(&mut file, edit)?
            } else {
                edit(&mut state)?
            };
            println!("{} is now {}", turned.id(), turned.orientation());
        }
        Command::Groups => {
            let groups = state.groups();
            if groups.is_empty() {
                println!("no series groups");
            }
            for group in &groups {
                let members: Vec<&str> = group
                    .items()
                    .iter()
                    .map(|item| item.id().as_str())
                    .collect();
                println!(
                    "{} on row {} ({}): x {}..{}, depth {}..={}: {}",
                    group.series_id(),
                    group.row_index(),
                    group.orientation(),
                    group.start_x(),
                    group.end_x(),
                    group.min_z(),
                    group.max_z(),
                    members.join(", ")
                );
            }
        }
        Command::Render { output } => {
            render(&app_config, &mut state, output)?;
        }
    }

    Ok(())
}

fn render(config: &AppConfig, state: &mut ShelfState, output: &str) -> Result<(), ShelfError> {
    let groups = state.groups();
    let renderer = SvgRenderer::new(config.style());
    let svg = renderer.render(state.geometry(), state.items(), &groups)?;
    renderer.write_document(&svg, Path::new(output))?;

    info!(output_file = output; "SVG exported successfully");
    Ok(())
}
