//! Plain-text renderer writing one line per notification.

use std::io::Write;

use anyhow::{Context, Result};
use scrollmap_core::{Action, CellCoord, LevelId, LevelLoadError};
use scrollmap_rendering::{
    FramePresentation, ItemPickup, LevelSummary, PlayerMotion, Renderer, SpriteKey,
};
use scrollmap_world::{query, World};

const PLAYER_GLYPH: char = '@';

/// Renderer that writes human-readable lines to any sink.
#[derive(Debug)]
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Creates a renderer writing to the provided sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) -> Result<()> {
        self.out
            .write_fmt(text)
            .and_then(|()| self.out.write_all(b"\n"))
            .context("failed to write renderer output")
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn level_changed(&mut self, level: &LevelSummary) -> Result<()> {
        self.line(format_args!(
            "level {} \"{}\" ({}x{}), start {}",
            level.level, level.name, level.columns, level.rows, level.start
        ))
    }

    fn level_load_failed(&mut self, level: LevelId, error: &LevelLoadError) -> Result<()> {
        self.line(format_args!("level {level} failed to load: {error}"))
    }

    fn player_moved(&mut self, motion: &PlayerMotion) -> Result<()> {
        self.line(format_args!(
            "moved {} -> {} over {}ms, scroll ({}, {})",
            motion.from,
            motion.to,
            motion.duration.as_millis(),
            motion.scroll.x,
            motion.scroll.y
        ))
    }

    fn facing_changed(&mut self, sprite: SpriteKey) -> Result<()> {
        self.line(format_args!("sprite {}", sprite.file_name()))
    }

    fn item_collected(&mut self, pickup: &ItemPickup) -> Result<()> {
        self.line(format_args!(
            "collected {} gold at {}, total {}",
            pickup.gold, pickup.cell, pickup.total_gold
        ))
    }

    fn inventory_item_found(&mut self, cell: CellCoord, item: Option<&str>) -> Result<()> {
        self.line(format_args!(
            "found {} at {cell}",
            item.unwrap_or("an unnamed item")
        ))
    }

    fn frame(&mut self, frame: &FramePresentation) -> Result<()> {
        self.line(format_args!("== {} | gold {} ==", frame.title, frame.gold))?;
        for row in &frame.rows {
            self.line(format_args!("{row}"))?;
        }
        Ok(())
    }
}

/// Captures the loaded level as text, or `None` while no level is loaded.
///
/// Live action cells are drawn with a marker: `$` for gold, `i` for
/// inventory items, `>` for level exits and `?` for reserved cells.
#[must_use]
pub fn capture_frame(world: &World) -> Option<FramePresentation> {
    let (columns, rows) = query::dimensions(world)?;
    let mut grid: Vec<Vec<char>> = (0..rows)
        .map(|row| {
            (0..columns)
                .map(|column| query::glyph_at(world, CellCoord::new(column, row)).unwrap_or(' '))
                .collect()
        })
        .collect();

    let markers = query::action_cells(world)
        .into_iter()
        .map(|(cell, action)| (cell, action_marker(action)))
        .chain([(query::player_cell(world), PLAYER_GLYPH)]);
    for (cell, marker) in markers {
        let (Ok(row), Ok(column)) = (usize::try_from(cell.row()), usize::try_from(cell.column()))
        else {
            continue;
        };
        if let Some(slot) = grid.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = marker;
        }
    }

    let rows = grid.into_iter().map(|line| line.into_iter().collect()).collect();
    Some(FramePresentation {
        title: query::level_name(world).unwrap_or_default().to_owned(),
        rows,
        gold: query::gold(world),
    })
}

fn action_marker(action: &Action) -> char {
    match action {
        Action::Item {
            add_gold: Some(_), ..
        } => '$',
        Action::Item { .. } => 'i',
        Action::NewLevel { .. } => '>',
        Action::Inventory => '?',
    }
}
