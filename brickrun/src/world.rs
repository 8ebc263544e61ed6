//! Static level data: blocks, enemy spawn markers and the player spawn.
//!
//! A [`World`] is built once from map text and never changes afterwards.
//!
//! Map text is one line per row and one character per column:
//!
//! | char | meaning |
//! |------|---------|
//! | `' '` | empty |
//! | `'1'` | solid block, brick style |
//! | `'2'` | enemy spawn marker (not a block) |
//! | `'3'` | solid block, floor style |
//! | `'^'` | lethal block (spikes) |
//! | `'P'` | player spawn marker (not a block) |
//! | other digit | decorative block styled by that digit |
//!
//! Rows may have different lengths; missing trailing columns are empty.

use std::path::Path;

use crate::error::WorldLoadError;
use crate::grid::{Grid, GridCoord};
use crate::math::{Rect, Vec2};

/// Collision behaviour of a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Stops movement.
    Solid,
    /// Kills the player on contact; does not stop movement.
    Lethal,
    /// Drawn but never collides.
    Decorative,
}

impl BlockKind {
    pub fn is_solid(self) -> bool {
        matches!(self, BlockKind::Solid)
    }

    pub fn is_lethal(self) -> bool {
        matches!(self, BlockKind::Lethal)
    }
}

/// Visual style of a block, picked from the map character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlockStyle {
    Brick,
    Floor,
    Spikes,
    Decor(u8),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Block {
    pub cell: GridCoord,
    pub kind: BlockKind,
    pub style: BlockStyle,
}

impl Block {
    /// World-space bounds, `tile_size` square.
    pub fn bounds(&self, tile_size: f64) -> Rect {
        Rect::new(
            self.cell.x as f64 * tile_size,
            self.cell.y as f64 * tile_size,
            tile_size,
            tile_size,
        )
    }
}

enum Cell {
    Empty,
    Block(BlockKind, BlockStyle),
    EnemySpawn,
    PlayerSpawn,
}

fn classify(ch: char) -> Option<Cell> {
    // '1' and '3' must win over the generic digit branch.
    let cell = match ch {
        ' ' => Cell::Empty,
        '1' => Cell::Block(BlockKind::Solid, BlockStyle::Brick),
        '2' => Cell::EnemySpawn,
        '3' => Cell::Block(BlockKind::Solid, BlockStyle::Floor),
        '^' => Cell::Block(BlockKind::Lethal, BlockStyle::Spikes),
        'P' => Cell::PlayerSpawn,
        _ => {
            let digit = ch.to_digit(10)?;
            Cell::Block(BlockKind::Decorative, BlockStyle::Decor(digit as u8))
        }
    };
    Some(cell)
}

/// Immutable level geometry.
#[derive(Clone, Debug)]
pub struct World {
    /// Map scan order: row-major, top-to-bottom, left-to-right.
    blocks: Vec<Block>,
    /// Index into `blocks` for each occupied cell.
    cells: Grid<Option<usize>>,
    enemy_spawns: Vec<GridCoord>,
    player_spawn: Option<GridCoord>,
}

impl World {
    /// Build a world from map text.
    pub fn parse(text: &str, tile_size: f64) -> Result<Self, WorldLoadError> {
        let rows: Vec<&str> = text.lines().collect();
        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Err(WorldLoadError::Empty);
        }

        let mut blocks = Vec::new();
        let mut cells = Grid::new(width, rows.len(), tile_size, None);
        let mut enemy_spawns = Vec::new();
        let mut player_spawn = None;

        for (row, line) in rows.iter().enumerate() {
            for (col, ch) in line.chars().enumerate() {
                let cell = classify(ch).ok_or(WorldLoadError::InvalidChar { ch, row, col })?;
                let coord = GridCoord::new(col as i32, row as i32);
                match cell {
                    Cell::Empty => {}
                    Cell::Block(kind, style) => {
                        cells.set(coord, Some(blocks.len()));
                        blocks.push(Block {
                            cell: coord,
                            kind,
                            style,
                        });
                    }
                    Cell::EnemySpawn => enemy_spawns.push(coord),
                    Cell::PlayerSpawn => {
                        if player_spawn.is_some() {
                            log::warn!("Ignoring extra player spawn at row {row}, column {col}");
                        } else {
                            player_spawn = Some(coord);
                        }
                    }
                }
            }
        }

        log::info!(
            "Parsed map: {}x{} cells, {} blocks, {} enemy spawns",
            width,
            rows.len(),
            blocks.len(),
            enemy_spawns.len()
        );

        Ok(Self {
            blocks,
            cells,
            enemy_spawns,
            player_spawn,
        })
    }

    /// Read and parse a map file.
    pub fn load(path: impl AsRef<Path>, tile_size: f64) -> Result<Self, WorldLoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| WorldLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, tile_size)
    }

    /// All blocks in map scan order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block_at(&self, coord: GridCoord) -> Option<&Block> {
        self.cells
            .get(coord)
            .copied()
            .flatten()
            .and_then(|index| self.blocks.get(index))
    }

    /// Blocks whose bounds strictly overlap `rect`.
    pub fn blocks_overlapping<'a>(&'a self, rect: &Rect) -> impl Iterator<Item = &'a Block> + 'a {
        let tile_size = self.tile_size();
        let rect = *rect;
        self.cells
            .cells_overlapping(&rect)
            .filter_map(move |coord| self.block_at(coord))
            .filter(move |block| block.bounds(tile_size).intersects(&rect))
    }

    /// Blocks within a camera-relative window of `screen_width` plus
    /// `chunk_size` columns on either side, in map scan order.
    pub fn visible_blocks(
        &self,
        camera_x: f64,
        screen_width: f64,
        chunk_size: u32,
    ) -> impl Iterator<Item = &Block> {
        let tile_size = self.tile_size();
        let margin = chunk_size as f64 * tile_size;
        let min_x = camera_x - margin;
        let max_x = camera_x + screen_width + margin;
        self.blocks.iter().filter(move |block| {
            let bounds = block.bounds(tile_size);
            bounds.right() >= min_x && bounds.left() <= max_x
        })
    }

    pub fn enemy_spawns(&self) -> &[GridCoord] {
        &self.enemy_spawns
    }

    pub fn player_spawn(&self) -> Option<GridCoord> {
        self.player_spawn
    }

    /// Top-left position for an entity of `size` standing in `cell`:
    /// horizontally centred, bottom on the cell's bottom edge.
    pub fn spawn_position(&self, cell: GridCoord, size: Vec2) -> Vec2 {
        let bounds = self.cells.cell_bounds(cell);
        Vec2::new(
            bounds.x + (bounds.w - size.x) / 2.0,
            bounds.bottom() - size.y,
        )
    }

    pub fn tile_size(&self) -> f64 {
        self.cells.cell_size()
    }

    pub fn columns(&self) -> usize {
        self.cells.width()
    }

    pub fn rows(&self) -> usize {
        self.cells.height()
    }

    pub fn pixel_width(&self) -> f64 {
        self.columns() as f64 * self.tile_size()
    }

    pub fn pixel_height(&self) -> f64 {
        self.rows() as f64 * self.tile_size()
    }
}
