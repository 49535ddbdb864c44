//! The alien formation
//!
//! A fixed rows x columns arena. Row 0 is the bottom row (closest to the
//! ship). Slots start occupied and are emptied once an alien's break-up
//! animation ends; they never refill.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Alien, AlienKind, Direction};
use crate::consts::*;

/// One cell of the formation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    Occupied(Alien),
    Empty,
}

impl Slot {
    pub fn alien(&self) -> Option<&Alien> {
        match self {
            Slot::Occupied(alien) => Some(alien),
            Slot::Empty => None,
        }
    }

    pub fn alien_mut(&mut self) -> Option<&mut Alien> {
        match self {
            Slot::Occupied(alien) => Some(alien),
            Slot::Empty => None,
        }
    }

    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// Rectangular grid of alien slots, stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlienGrid {
    rows: usize,
    columns: usize,
    slots: Vec<Slot>,
}

impl AlienGrid {
    /// Build the starting formation, hanging `ALIEN_CEILING` below the top.
    ///
    /// Callers validate `rows`/`columns` first; see `WaveConfig::validate`.
    pub fn new(rows: usize, columns: usize) -> Self {
        let kinds = ALIEN_TYPE_MAP
            .get(rows.saturating_sub(1))
            .copied()
            .unwrap_or(&[]);
        let formation_height = (ALIEN_HEIGHT + ALIEN_V_SEP) * rows.saturating_sub(1) as f32;
        let bottom = GAME_HEIGHT - ALIEN_CEILING - formation_height;

        let mut slots = Vec::with_capacity(rows * columns);
        for row in 0..rows {
            let kind = AlienKind::from_index(kinds.get(row).copied().unwrap_or(0));
            let y = bottom + row as f32 * (ALIEN_HEIGHT + ALIEN_V_SEP) + ALIEN_HEIGHT / 2.0;
            for col in 0..columns {
                let x = ALIEN_H_SEP + col as f32 * (ALIEN_WIDTH + ALIEN_H_SEP) + ALIEN_WIDTH / 2.0;
                slots.push(Slot::Occupied(Alien::new(Vec2::new(x, y), kind)));
            }
        }

        Self {
            rows,
            columns,
            slots,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Total number of cells, occupied or not
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.columns).then_some(row * self.columns + col)
    }

    pub fn slot(&self, row: usize, col: usize) -> Option<&Slot> {
        self.index(row, col).map(|i| &self.slots[i])
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Alien> {
        self.slot(row, col).and_then(Slot::alien)
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Alien> {
        let i = self.index(row, col)?;
        self.slots[i].alien_mut()
    }

    /// Empty a cell for good
    pub fn remove(&mut self, row: usize, col: usize) {
        if let Some(i) = self.index(row, col) {
            self.slots[i] = Slot::Empty;
        }
    }

    /// Occupied cells in row-major order (bottom row first)
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Alien)> + '_ {
        let columns = self.columns;
        self.slots
            .iter()
            .enumerate()
            .filter_map(move |(i, slot)| slot.alien().map(|a| ((i / columns, i % columns), a)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = ((usize, usize), &mut Alien)> + '_ {
        let columns = self.columns;
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(move |(i, slot)| {
                slot.alien_mut().map(|a| ((i / columns, i % columns), a))
            })
    }

    /// Aliens that are still flying (not breaking up)
    pub fn alive(&self) -> impl Iterator<Item = ((usize, usize), &Alien)> + '_ {
        self.iter().filter(|(_, a)| a.alive)
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    pub fn alive_count(&self) -> usize {
        self.alive().count()
    }

    /// Whether one more sideways step in `direction` would cross the margin
    /// next to a wall. Only the outermost alien of each row matters.
    pub fn at_wall(&self, direction: Direction) -> bool {
        let margin = ALIEN_WIDTH / 2.0 + ALIEN_H_SEP;
        (0..self.rows).any(|row| {
            let edge = match direction {
                Direction::Right => (0..self.columns).rev().find_map(|col| self.get(row, col)),
                Direction::Left => (0..self.columns).find_map(|col| self.get(row, col)),
            };
            let Some(edge) = edge else {
                return false;
            };
            match direction {
                Direction::Right => edge.pos.x + ALIEN_H_WALK > GAME_WIDTH - margin,
                Direction::Left => edge.pos.x - ALIEN_H_WALK < margin,
            }
        })
    }

    /// Move every occupied alien sideways and flip alive walk frames
    pub fn march(&mut self, direction: Direction) {
        let dx = ALIEN_H_WALK * direction.sign();
        for (_, alien) in self.iter_mut() {
            alien.pos.x += dx;
            alien.toggle_walk_frame();
        }
    }

    /// Move every occupied alien down one step and flip alive walk frames
    pub fn descend(&mut self) {
        for (_, alien) in self.iter_mut() {
            alien.pos.y -= ALIEN_V_WALK;
            alien.toggle_walk_frame();
        }
    }

    /// Whether any alien's bottom edge is at or below `line_y`
    pub fn reached_line(&self, line_y: f32) -> bool {
        self.iter()
            .any(|(_, alien)| alien.pos.y - ALIEN_HEIGHT / 2.0 <= line_y)
    }

    /// The lowest alive alien of each column, left to right
    pub fn shooters(&self) -> Vec<(usize, usize)> {
        (0..self.columns)
            .filter_map(|col| {
                (0..self.rows)
                    .find(|&row| self.get(row, col).is_some_and(|a| a.alive))
                    .map(|row| (row, col))
            })
            .collect()
    }
}
