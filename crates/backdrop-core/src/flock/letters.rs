//! 5×7 bitmap wordmark and where its letters land on the page.

use super::PageMetrics;
use crate::math::rotate;
use fnv::FnvHashMap;
use glam::Vec2;
use rand::prelude::*;
use std::f32::consts::TAU;

pub const WORDMARK: &str = "JustEvery_";

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;
const LETTER_WIDTH: f32 = 80.0;
const CAP_HEIGHT: f32 = 100.0;
// Minimum distance between two letter origins
pub const MIN_LETTER_SPACING: f32 = 500.0;
// Side of a density grid cell
pub const DENSITY_CELL: f32 = 200.0;
const PLACEMENT_ATTEMPTS: u32 = 50;
// Attempts after this ignore the dense cells and go fully random
const NEAR_CELL_ATTEMPTS: u32 = 20;
const LETTER_DRIFT_SPEED: f32 = 0.3;
const MAX_TILT_RAD: f32 = 15.0 * std::f32::consts::PI / 180.0;
const MAX_LETTER_DELAY: f32 = 0.3;

type Glyph = [&'static str; GLYPH_ROWS];

fn glyph(ch: char) -> Option<&'static Glyph> {
    const J: Glyph = ["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."];
    const U: Glyph = ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."];
    const S: Glyph = [".###.", "#...#", "#....", ".###.", "....#", "#...#", ".###."];
    const T: Glyph = ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."];
    const E_UPPER: Glyph = ["#####", "#....", "#....", "####.", "#....", "#....", "#####"];
    const V: Glyph = ["#...#", "#...#", "#...#", ".#.#.", ".#.#.", "..#..", "..#.."];
    const E: Glyph = [".###.", "#...#", "#...#", "#####", "#....", "#...#", ".###."];
    const R: Glyph = ["#....", "#....", "#.##.", "##..#", "#....", "#....", "#...."];
    const Y: Glyph = ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", ".#..."];
    const UNDERSCORE: Glyph = ["#####", ".....", ".....", ".....", ".....", ".....", "....."];
    match ch {
        'J' => Some(&J),
        'u' => Some(&U),
        's' => Some(&S),
        't' => Some(&T),
        'E' => Some(&E_UPPER),
        'v' => Some(&V),
        'e' => Some(&E),
        'r' => Some(&R),
        'y' => Some(&Y),
        '_' => Some(&UNDERSCORE),
        _ => None,
    }
}

fn letter_size(ch: char) -> Vec2 {
    let h = match ch {
        't' => CAP_HEIGHT * 0.8,
        '_' => CAP_HEIGHT * 0.2,
        c if c.is_lowercase() => CAP_HEIGHT * 0.65,
        _ => CAP_HEIGHT,
    };
    Vec2::new(LETTER_WIDTH, h)
}

// Drops lowercase letters and the underscore onto a shared baseline.
fn baseline_offset(ch: char) -> f32 {
    match ch {
        '_' => CAP_HEIGHT * 0.8,
        c if c.is_lowercase() => CAP_HEIGHT * 0.35,
        _ => 0.0,
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LetterPlacement {
    pub ch: char,
    /// Top-left of the letter box before tilt.
    pub pos: Vec2,
    pub angle: f32,
    /// Per-frame drift once the word has formed.
    pub drift: Vec2,
    /// Formation progress the letter waits for before it lights up.
    pub delay: f32,
}

/// A target position for one particle, and which letter it belongs to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextPoint {
    pub pos: Vec2,
    pub letter: usize,
}

/// Centers of the most populated grid cells below the fold, densest first.
pub fn densest_cells(positions: impl Iterator<Item = Vec2>, fold: f32, take: usize) -> Vec<(Vec2, u32)> {
    let mut counts: FnvHashMap<(i32, i32), u32> = FnvHashMap::default();
    for p in positions {
        let key = ((p.x / DENSITY_CELL).floor() as i32, (p.y / DENSITY_CELL).floor() as i32);
        *counts.entry(key).or_insert(0) += 1;
    }
    let mut cells: Vec<((i32, i32), u32)> = counts
        .into_iter()
        .filter(|&((_, gy), _)| gy as f32 * DENSITY_CELL + DENSITY_CELL / 2.0 > fold)
        .collect();
    cells.sort_by(|a, b| b.1.cmp(&a.1).then(a.0 .1.cmp(&b.0 .1)).then(a.0 .0.cmp(&b.0 .0)));
    cells
        .into_iter()
        .take(take)
        .map(|((gx, gy), n)| {
            let center = Vec2::new(gx as f32, gy as f32) * DENSITY_CELL + Vec2::splat(DENSITY_CELL / 2.0);
            (center, n)
        })
        .collect()
}

/// Lay the wordmark out near dense cells, each letter at least
/// [`MIN_LETTER_SPACING`] from the others, falling back to a grid.
pub fn place_letters(positions: impl Iterator<Item = Vec2>, page: &PageMetrics, rng: &mut impl Rng) -> Vec<LetterPlacement> {
    let letter_count = WORDMARK.chars().count();
    let cells = densest_cells(positions, page.fold, letter_count * 3);
    let mut used = vec![false; cells.len()];
    let mut placed: Vec<LetterPlacement> = Vec::with_capacity(letter_count);

    for (i, ch) in WORDMARK.chars().enumerate() {
        let size = letter_size(ch);
        let mut found = None;

        for attempt in 0..PLACEMENT_ATTEMPTS {
            let free: Vec<usize> = (0..cells.len()).filter(|&c| !used[c]).collect();
            let cell = if !free.is_empty() {
                Some(free[attempt as usize % free.len()])
            } else if !cells.is_empty() {
                Some(attempt as usize % cells.len())
            } else {
                None
            };

            let mut candidate = match cell {
                Some(c) if attempt <= NEAR_CELL_ATTEMPTS => {
                    let range = 200.0 + attempt as f32 * 20.0;
                    let jitter = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5) * range;
                    cells[c].0 - size / 2.0 + jitter
                }
                _ => Vec2::new(
                    100.0 + rng.gen::<f32>() * (page.width - 200.0),
                    page.fold + 100.0 + rng.gen::<f32>() * 2000.0,
                ),
            };
            candidate.x = candidate.x.min(page.width - size.x - 100.0).max(100.0);
            candidate.y = candidate.y.max(page.fold + 50.0);

            let clear = placed
                .iter()
                .all(|l| l.pos.distance(candidate) >= MIN_LETTER_SPACING);
            if clear {
                found = Some(candidate);
                if let Some(c) = cell {
                    used[c] = true;
                }
                break;
            }
        }

        let pos = found.unwrap_or_else(|| {
            let cols = ((page.width / MIN_LETTER_SPACING).floor() as usize).max(1);
            let (row, col) = (i / cols, i % cols);
            Vec2::new(
                100.0 + col as f32 * MIN_LETTER_SPACING,
                page.fold + 100.0 + row as f32 * MIN_LETTER_SPACING,
            )
        });

        let heading = rng.gen::<f32>() * TAU;
        placed.push(LetterPlacement {
            ch,
            pos,
            angle: (rng.gen::<f32>() - 0.5) * 2.0 * MAX_TILT_RAD,
            drift: Vec2::new(heading.cos(), heading.sin()) * LETTER_DRIFT_SPEED,
            delay: rng.gen::<f32>() * MAX_LETTER_DELAY,
        });
    }
    log::debug!("flock: placed {} letters near {} dense cells", placed.len(), cells.len());
    placed
}

/// Move every letter along its drift, wrapping around the page below the
/// fold.
pub fn drift_letters(letters: &mut [LetterPlacement], page: &PageMetrics) {
    for l in letters {
        l.pos += l.drift;
        if l.pos.x < -100.0 {
            l.pos.x = page.width + 100.0;
        } else if l.pos.x > page.width + 100.0 {
            l.pos.x = -100.0;
        }
        if l.pos.y < page.fold - 100.0 {
            l.pos.y = page.height + 100.0;
        } else if l.pos.y > page.height + 100.0 {
            l.pos.y = page.fold - 100.0;
        }
    }
}

/// One point per lit glyph cell, tilted with its letter.
pub fn text_points(letters: &[LetterPlacement], out: &mut Vec<TextPoint>) {
    out.clear();
    for (index, l) in letters.iter().enumerate() {
        let Some(rows) = glyph(l.ch) else { continue };
        let size = letter_size(l.ch);
        let half = size / 2.0;
        let origin = l.pos + half + Vec2::new(0.0, baseline_offset(l.ch));
        for (row, line) in rows.iter().enumerate() {
            for (col, cell) in line.bytes().enumerate() {
                if cell != b'#' {
                    continue;
                }
                let rel = Vec2::new(
                    col as f32 * size.x / GLYPH_COLS as f32,
                    row as f32 * size.y / GLYPH_ROWS as f32,
                ) - half;
                out.push(TextPoint {
                    pos: origin + rotate(rel, l.angle),
                    letter: index,
                });
            }
        }
    }
}

