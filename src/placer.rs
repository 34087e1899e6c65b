//! Materializes a sampled [`Plan`](crate::sampler::Plan) into a concrete
//! 2-D grid: seeds the first word, walks the plan placing each
//! neighbour relative to whichever of its endpoints is already placed
//! on a scratch canvas, rejects physically invalid layouts, and
//! compacts the result to the minimum bounding rectangle.

use std::fmt;

use log::debug;
use ndarray::Array2;
use thiserror::Error;

use crate::graph::{HalfEdge, IntersectionGraph, NodeId};
use crate::sampler::Plan;

const FILL_MARKER: char = '*';

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlacementError {
    #[error("cell ({0}, {1}) is already occupied by a conflicting letter or boundary")]
    GridConflictingCell(isize, isize),

    #[error("placed grid failed validation: {0}")]
    InvalidPlan(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    fn opposite(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// A single word's placement in grid coordinates. `x_end`/`y_end` are
/// one past the word's last cell along its varying axis (exclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedWord {
    pub x_start: isize,
    pub x_end: isize,
    pub y_start: isize,
    pub y_end: isize,
    pub orientation: Orientation,
    pub word: String,
    pub order_number: Option<usize>,
}

impl PlacedWord {
    fn new_horizontal(word: &str, x_start: isize, y: isize) -> Self {
        PlacedWord {
            x_start,
            x_end: x_start + word.chars().count() as isize,
            y_start: y,
            y_end: y,
            orientation: Orientation::Horizontal,
            word: word.to_string(),
            order_number: None,
        }
    }

    fn new_vertical(word: &str, x: isize, y_start: isize) -> Self {
        PlacedWord {
            x_start: x,
            x_end: x,
            y_start,
            y_end: y_start + word.chars().count() as isize,
            orientation: Orientation::Vertical,
            word: word.to_string(),
            order_number: None,
        }
    }

    /// (x, y, letter) for each cell the word occupies.
    fn cells(&self) -> Vec<(isize, isize, char)> {
        self.word
            .chars()
            .enumerate()
            .map(|(i, ch)| match self.orientation {
                Orientation::Horizontal => (self.x_start + i as isize, self.y_start, ch),
                Orientation::Vertical => (self.x_start, self.y_start + i as isize, ch),
            })
            .collect()
    }

    /// The two boundary cells immediately before and after the word's
    /// span along its axis; both must stay blank.
    fn boundary_cells(&self) -> [(isize, isize); 2] {
        match self.orientation {
            Orientation::Horizontal => [(self.x_start - 1, self.y_start), (self.x_end, self.y_start)],
            Orientation::Vertical => [(self.x_start, self.y_start - 1), (self.x_start, self.y_end)],
        }
    }

    fn min_x(&self) -> isize {
        self.x_start.min(self.x_end)
    }
    fn max_x(&self) -> isize {
        self.x_start.max(self.x_end)
    }
    fn min_y(&self) -> isize {
        self.y_start.min(self.y_end)
    }
    fn max_y(&self) -> isize {
        self.y_start.max(self.y_end)
    }

    fn translate(&mut self, dx: isize, dy: isize) {
        self.x_start += dx;
        self.x_end += dx;
        self.y_start += dy;
        self.y_end += dy;
    }
}

/// A large, sparsely-filled canvas words are placed onto before the
/// final bounding box is known. Sized generously enough that no
/// realistic plan can run off its edge.
struct ScratchCanvas {
    cells: Array2<Option<char>>,
    center: isize,
}

impl ScratchCanvas {
    fn new(total_letters: usize) -> Self {
        let side = (2 * total_letters).max(4);
        ScratchCanvas {
            cells: Array2::from_elem((side, side), None),
            center: (side / 2) as isize,
        }
    }

    fn index(&self, x: isize, y: isize) -> Option<(usize, usize)> {
        let row = y + self.center;
        let col = x + self.center;
        if row < 0 || col < 0 || row as usize >= self.cells.nrows() || col as usize >= self.cells.ncols() {
            None
        } else {
            Some((row as usize, col as usize))
        }
    }

    fn get(&self, x: isize, y: isize) -> Option<char> {
        self.index(x, y).and_then(|(r, c)| self.cells[[r, c]])
    }

    fn insert(&mut self, word: &PlacedWord) -> Result<(), PlacementError> {
        for (x, y, ch) in word.cells() {
            if let Some(existing) = self.get(x, y) {
                if existing != ch {
                    return Err(PlacementError::GridConflictingCell(x, y));
                }
            }
        }
        for (x, y) in word.boundary_cells() {
            if self.get(x, y).is_some() {
                return Err(PlacementError::GridConflictingCell(x, y));
            }
        }
        for (x, y, ch) in word.cells() {
            let (r, c) = self
                .index(x, y)
                .ok_or_else(|| PlacementError::InvalidPlan("word placement exceeded the scratch canvas".to_string()))?;
            self.cells[[r, c]] = Some(ch);
        }
        Ok(())
    }
}

/// A compacted, validated crossword grid: the letter matrix and the
/// list of placed words, ordered by insertion (which assigns
/// `order_number`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Array2<Option<char>>,
    placed_words: Vec<PlacedWord>,
}

impl Grid {
    pub fn x_size(&self) -> usize {
        self.cells.ncols()
    }

    pub fn y_size(&self) -> usize {
        self.cells.nrows()
    }

    pub fn area(&self) -> usize {
        self.x_size() * self.y_size()
    }

    pub fn placed_words(&self) -> &[PlacedWord] {
        &self.placed_words
    }

    fn cell(&self, x: isize, y: isize) -> Option<char> {
        if x < 0 || y < 0 || x as usize >= self.x_size() || y as usize >= self.y_size() {
            None
        } else {
            self.cells[[y as usize, x as usize]]
        }
    }

    /// Re-checks every placed word's cells and boundaries against the
    /// letter grid, independent of the incremental checks already
    /// performed on the scratch canvas.
    fn validate(&self) -> Result<(), PlacementError> {
        for word in &self.placed_words {
            for (x, y, expected) in word.cells() {
                match self.cell(x, y) {
                    Some(actual) if actual == expected => {}
                    _ => {
                        return Err(PlacementError::InvalidPlan(format!(
                            "word '{}' expected '{}' at ({}, {})",
                            word.word, expected, x, y
                        )))
                    }
                }
            }
            for (x, y) in word.boundary_cells() {
                if self.cell(x, y).is_some() {
                    return Err(PlacementError::InvalidPlan(format!(
                        "word '{}' has a non-blank boundary cell at ({}, {})",
                        word.word, x, y
                    )));
                }
            }
        }
        Ok(())
    }

    /// Rebuild the tight bounding rectangle around the current placed
    /// words. Idempotent: compacting an already-compact grid is a
    /// no-op, since the placed words are already translated to the
    /// origin and the bounding box cannot shrink further.
    pub fn compact(&self) -> Grid {
        build_from_placed_words(self.placed_words.clone())
    }

    /// Render the answer grid: letters framed as `| x `, rows
    /// separated by dashed lines.
    pub fn render(&self) -> String {
        self.render_with_labels(|x, y| self.cell(x as isize, y as isize).map(|c| c.to_string()).unwrap_or_else(|| " ".to_string()))
    }

    /// Render the masked grid: each letter cell shows the decimal
    /// order number of the (last-inserted, for crossing cells) word it
    /// belongs to; empty cells show [`FILL_MARKER`].
    pub fn render_masked(&self) -> String {
        let mut mask: Array2<Option<usize>> = Array2::from_elem((self.y_size(), self.x_size()), None);
        for word in &self.placed_words {
            for (x, y, _) in word.cells() {
                mask[[y as usize, x as usize]] = word.order_number;
            }
        }
        self.render_with_labels(|x, y| {
            mask[[y, x]].map(|n| n.to_string()).unwrap_or_else(|| FILL_MARKER.to_string())
        })
    }

    fn render_with_labels(&self, label_at: impl Fn(usize, usize) -> String) -> String {
        let separator = "-".repeat(self.x_size() * 4 + 1);
        let mut out = String::new();
        out.push_str(&separator);
        out.push('\n');
        for y in 0..self.y_size() {
            for x in 0..self.x_size() {
                out.push_str(&format!("| {} ", label_at(x, y)));
            }
            out.push_str("|\n");
            out.push_str(&separator);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

/// Translate `placed_words` to the origin and allocate exactly the
/// matrix their tight bounding box needs.
fn build_from_placed_words(placed_words: Vec<PlacedWord>) -> Grid {
    if placed_words.is_empty() {
        return Grid { cells: Array2::from_elem((0, 0), None), placed_words };
    }

    let min_x = placed_words.iter().map(|w| w.min_x()).min().unwrap();
    let max_x = placed_words.iter().map(|w| w.max_x()).max().unwrap();
    let min_y = placed_words.iter().map(|w| w.min_y()).min().unwrap();
    let max_y = placed_words.iter().map(|w| w.max_y()).max().unwrap();

    // A layout with only one orientation present has zero extent on
    // the other axis; every real multi-word layout spans both.
    let x_size = ((max_x - min_x) as usize).max(1);
    let y_size = ((max_y - min_y) as usize).max(1);

    let mut placed_words = placed_words;
    for word in placed_words.iter_mut() {
        word.translate(-min_x, -min_y);
    }

    let mut cells = Array2::from_elem((y_size, x_size), None);
    for word in &placed_words {
        for (x, y, ch) in word.cells() {
            cells[[y as usize, x as usize]] = Some(ch);
        }
    }

    Grid { cells, placed_words }
}

/// Whichever half-edge of `edge`/its mirror has `anchor` as its
/// origin -- letting placement code always read "anchor index" /
/// "new index" off `.origin_index` / `.target_index` regardless of
/// which endpoint of the sampled edge was placed first.
fn edge_from_anchor(graph: &IntersectionGraph, edge: &HalfEdge, anchor: NodeId) -> HalfEdge {
    if edge.origin == anchor {
        *edge
    } else {
        *graph.edge(edge.mirror)
    }
}

fn place_relative(anchor: &PlacedWord, anchor_index: usize, new_word: &str, new_index: usize) -> PlacedWord {
    let new_orientation = anchor.orientation.opposite();
    match new_orientation {
        Orientation::Vertical => {
            let x = anchor.x_start + anchor_index as isize;
            let y_start = anchor.y_start - new_index as isize;
            PlacedWord::new_vertical(new_word, x, y_start)
        }
        Orientation::Horizontal => {
            let y = anchor.y_start + anchor_index as isize;
            let x_start = anchor.x_start - new_index as isize;
            PlacedWord::new_horizontal(new_word, x_start, y)
        }
    }
}

/// Place a single plan into a grid, rejecting it on any conflicting
/// cell or failed post-placement validation (both recovered by the
/// caller -- this function never panics on a bad plan).
pub fn place_plan(graph: &IntersectionGraph, plan: &Plan) -> Result<Grid, PlacementError> {
    let total_letters: usize = (0..graph.num_nodes()).map(|n| graph.word(n).chars().count()).sum();
    let mut canvas = ScratchCanvas::new(total_letters);

    let seed_node: NodeId = if plan.is_empty() {
        // A single-word "plan": nothing to link, just place the word.
        0
    } else {
        graph.edge(plan[0]).origin
    };

    let mut placed: std::collections::HashMap<NodeId, PlacedWord> = std::collections::HashMap::new();
    let mut insertion_order: Vec<NodeId> = Vec::new();

    let seed_word = PlacedWord::new_horizontal(graph.word(seed_node), 0, 0);
    canvas.insert(&seed_word)?;
    placed.insert(seed_node, seed_word);
    insertion_order.push(seed_node);

    let mut consumed = vec![false; plan.len()];
    let mut remaining = plan.len();
    while remaining > 0 {
        let mut progressed = false;
        for (i, &edge_id) in plan.iter().enumerate() {
            if consumed[i] {
                continue;
            }
            let edge = graph.edge(edge_id);
            let origin_in = placed.contains_key(&edge.origin);
            let target_in = placed.contains_key(&edge.target);
            if origin_in == target_in {
                // Both ends placed (shouldn't happen for a tree-shaped
                // plan) or neither placed yet -- wait for a future pass.
                continue;
            }

            let anchor_node = if origin_in { edge.origin } else { edge.target };
            let effective = edge_from_anchor(graph, edge, anchor_node);
            let new_node = effective.target;
            let new_word = graph.word(new_node).to_string();

            let anchor = placed.get(&anchor_node).expect("anchor_node was just confirmed placed");
            let new_placed = place_relative(anchor, effective.origin_index, &new_word, effective.target_index);

            canvas.insert(&new_placed)?;
            placed.insert(new_node, new_placed);
            insertion_order.push(new_node);

            consumed[i] = true;
            remaining -= 1;
            progressed = true;
        }
        if !progressed {
            return Err(PlacementError::InvalidPlan("plan is not fully connected to the seed word".to_string()));
        }
    }

    let mut placed_words = Vec::with_capacity(insertion_order.len());
    for (order_number, node) in insertion_order.into_iter().enumerate() {
        let mut word = placed.remove(&node).expect("node was placed earlier in this loop");
        word.order_number = Some(order_number);
        placed_words.push(word);
    }

    let grid = build_from_placed_words(placed_words);
    grid.validate()?;
    debug!("Placed plan into a {}-word grid ({}x{})", grid.placed_words.len(), grid.x_size(), grid.y_size());
    Ok(grid)
}
