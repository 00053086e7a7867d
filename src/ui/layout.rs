use ratatui::layout::{Constraint, Direction, Layout, Rect};
use unicode_width::UnicodeWidthStr;

pub const HORIZONTAL_MARGIN: u16 = 2;
pub const VERTICAL_MARGIN: u16 = 1;

const MAX_CELL_WIDTH: u16 = 7;
const MAX_CELL_HEIGHT: u16 = 3;

/// Screen regions, shared by the renderer and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenLayout {
    pub title: Rect,
    pub stats: Rect,
    pub status: Rect,
    pub hint: Rect,
    pub grid: Rect,
    pub settings: Rect,
    pub legend: Rect,
}

pub fn screen_layout(area: Rect) -> ScreenLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // title
            Constraint::Length(1), // time / best / next
            Constraint::Length(1), // status
            Constraint::Length(1), // training hint
            Constraint::Length(1), // padding
            Constraint::Min(0),    // grid
            Constraint::Length(1), // settings
            Constraint::Length(1), // legend
        ])
        .split(area);

    ScreenLayout {
        title: chunks[0],
        stats: chunks[1],
        status: chunks[2],
        hint: chunks[3],
        grid: chunks[5],
        settings: chunks[6],
        legend: chunks[7],
    }
}

/// Where the fixation point goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixation {
    /// Odd grids: the symbol of the middle cell is marked
    Cell(usize),
    /// Even grids: the blank gap column where the four central cells meet
    Gap { x: u16, y: u16 },
}

/// Placement of a `size`×`size` table centred in its area
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    pub x: u16,
    pub y: u16,
    pub cell_width: u16,
    pub cell_height: u16,
    pub size: usize,
}

pub fn grid_geometry(area: Rect, size: usize) -> GridGeometry {
    let n = size.max(1) as u16;
    let cell_width = (area.width / n).clamp(1, MAX_CELL_WIDTH);
    let cell_height = (area.height / n).clamp(1, MAX_CELL_HEIGHT);
    let width = cell_width * n;
    let height = cell_height * n;

    GridGeometry {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        cell_width,
        cell_height,
        size,
    }
}

/// Display width of the widest symbol
pub fn symbol_width(symbols: &[String]) -> u16 {
    symbols.iter().map(|s| s.width()).max().unwrap_or(1) as u16
}

/// Whether every cell has a row and room for `symbol_width` columns plus a gap
pub fn grid_fits(area: Rect, size: usize, symbol_width: u16) -> bool {
    let n = size.max(1) as u16;
    let cell_width = (area.width / n).min(MAX_CELL_WIDTH);
    cell_width > symbol_width && area.height >= n
}

/// Geometry of the drawn grid, or `None` when it does not fit in `area`
pub fn fitted_grid(area: Rect, size: usize, symbols: &[String]) -> Option<GridGeometry> {
    grid_fits(area, size, symbol_width(symbols)).then(|| grid_geometry(area, size))
}

impl GridGeometry {
    pub fn width(&self) -> u16 {
        self.cell_width * self.size as u16
    }

    pub fn height(&self) -> u16 {
        self.cell_height * self.size as u16
    }

    pub fn cell_rect(&self, cell: usize) -> Rect {
        let col = (cell % self.size) as u16;
        let row = (cell / self.size) as u16;
        Rect::new(
            self.x + col * self.cell_width,
            self.y + row * self.cell_height,
            self.cell_width,
            self.cell_height,
        )
    }

    /// Drawn part of a cell; its last column is left blank as a gap
    pub fn face(&self, cell: usize) -> Rect {
        let rect = self.cell_rect(cell);
        Rect::new(
            rect.x,
            rect.y,
            rect.width.saturating_sub(1).max(1),
            rect.height,
        )
    }

    /// First column and row of a symbol `width` columns wide centred in its face
    pub fn text_origin(&self, cell: usize, width: u16) -> (u16, u16) {
        let face = self.face(cell);
        (
            face.x + face.width.saturating_sub(width) / 2,
            face.y + face.height / 2,
        )
    }

    /// Cell index under a terminal position
    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        if column < self.x || row < self.y {
            return None;
        }
        let col = ((column - self.x) / self.cell_width) as usize;
        let r = ((row - self.y) / self.cell_height) as usize;
        if col >= self.size || r >= self.size {
            return None;
        }
        Some(r * self.size + col)
    }

    pub fn fixation(&self) -> Fixation {
        let mid = self.size / 2;
        if self.size % 2 == 1 {
            Fixation::Cell(mid * self.size + mid)
        } else {
            let left = self.cell_rect(mid * self.size + mid - 1);
            Fixation::Gap {
                x: left.x + left.width - 1,
                y: self.y + self.height() / 2,
            }
        }
    }
}
