//! Charts rendered as text
//!
//! Charts are laid out with [`plotters`] on a [`TextBackend`], a drawing
//! backend whose pixels are terminal cells. Nothing is written to files.

use std::io::{self, Write};

use chrono::NaiveDate;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters_backend::text_anchor::{HPos, VPos};
use plotters_backend::{
    BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingBackend, DrawingErrorKind,
};

/// Upper limit for the width of the plot area, in columns
pub const MAX_WIDTH: usize = 240;
/// Upper limit for the height of the line chart plot area, in rows
pub const MAX_HEIGHT: usize = 80;

const HIGHLIGHT: RGBColor = RGBColor(0x90, 0xCA, 0xF9);
const SHADE: RGBColor = RGBColor(0xD3, 0xD3, 0xD3);
const NO_DATA: &str = "(no data)";

const CAPTION_ROWS: i32 = 1;
const X_LABEL_ROWS: i32 = 2;

type DrawResult<T> = Result<T, DrawingAreaErrorKind<io::Error>>;

/// One character cell of a [`TextBackend`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Cell {
    Empty,
    Dot,
    HLine,
    VLine,
    Cross,
    Fill,
    Shade,
    Marker,
    Text(char),
}

impl Cell {
    fn to_char(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Dot => '·',
            Cell::HLine => '─',
            Cell::VLine => '│',
            Cell::Cross => '┼',
            Cell::Fill => '█',
            Cell::Shade => '▒',
            Cell::Marker => 'o',
            Cell::Text(c) => c,
        }
    }

    fn priority(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Dot => 1,
            Cell::HLine | Cell::VLine | Cell::Cross => 2,
            Cell::Fill | Cell::Shade => 3,
            Cell::Marker => 4,
            Cell::Text(_) => 5,
        }
    }

    fn update(&mut self, new: Cell) {
        *self = match (*self, new) {
            (Cell::HLine, Cell::VLine) | (Cell::VLine, Cell::HLine) | (Cell::Cross, Cell::HLine | Cell::VLine) => Cell::Cross,
            (old, new) if new.priority() >= old.priority() => new,
            (old, _) => old,
        };
    }
}

/// A plotters backend drawing onto a grid of characters
///
/// Lines become box drawing characters, filled rectangles become blocks
/// (solid for the highlight colour, shaded otherwise), circles become `o`.
/// The grid is written to `out` row by row on [`DrawingBackend::present`].
pub struct TextBackend<'a, W: Write> {
    out: &'a mut W,
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl<'a, W: Write> TextBackend<'a, W> {
    pub fn new(out: &'a mut W, (width, height): (u32, u32)) -> Self {
        let (width, height) = (width.max(1), height.max(1));

        Self {
            out,
            width,
            height,
            cells: vec![Cell::Empty; (width * height) as usize],
        }
    }

    fn put(&mut self, (x, y): BackendCoord, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        self.cells[y as usize * self.width as usize + x as usize].update(cell);
    }
}

impl<'a, W: Write> DrawingBackend for TextBackend<'a, W> {
    type ErrorType = io::Error;

    fn get_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        Ok(())
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<io::Error>> {
        for row in self.cells.chunks(self.width as usize) {
            let line = row.iter().map(|cell| cell.to_char()).collect::<String>();
            writeln!(self.out, "{}", line.trim_end()).map_err(DrawingErrorKind::DrawingError)?;
        }

        Ok(())
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> Result<(), DrawingErrorKind<io::Error>> {
        if color.alpha > 0.3 {
            self.put(point, Cell::Dot);
        }

        Ok(())
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        if from.0 == to.0 {
            for y in from.1.min(to.1)..=from.1.max(to.1) {
                self.put((from.0, y), Cell::VLine);
            }
            return Ok(());
        }
        if from.1 == to.1 {
            for x in from.0.min(to.0)..=from.0.max(to.0) {
                self.put((x, from.1), Cell::HLine);
            }
            return Ok(());
        }

        plotters_backend::rasterizer::draw_line(self, from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let (x0, x1) = (upper_left.0.min(bottom_right.0), upper_left.0.max(bottom_right.0));
        let (y0, y1) = (upper_left.1.min(bottom_right.1), upper_left.1.max(bottom_right.1));

        if !fill {
            self.draw_line((x0, y0), (x1, y0), style)?;
            self.draw_line((x0, y1), (x1, y1), style)?;
            self.draw_line((x0, y0), (x0, y1), style)?;
            return self.draw_line((x1, y0), (x1, y1), style);
        }

        let cell = match style.color().rgb == (HIGHLIGHT.0, HIGHLIGHT.1, HIGHLIGHT.2) {
            true => Cell::Fill,
            false => Cell::Shade,
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.put((x, y), cell);
            }
        }

        Ok(())
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        _radius: u32,
        _style: &S,
        _fill: bool,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        self.put(center, Cell::Marker);

        Ok(())
    }

    fn estimate_text_size<S: BackendTextStyle>(
        &self,
        text: &str,
        _style: &S,
    ) -> Result<(u32, u32), DrawingErrorKind<io::Error>> {
        Ok((text.chars().count() as u32, 1))
    }

    fn draw_text<S: BackendTextStyle>(
        &mut self,
        text: &str,
        style: &S,
        (x, y): BackendCoord,
    ) -> Result<(), DrawingErrorKind<io::Error>> {
        let width = text.chars().count() as i32;
        let dx = match style.anchor().h_pos {
            HPos::Left => 0,
            HPos::Center => -width / 2,
            HPos::Right => -width,
        };
        let dy = match style.anchor().v_pos {
            VPos::Top | VPos::Center => 0,
            VPos::Bottom => -1,
        };

        for (i, c) in text.chars().enumerate() {
            self.put((x + dx + i as i32, y + dy), Cell::Text(c));
        }

        Ok(())
    }
}

fn font() -> FontDesc<'static> {
    ("sans-serif", 1).into_font()
}

fn drawing_error(err: DrawingAreaErrorKind<io::Error>) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

/// Which way the bars of a bar chart grow
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Bars growing to the right from a shared baseline
    Right,
    /// Bars growing to the left towards a shared baseline, with an inverted value axis
    Left,
}

/// One bar of a horizontal bar chart
#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    /// Determines the bar length, relative to the largest value of the chart
    pub value: f64,
    /// The value as printed next to the bar
    pub text: String,
}

/// Writes a horizontal bar chart, highlighting the first bar
///
/// `width` is clamped to [`MAX_WIDTH`].
pub fn bar_chart<W: Write>(
    out: &mut W,
    title: &str,
    bars: &[Bar],
    width: usize,
    direction: Direction,
) -> io::Result<()> {
    if bars.is_empty() {
        writeln!(out, "{}", title)?;
        return writeln!(out, "  {}", NO_DATA);
    }

    draw_bar_chart(out, title, bars, width.clamp(1, MAX_WIDTH) as i32, direction).map_err(drawing_error)
}

fn draw_bar_chart<W: Write>(
    out: &mut W,
    title: &str,
    bars: &[Bar],
    width: i32,
    direction: Direction,
) -> DrawResult<()> {
    let count = bars.len() as i32;
    let max = match bars.iter().map(|bar| bar.value).fold(0.0, f64::max) {
        max if max > 0.0 => max,
        _ => 1.0,
    };
    let label_width = bars.iter().map(|bar| bar.label.chars().count()).max().unwrap_or(0) as i32 + 1;
    let text_width = bars.iter().map(|bar| bar.text.chars().count()).max().unwrap_or(0) as i32 + 2;

    // room for the value text next to the longest bar
    let end = max * f64::from(width + text_width) / f64::from(width);
    let size = (
        (label_width + width + text_width + 1) as u32,
        (CAPTION_ROWS + 2 * count + 1 + X_LABEL_ROWS) as u32,
    );

    let root = TextBackend::new(out, size).into_drawing_area();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, font())
        .x_label_area_size(X_LABEL_ROWS)
        .y_label_area_size(label_width)
        .build_cartesian_2d(0f64..end, (0..count).into_segmented())?;

    // the first bar sits in the top slot
    let slot = move |index: usize| SegmentValue::CenterOf(count - 1 - index as i32);
    let label = |slot: &SegmentValue<i32>| match slot {
        SegmentValue::CenterOf(row) | SegmentValue::Exact(row) if (0..count).contains(row) => {
            bars[(count - 1 - row) as usize].label.clone()
        }
        _ => String::new(),
    };
    let value_label = |x: &f64| {
        let value = match direction {
            Direction::Right => *x,
            Direction::Left => end - *x,
        };
        match value <= max {
            true => format!("{:.0}", value),
            false => String::new(),
        }
    };

    chart.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .set_all_tick_mark_size(0)
        .x_labels(width as usize / 12 + 1)
        .y_labels(bars.len() + 1)
        .x_label_formatter(&value_label)
        .y_label_formatter(&label)
        .label_style(font())
        .draw()?;

    chart.draw_series(
        bars.iter()
            .enumerate()
            .filter(|(_, bar)| bar.value > 0.0)
            .map(|(index, bar)| {
                let color = if index == 0 { HIGHLIGHT } else { SHADE };
                let (from, to) = match direction {
                    Direction::Right => (0.0, bar.value),
                    Direction::Left => (end - bar.value, end),
                };
                Rectangle::new([(from, slot(index)), (to, slot(index))], color.filled())
            }),
    )?;

    chart.draw_series(bars.iter().enumerate().map(|(index, bar)| {
        let (anchor, offset) = match direction {
            Direction::Right => (bar.value.max(0.0), 1),
            Direction::Left => (end - bar.value.max(0.0), -(bar.text.chars().count() as i32) - 1),
        };
        EmptyElement::at((anchor, slot(index))) + Text::new(bar.text.clone(), (offset, 0), font())
    }))?;

    root.present()
}

/// Writes a line chart of one value per day, marking every day with `o`
///
/// `width` and `height` are the size of the plot area, clamped to
/// [`MAX_WIDTH`] and [`MAX_HEIGHT`].
pub fn line_chart<W: Write>(
    out: &mut W,
    title: &str,
    points: &[(NaiveDate, usize)],
    width: usize,
    height: usize,
) -> io::Result<()> {
    if points.is_empty() {
        writeln!(out, "{}", title)?;
        return writeln!(out, "  {}", NO_DATA);
    }

    draw_line_chart(
        out,
        title,
        points,
        width.clamp(1, MAX_WIDTH) as i32,
        height.clamp(2, MAX_HEIGHT) as i32,
    )
    .map_err(drawing_error)
}

fn draw_line_chart<W: Write>(
    out: &mut W,
    title: &str,
    points: &[(NaiveDate, usize)],
    width: i32,
    height: i32,
) -> DrawResult<()> {
    let max = points.iter().map(|(_, value)| *value).max().unwrap_or(0).max(1) as i32;
    let axis_width = max.to_string().len() as i32 + 1;
    let last = (points.len() as i32 - 1).max(1);
    let size = (
        (axis_width + width + 1) as u32,
        (CAPTION_ROWS + height + X_LABEL_ROWS) as u32,
    );

    let root = TextBackend::new(out, size).into_drawing_area();
    let mut chart = ChartBuilder::on(&root)
        .caption(title, font())
        .x_label_area_size(X_LABEL_ROWS)
        .y_label_area_size(axis_width)
        .build_cartesian_2d(0..last, 0..max)?;

    let date_label = |index: &i32| {
        points.get(*index as usize)
            .map(|(date, _)| date.to_string())
            .unwrap_or_default()
    };

    chart.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .set_all_tick_mark_size(0)
        .x_labels(width as usize / 14 + 1)
        .y_labels(height as usize / 3 + 1)
        .x_label_formatter(&date_label)
        .label_style(font())
        .draw()?;

    let series = points.iter()
        .enumerate()
        .map(|(index, (_, value))| (index as i32, *value as i32));
    chart.draw_series(LineSeries::new(series.clone(), &HIGHLIGHT))?;
    chart.draw_series(series.map(|point| Circle::new(point, 1, HIGHLIGHT.filled())))?;

    root.present()
}
