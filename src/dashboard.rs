use std::io::{self, BufRead, Write};

use crate::{DashboardConfig, Dataset, DateRange, FilterError, RangeError, Report};

/// One line of input of an interactive session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    /// Show the given date range
    Select(DateRange),
    /// Show the complete dataset again
    Reset,
    Quit,
    Nothing,
}

impl std::str::FromStr for Command {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Command::Nothing),
            "reset" => Ok(Command::Reset),
            "quit" | "exit" => Ok(Command::Quit),
            range => range.parse().map(Command::Select),
        }
    }
}

/// The application state: the loaded dataset and the current date selection
///
/// Every change of the selection goes through [`Dashboard::on_filter_change`],
/// which validates the range and recomputes the report. Rendering is a
/// separate step, see [`Dashboard::render`].
#[derive(Debug)]
pub struct Dashboard {
    dataset: Dataset,
    config: DashboardConfig,
    selection: DateRange,
}

impl Dashboard {
    /// Creates a dashboard selecting the complete dataset
    pub fn new(dataset: Dataset, config: DashboardConfig) -> Self {
        let selection = dataset.bounds();

        Self { dataset, config, selection }
    }

    /// The loaded orders
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The currently selected date range
    pub fn selection(&self) -> DateRange {
        self.selection
    }

    /// Aggregates the current selection
    pub fn report(&self) -> Result<Report, FilterError> {
        let view = self.dataset.filter(self.selection)?;
        log::debug!("Aggregating {} order rows within {}", view.len(), self.selection);

        Ok(Report::build(view, &self.config))
    }

    /// Selects a new date range and recomputes the report
    ///
    /// On error, the previous selection is kept.
    pub fn on_filter_change(&mut self, range: DateRange) -> Result<Report, FilterError> {
        let view = self.dataset.filter(range)?;
        log::info!("Selected {} ({} order rows)", range, view.len());

        self.selection = range;
        Ok(Report::build(view, &self.config))
    }

    /// Selects the complete dataset again
    pub fn reset(&mut self) -> Result<Report, FilterError> {
        self.on_filter_change(self.dataset.bounds())
    }

    pub fn render<W: Write>(&self, report: &Report, out: &mut W) -> io::Result<()> {
        report.render(&self.config, out)
    }

    /// Renders the current selection, then keeps re-rendering for every
    /// range read from `input` until `quit` or the end of the input
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        match self.report() {
            Ok(report) => self.render(&report, out)?,
            Err(err) => {
                log::error!("Cannot render the selection {}: {}", self.selection, err);
                writeln!(out, "{}", err)?;
            }
        }

        let mut lines = input.lines();
        loop {
            write!(
                out,
                "\nSelect a date range within {} (`start..end`, `reset`, `quit`): ",
                self.dataset.bounds(),
            )?;
            out.flush()?;

            let line = match lines.next() {
                Some(line) => line?,
                None => break,
            };
            let update = match line.parse::<Command>() {
                Ok(Command::Select(range)) => self.on_filter_change(range),
                Ok(Command::Reset) => self.reset(),
                Ok(Command::Quit) => break,
                Ok(Command::Nothing) => continue,
                Err(err) => {
                    writeln!(out, "{}", err)?;
                    continue;
                }
            };

            match update {
                Ok(report) => {
                    writeln!(out)?;
                    self.render(&report, out)?;
                }
                Err(err) => writeln!(out, "{}", err)?,
            }
        }

        writeln!(out)
    }
}
