use std::path::{Path, PathBuf};

use crate::{DateRange, FilterError, Order, View};

/// Possible errors to occur while loading a dataset
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to open the order file `{}`", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read the order table")]
    Csv(#[from] csv::Error),
    #[error("The order table does not contain any orders")]
    Empty,
}

/// The complete, immutable order table
///
/// Orders are kept sorted by their purchase timestamp, which allows filtering
/// by date range with two binary searches.
#[derive(Debug)]
pub struct Dataset {
    orders: Vec<Order>,
    bounds: DateRange,
}

impl Dataset {
    /// Creates a dataset from already parsed orders
    pub fn new(mut orders: Vec<Order>) -> Result<Self, DatasetError> {
        orders.sort_by_key(Order::purchased_at);

        let (first, last) = match (orders.first(), orders.last()) {
            (Some(first), Some(last)) => (first.purchase_date(), last.purchase_date()),
            _ => return Err(DatasetError::Empty),
        };
        // sorting guarantees first <= last
        let bounds = DateRange::new(first, last).map_err(|_| DatasetError::Empty)?;

        log::info!("Loaded {} order rows spanning {}", orders.len(), bounds);
        Ok(Self { orders, bounds })
    }

    /// Reads a dataset from CSV data with a header row
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self, DatasetError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let orders = reader
            .deserialize()
            .collect::<Result<Vec<Order>, _>>()?;

        Self::new(orders)
    }

    /// Reads a dataset from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        log::debug!("Reading orders from {}", path.display());

        let file = std::fs::File::open(path)
            .map_err(|source| DatasetError::Open { path: path.to_owned(), source })?;

        Self::from_reader(std::io::BufReader::new(file))
    }

    /// All orders sorted by purchase time
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// The number of order rows
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The first and the last purchase day, i.e. the selectable date range
    pub fn bounds(&self) -> DateRange {
        self.bounds
    }

    /// The orders purchased within `range`, both ends included
    pub fn filter(&self, range: DateRange) -> Result<View<'_>, FilterError> {
        if !self.bounds.encloses(&range) {
            return Err(FilterError::OutOfBounds { selected: range, available: self.bounds });
        }

        let lower = self.orders.partition_point(|order| order.purchase_date() < range.start());
        let upper = self.orders.partition_point(|order| order.purchase_date() <= range.end());

        let view = View::new(range, &self.orders[lower..upper]);
        if view.is_empty() {
            log::warn!("No orders were placed within {}", range);
        }

        Ok(view)
    }
}
