pub use self::{
    aggregate::{CategoryPerformance, CategorySales, DailyOrders, Ranking, StateCustomers},
    config::DashboardConfig,
    currency::{CurrencyFormat, Locale},
    dashboard::Dashboard,
    dataset::{Dataset, DatasetError},
    filter::{DateRange, FilterError, RangeError, View},
    order::{Amount, CustomerId, Order, OrderId},
    report::{Metrics, Report},
};

pub mod aggregate;
pub mod chart;
mod config;
mod currency;
mod dashboard;
mod dataset;
mod filter;
mod order;
mod report;
