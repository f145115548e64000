use std::io::{self, Write};

use crate::aggregate::{self, CategoryPerformance, CategorySales, DailyOrders, Ranking, StateCustomers};
use crate::chart::{self, Bar, Direction};
use crate::{Amount, DashboardConfig, DateRange, View};

const HEADER: &str = "E-Commerce Public ✨";
const CAPTION: &str = "Copyright (c) E-Commerce Public 2023";

/// The headline numbers of a date range
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Metrics {
    pub total_orders: usize,
    pub total_revenue: Amount,
}

impl Metrics {
    fn from_daily(daily: &[DailyOrders]) -> Self {
        daily.iter().fold(
            Self { total_orders: 0, total_revenue: Amount::ZERO },
            |metrics, day| Self {
                total_orders: metrics.total_orders + day.order_count,
                total_revenue: metrics.total_revenue.saturating_add(day.revenue),
            },
        )
    }
}

/// Everything shown for one date range selection
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Report {
    range: DateRange,
    metrics: Metrics,
    daily: Vec<DailyOrders>,
    categories: CategoryPerformance,
    states: Vec<StateCustomers>,
}

impl Report {
    /// Aggregates the orders of `view`
    pub fn build(view: View<'_>, config: &DashboardConfig) -> Self {
        let orders = view.orders();
        let mut daily = aggregate::daily_orders(orders);
        if config.fill_gaps {
            daily = aggregate::fill_missing_days(&daily, view.range());
        }

        Self {
            range: view.range(),
            metrics: Metrics::from_daily(&daily),
            daily,
            categories: CategoryPerformance::from_orders(orders, config.ranking),
            states: aggregate::customers_by_state(orders),
        }
    }

    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    pub fn daily(&self) -> &[DailyOrders] {
        &self.daily
    }

    pub fn categories(&self) -> &CategoryPerformance {
        &self.categories
    }

    pub fn states(&self) -> &[StateCustomers] {
        &self.states
    }

    /// Writes the dashboard as text
    pub fn render<W: Write>(&self, config: &DashboardConfig, out: &mut W) -> io::Result<()> {
        if let Some(logo) = &config.logo {
            writeln!(out, "{}", logo.trim_end())?;
            writeln!(out)?;
        }
        writeln!(out, "{}", HEADER)?;
        writeln!(out, "Date range: {}", self.range)?;
        writeln!(out)?;

        self.render_daily(config, out)?;
        writeln!(out)?;
        self.render_categories(config, out)?;
        writeln!(out)?;
        self.render_states(config, out)?;
        writeln!(out)?;

        writeln!(out, "{}", CAPTION)
    }

    fn render_daily<W: Write>(&self, config: &DashboardConfig, out: &mut W) -> io::Result<()> {
        writeln!(out, "Daily Orders")?;
        writeln!(
            out,
            "  Total orders: {}    Total Revenue: {}",
            self.metrics.total_orders,
            config.currency.money(self.metrics.total_revenue),
        )?;
        writeln!(out)?;

        let points = self.daily
            .iter()
            .map(|day| (day.date, day.order_count))
            .collect::<Vec<_>>();

        chart::line_chart(out, "Orders per day", &points, config.chart_width, config.chart_height)
    }

    fn render_categories<W: Write>(&self, config: &DashboardConfig, out: &mut W) -> io::Result<()> {
        let measure = match self.categories.ranking() {
            Ranking::Freight => "by freight value",
            Ranking::Orders => "by number of orders",
        };
        let bars = |entries: &[CategorySales]| {
            entries.iter()
                .map(|entry| Bar {
                    label: entry.category.clone(),
                    value: entry.value.to_num::<f64>(),
                    text: match self.categories.ranking() {
                        Ranking::Freight => config.currency.number(entry.value),
                        Ranking::Orders => config.currency.integer(entry.value.to_num::<u64>()),
                    },
                })
                .collect::<Vec<_>>()
        };

        writeln!(out, "Best & Worst Performing Product")?;
        chart::bar_chart(
            out,
            &format!("Best Performing Product ({})", measure),
            &bars(self.categories.top(config.top)),
            config.chart_width,
            Direction::Right,
        )?;
        writeln!(out)?;
        chart::bar_chart(
            out,
            &format!("Worst Performing Product ({})", measure),
            &bars(&self.categories.bottom(config.top)),
            config.chart_width,
            Direction::Left,
        )
    }

    fn render_states<W: Write>(&self, config: &DashboardConfig, out: &mut W) -> io::Result<()> {
        let bars = self.states
            .iter()
            .map(|state| Bar {
                label: state.state.clone(),
                value: state.customer_count as f64,
                text: config.currency.integer(state.customer_count as u64),
            })
            .collect::<Vec<_>>();

        writeln!(out, "Customer Demographics")?;
        chart::bar_chart(out, "Number of Customers by State", &bars, config.chart_width, Direction::Right)
    }
}
