use crate::{CurrencyFormat, Ranking};

/// Presentation settings of the dashboard
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Number of categories in the best and worst selling charts
    pub top: usize,
    /// The measure categories are ranked by
    pub ranking: Ranking,
    /// Whether days without orders are shown as zero in the daily chart
    pub fill_gaps: bool,
    pub currency: CurrencyFormat,
    /// Maximum number of columns used by bars and the line chart
    pub chart_width: usize,
    /// Number of rows of the line chart
    pub chart_height: usize,
    /// Text printed above the dashboard header
    pub logo: Option<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            top: 5,
            ranking: Ranking::default(),
            fill_gaps: false,
            currency: CurrencyFormat::default(),
            chart_width: 60,
            chart_height: 12,
            logo: None,
        }
    }
}
