use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use log::LevelFilter;
use simple_logger::SimpleLogger;

use ecommerce_dashboard::chart::{MAX_HEIGHT, MAX_WIDTH};
use ecommerce_dashboard::{CurrencyFormat, Dashboard, DashboardConfig, Dataset, DateRange, Locale, Ranking};

#[derive(Clone, Copy, Debug, clap::ArgEnum)]
enum RankBy {
    /// Summed freight value per category
    Freight,
    /// Distinct orders per category
    Orders,
}

#[derive(Clone, Copy, Debug, clap::ArgEnum)]
enum NumberLocale {
    EsCo,
    EnUs,
}

/// A terminal dashboard for e-commerce order data
#[derive(Debug, Parser)]
#[clap(version)]
struct Args {
    /// The path to the order CSV file
    #[clap(default_value = "all_data.csv")]
    filename: PathBuf,
    /// The first day to show, defaults to the first purchase day
    #[clap(long)]
    from: Option<NaiveDate>,
    /// The last day to show, defaults to the last purchase day
    #[clap(long)]
    to: Option<NaiveDate>,
    /// Keep reading date ranges from stdin and re-render after each
    #[clap(short, long)]
    interactive: bool,
    /// The measure to rank product categories by
    #[clap(long, arg_enum, default_value = "freight")]
    rank_by: RankBy,
    /// Show days without orders as zero in the daily chart
    #[clap(long)]
    fill_gaps: bool,
    /// Number of categories in the best and worst selling charts
    #[clap(long, default_value_t = 5)]
    top: usize,
    /// How to write amounts
    #[clap(long, arg_enum, default_value = "es-co")]
    locale: NumberLocale,
    #[clap(long, default_value = "AU$")]
    currency_symbol: String,
    /// A text file shown above the dashboard
    #[clap(long)]
    logo: Option<PathBuf>,
    /// Chart width in columns
    #[clap(long, default_value_t = 60, validator = chart_width)]
    width: usize,
    /// Line chart height in rows
    #[clap(long, default_value_t = 12, validator = chart_height)]
    height: usize,
    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn chart_size(value: &str, max: usize) -> Result<(), String> {
    match value.parse::<usize>() {
        Ok(size) if (1..=max).contains(&size) => Ok(()),
        Ok(_) => Err(format!("must be between 1 and {}", max)),
        Err(err) => Err(err.to_string()),
    }
}

fn chart_width(value: &str) -> Result<(), String> {
    chart_size(value, MAX_WIDTH)
}

fn chart_height(value: &str) -> Result<(), String> {
    chart_size(value, MAX_HEIGHT)
}

impl Args {
    fn config(&self) -> anyhow::Result<DashboardConfig> {
        let logo = self.logo
            .as_ref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read the logo `{}`", path.display()))
            })
            .transpose()?;
        let locale = match self.locale {
            NumberLocale::EsCo => Locale::EsCo,
            NumberLocale::EnUs => Locale::EnUs,
        };
        let ranking = match self.rank_by {
            RankBy::Freight => Ranking::Freight,
            RankBy::Orders => Ranking::Orders,
        };

        Ok(DashboardConfig {
            top: self.top,
            ranking,
            fill_gaps: self.fill_gaps,
            currency: CurrencyFormat::new(self.currency_symbol.as_str(), locale),
            chart_width: self.width,
            chart_height: self.height,
            logo,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    SimpleLogger::new()
        .with_level(args.log_level)
        .init()?;

    let config = args.config()?;
    let dataset = Dataset::from_path(&args.filename)
        .with_context(|| format!("Failed to load orders from `{}`", args.filename.display()))?;

    let bounds = dataset.bounds();
    let selection = DateRange::new(
        args.from.unwrap_or_else(|| bounds.start()),
        args.to.unwrap_or_else(|| bounds.end()),
    )?;

    let mut dashboard = Dashboard::new(dataset, config);
    let report = dashboard.on_filter_change(selection)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.interactive {
        true => {
            let stdin = std::io::stdin();
            dashboard.run(stdin.lock(), &mut out)?;
        }
        false => dashboard.render(&report, &mut out)?,
    }

    Ok(())
}
