//! Group-by aggregations over a slice of orders
//!
//! Every aggregation works on whatever slice it is handed, usually the orders
//! of a [`View`](crate::View). Missing prices and freight values contribute
//! nothing to a sum; orders without a category or state are left out of the
//! respective grouping.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::{Amount, DateRange, Order};

/// Orders and revenue of one calendar day
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyOrders {
    pub date: NaiveDate,
    /// Number of distinct orders purchased that day
    pub order_count: usize,
    /// Sum of the item prices of those orders
    pub revenue: Amount,
}

/// Groups orders by purchase day
///
/// The result is sorted by date. Days without any order are absent, see
/// [`fill_missing_days`] to get a dense series.
pub fn daily_orders(orders: &[Order]) -> Vec<DailyOrders> {
    let mut days: BTreeMap<NaiveDate, (HashSet<_>, Amount)> = BTreeMap::new();

    for order in orders {
        let (ids, revenue) = days.entry(order.purchase_date()).or_default();
        ids.insert(order.id());
        if let Some(price) = order.price() {
            *revenue = revenue.saturating_add(price);
        }
    }

    days.into_iter()
        .map(|(date, (ids, revenue))| DailyOrders { date, order_count: ids.len(), revenue })
        .collect()
}

/// Expands a daily series to every day of `range`, inserting empty days
///
/// Entries outside of `range` are dropped.
pub fn fill_missing_days(daily: &[DailyOrders], range: DateRange) -> Vec<DailyOrders> {
    let mut known = daily.iter().peekable();

    range.days()
        .map(|date| {
            while known.next_if(|day| day.date < date).is_some() {}
            match known.next_if(|day| day.date == date) {
                Some(day) => day.clone(),
                None => DailyOrders { date, order_count: 0, revenue: Amount::ZERO },
            }
        })
        .collect()
}

/// The measure used to rank product categories
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Ranking {
    /// Sum of the freight values, used as a stand-in for sales volume
    #[default]
    Freight,
    /// Number of distinct orders containing the category
    Orders,
}

/// The ranking value of one product category
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySales {
    pub category: String,
    /// Either the summed freight value, or the order count, depending on the [`Ranking`]
    pub value: Amount,
}

/// Product categories ranked from best to worst selling
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryPerformance {
    ranking: Ranking,
    /// Sorted by value descending, ties by category name
    entries: Vec<CategorySales>,
}

impl CategoryPerformance {
    pub fn from_orders(orders: &[Order], ranking: Ranking) -> Self {
        let mut entries = match ranking {
            Ranking::Freight => Self::freight_per_category(orders),
            Ranking::Orders => Self::orders_per_category(orders),
        };
        entries.sort_by(|a, b| b.value.cmp(&a.value).then_with(|| a.category.cmp(&b.category)));

        Self { ranking, entries }
    }

    fn freight_per_category(orders: &[Order]) -> Vec<CategorySales> {
        let mut sums: BTreeMap<&str, Amount> = BTreeMap::new();

        for order in orders {
            if let Some(category) = order.category() {
                let sum = sums.entry(category).or_default();
                *sum = sum.saturating_add(order.freight().unwrap_or_default());
            }
        }

        sums.into_iter()
            .map(|(category, value)| CategorySales { category: category.to_owned(), value })
            .collect()
    }

    fn orders_per_category(orders: &[Order]) -> Vec<CategorySales> {
        let mut ids: BTreeMap<&str, HashSet<_>> = BTreeMap::new();

        for order in orders {
            if let Some(category) = order.category() {
                ids.entry(category).or_default().insert(order.id());
            }
        }

        ids.into_iter()
            .map(|(category, ids)| CategorySales {
                category: category.to_owned(),
                value: Amount::saturating_from_num(ids.len()),
            })
            .collect()
    }

    /// The measure the categories are ranked by
    pub fn ranking(&self) -> Ranking {
        self.ranking
    }

    /// All categories, best selling first
    pub fn entries(&self) -> &[CategorySales] {
        &self.entries
    }

    /// The `n` best selling categories, best first
    pub fn top(&self, n: usize) -> &[CategorySales] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The `n` least selling categories, worst first
    pub fn bottom(&self, n: usize) -> Vec<CategorySales> {
        let mut ascending = self.entries.clone();
        ascending.sort_by(|a, b| a.value.cmp(&b.value).then_with(|| a.category.cmp(&b.category)));
        ascending.truncate(n);

        ascending
    }
}

/// Number of customers living in one state
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StateCustomers {
    pub state: String,
    pub customer_count: usize,
}

/// Counts distinct customers per state
///
/// The result is sorted by customer count descending, ties by state.
pub fn customers_by_state(orders: &[Order]) -> Vec<StateCustomers> {
    let mut customers: BTreeMap<&str, HashSet<_>> = BTreeMap::new();

    for order in orders {
        if let Some(state) = order.state() {
            customers.entry(state).or_default().insert(order.customer());
        }
    }

    let mut states = customers.into_iter()
        .map(|(state, ids)| StateCustomers { state: state.to_owned(), customer_count: ids.len() })
        .collect::<Vec<_>>();
    states.sort_by(|a, b| b.customer_count.cmp(&a.customer_count).then_with(|| a.state.cmp(&b.state)));

    states
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::Dataset;

    const HEADER: &str = "order_id, customer_id, customer_state, product_category_name, price, freight_value, order_purchase_timestamp\n";

    fn dataset(rows: &str) -> Dataset {
        Dataset::from_reader(format!("{}{}", HEADER, rows).as_bytes()).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn amount(s: &str) -> Amount {
        s.parse().unwrap()
    }

    fn categories(performance: &[CategorySales]) -> Vec<&str> {
        performance.iter().map(|entry| entry.category.as_str()).collect()
    }

    #[test]
    fn daily_example() {
        let dataset = dataset(
            r#"o1, c1, SP, bebes, 10, 1, 2018-01-01 08:00:00
               o2, c2, SP, bebes, 20, 1, 2018-01-01 12:00:00
               o3, c3, RJ, bebes, 5,  1, 2018-01-01 18:00:00
               o4, c4, RJ, bebes, 50, 1, 2018-01-02 09:00:00"#,
        );

        assert_eq!(
            daily_orders(dataset.orders()),
            vec![
                DailyOrders { date: date("2018-01-01"), order_count: 3, revenue: amount("35") },
                DailyOrders { date: date("2018-01-02"), order_count: 1, revenue: amount("50") },
            ],
        );
    }

    #[test]
    fn daily_counts_distinct_orders() {
        // one order with three items
        let dataset = dataset(
            r#"o1, c1, SP, bebes,      10.50, 1, 2018-01-01 08:00:00
               o1, c1, SP, bebes,      10.50, 1, 2018-01-01 08:00:00
               o1, c1, SP, perfumaria, 3.25,  1, 2018-01-01 08:00:00
               o2, c2, SP, perfumaria, ,      1, 2018-01-01 10:00:00"#,
        );
        let daily = daily_orders(dataset.orders());

        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].order_count, 2);
        assert_eq!(daily[0].revenue, amount("24.25"));
    }

    #[test]
    fn daily_totals_match_input() {
        let dataset = dataset(
            r#"o1, c1, SP, bebes,      19.99, 1, 2018-01-01 08:00:00
               o2, c1, SP, bebes,      0.01,  1, 2018-01-03 08:00:00
               o2, c1, SP, perfumaria, 7.77,  1, 2018-01-03 08:00:00
               o3, c2, RJ, perfumaria, 100,   1, 2018-01-07 23:00:00
               o4, c3, MG, esporte,    12.34, 1, 2018-01-07 23:30:00"#,
        );
        let daily = daily_orders(dataset.orders());

        let order_count: usize = daily.iter().map(|day| day.order_count).sum();
        let distinct = dataset.orders().iter().map(Order::id).collect::<HashSet<_>>().len();
        assert_eq!(order_count, distinct);

        let revenue = daily.iter().fold(Amount::ZERO, |sum, day| sum + day.revenue);
        let prices = dataset.orders().iter().filter_map(Order::price).fold(Amount::ZERO, |sum, price| sum + price);
        assert_eq!(revenue, prices);

        let dates = daily.iter().map(|day| day.date).collect::<Vec<_>>();
        assert_eq!(dates, [date("2018-01-01"), date("2018-01-03"), date("2018-01-07")]);
    }

    #[test]
    fn fills_missing_days() {
        let dataset = dataset(
            r#"o1, c1, SP, bebes, 10, 1, 2018-01-02 08:00:00
               o2, c2, SP, bebes, 20, 1, 2018-01-04 08:00:00"#,
        );
        let daily = daily_orders(dataset.orders());
        let range = DateRange::new(date("2018-01-01"), date("2018-01-05")).unwrap();
        let filled = fill_missing_days(&daily, range);

        let counts = filled.iter().map(|day| (day.date, day.order_count)).collect::<Vec<_>>();
        assert_eq!(
            counts,
            [
                (date("2018-01-01"), 0),
                (date("2018-01-02"), 1),
                (date("2018-01-03"), 0),
                (date("2018-01-04"), 1),
                (date("2018-01-05"), 0),
            ],
        );
        assert_eq!(filled[2].revenue, Amount::ZERO);
        assert_eq!(filled[3].revenue, amount("20"));
    }

    #[test]
    fn fill_drops_days_outside_range() {
        let dataset = dataset(
            r#"o1, c1, SP, bebes, 10, 1, 2018-01-01 08:00:00
               o2, c2, SP, bebes, 20, 1, 2018-01-03 08:00:00"#,
        );
        let daily = daily_orders(dataset.orders());
        let filled = fill_missing_days(&daily, DateRange::day(date("2018-01-03")));

        assert_eq!(filled, [DailyOrders { date: date("2018-01-03"), order_count: 1, revenue: amount("20") }]);
    }

    const CATEGORIES: &str = r#"o1,  c1, SP, cama_mesa_banho,  10, 30,   2018-01-01 08:00:00
                                o2,  c2, SP, beleza_saude,     10, 25.5, 2018-01-01 08:00:00
                                o3,  c3, SP, esporte_lazer,    10, 20,   2018-01-01 08:00:00
                                o4,  c4, SP, moveis_decoracao, 10, 12,   2018-01-01 08:00:00
                                o5,  c5, SP, informatica,      10, 9.5,  2018-01-01 08:00:00
                                o6,  c6, SP, bebes,            10, 7,    2018-01-01 08:00:00
                                o6,  c6, SP, bebes,            10, 7,    2018-01-01 08:00:00
                                o7,  c7, SP, perfumaria,       10, 3,    2018-01-01 08:00:00
                                o8,  c8, SP, artes,            10, 3,    2018-01-01 08:00:00
                                o9,  c9, SP, ,                 10, 99,   2018-01-01 08:00:00
                                o10, c9, SP, flores,           10, ,     2018-01-01 08:00:00"#;

    #[test]
    fn ranks_categories_by_freight() {
        let dataset = dataset(CATEGORIES);
        let performance = CategoryPerformance::from_orders(dataset.orders(), Ranking::Freight);

        assert_eq!(performance.entries().len(), 9);
        assert_eq!(performance.entries()[0], CategorySales { category: "cama_mesa_banho".into(), value: amount("30") });
        assert_eq!(
            categories(performance.top(5)),
            ["cama_mesa_banho", "beleza_saude", "esporte_lazer", "bebes", "moveis_decoracao"],
        );
        assert_eq!(
            categories(&performance.bottom(5)),
            ["flores", "artes", "perfumaria", "informatica", "moveis_decoracao"],
        );
    }

    #[test]
    fn top_and_bottom_are_sorted_subsets() {
        let dataset = dataset(CATEGORIES);
        let performance = CategoryPerformance::from_orders(dataset.orders(), Ranking::Freight);
        let top = performance.top(5);
        let bottom = performance.bottom(5);

        assert!(top.windows(2).all(|pair| pair[0].value >= pair[1].value));
        assert!(bottom.windows(2).all(|pair| pair[0].value <= pair[1].value));
        assert!(top.iter().all(|entry| performance.entries().contains(entry)));
        assert!(bottom.iter().all(|entry| performance.entries().contains(entry)));
    }

    #[test]
    fn ranks_categories_by_orders() {
        let dataset = dataset(CATEGORIES);
        let performance = CategoryPerformance::from_orders(dataset.orders(), Ranking::Orders);

        assert_eq!(performance.ranking(), Ranking::Orders);
        // every category holds exactly one distinct order, so names break the tie
        assert_eq!(categories(performance.top(3)), ["artes", "bebes", "beleza_saude"]);
        assert!(performance.entries().iter().all(|entry| entry.value == Amount::from_num(1)));
    }

    #[test]
    fn slices_shorter_than_requested() {
        let dataset = dataset("o1, c1, SP, bebes, 10, 1, 2018-01-01 08:00:00");
        let performance = CategoryPerformance::from_orders(dataset.orders(), Ranking::Freight);

        assert_eq!(performance.top(5).len(), 1);
        assert_eq!(performance.bottom(5).len(), 1);
    }

    #[test]
    fn counts_distinct_customers_per_state() {
        let dataset = dataset(
            r#"o1, c1, SP, bebes, 10, 1, 2018-01-01 08:00:00
               o2, c1, SP, bebes, 10, 1, 2018-01-02 08:00:00
               o3, c2, SP, bebes, 10, 1, 2018-01-02 08:00:00
               o4, c3, RJ, bebes, 10, 1, 2018-01-03 08:00:00
               o5, c4, MG, bebes, 10, 1, 2018-01-03 08:00:00
               o6, c5, MG, bebes, 10, 1, 2018-01-03 08:00:00
               o7, c6, AC, bebes, 10, 1, 2018-01-03 08:00:00
               o8, c7, ,   bebes, 10, 1, 2018-01-03 08:00:00"#,
        );
        let states = customers_by_state(dataset.orders());

        assert_eq!(
            states.iter().map(|state| (state.state.as_str(), state.customer_count)).collect::<Vec<_>>(),
            [("MG", 2), ("SP", 2), ("AC", 1), ("RJ", 1)],
        );

        let total: usize = states.iter().map(|state| state.customer_count).sum();
        let distinct = dataset.orders()
            .iter()
            .filter(|order| order.state().is_some())
            .map(Order::customer)
            .collect::<HashSet<_>>()
            .len();
        assert_eq!(total, distinct);
    }

    #[test]
    fn empty_input_yields_empty_aggregates() {
        assert!(daily_orders(&[]).is_empty());
        assert!(customers_by_state(&[]).is_empty());

        let performance = CategoryPerformance::from_orders(&[], Ranking::Freight);
        assert!(performance.top(5).is_empty());
        assert!(performance.bottom(5).is_empty());
    }
}
