use chrono::{NaiveDate, NaiveDateTime};
use fixed::types::U64F64;

/// A non-negative monetary amount
///
/// Decimal prices are not exact in binary fixed point. Each one is off by
/// less than 2^-64, so sums over millions of rows stay within a cent.
pub type Amount = U64F64;

/// The unique identifier of an order
#[derive(Clone, Debug, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// The id as read from the input
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The unique identifier of a customer
#[derive(Clone, Debug, serde::Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    /// The id as read from the input
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One row of the order table
///
/// The input file is a pre-joined table, so the same order appears once per
/// ordered item. Columns not listed here are ignored on load.
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Order {
    #[serde(rename = "order_id")]
    id: OrderId,
    #[serde(rename = "customer_id")]
    customer: CustomerId,
    #[serde(rename = "customer_state")]
    state: Option<String>,
    #[serde(rename = "product_category_name")]
    category: Option<String>,
    price: Option<Amount>,
    #[serde(rename = "freight_value")]
    freight: Option<Amount>,
    #[serde(rename = "order_purchase_timestamp", deserialize_with = "timestamp::deserialize")]
    purchased_at: NaiveDateTime,
    #[serde(rename = "order_approved_at", default, deserialize_with = "timestamp::deserialize_optional")]
    approved_at: Option<NaiveDateTime>,
}

impl Order {
    /// The id of the order this row belongs to
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// The customer who placed the order
    pub fn customer(&self) -> &CustomerId {
        &self.customer
    }

    /// The customer's state, if known
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// The product category of the ordered item, if known
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The item price
    pub fn price(&self) -> Option<Amount> {
        self.price
    }

    /// The freight value charged for the item
    pub fn freight(&self) -> Option<Amount> {
        self.freight
    }

    /// When the order was placed
    pub fn purchased_at(&self) -> NaiveDateTime {
        self.purchased_at
    }

    /// The calendar day of the purchase
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }

    /// When the payment was approved, if it was
    pub fn approved_at(&self) -> Option<NaiveDateTime> {
        self.approved_at
    }
}

/// Parsing of the timestamp columns
///
/// Both full timestamps (`2018-01-01 10:56:33`) and bare dates are accepted,
/// a bare date meaning midnight.
mod timestamp {
    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use serde::Deserialize;

    const DATE_TIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
    const DATE_FORMAT: &str = "%Y-%m-%d";

    pub fn parse(value: &str) -> Option<NaiveDateTime> {
        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(value, DATE_FORMAT)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
        where D: serde::Deserializer<'de>
    {
        let value = String::deserialize(deserializer)?;
        parse(&value).ok_or_else(|| invalid(&value))
    }

    pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
        where D: serde::Deserializer<'de>
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(value) if !value.is_empty() => parse(&value).map(Some).ok_or_else(|| invalid(&value)),
            _ => Ok(None),
        }
    }

    fn invalid<E: serde::de::Error>(value: &str) -> E {
        E::custom(format_args!("invalid timestamp `{}`", value))
    }
}
