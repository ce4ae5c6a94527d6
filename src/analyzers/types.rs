//! Data types used by the aggregation pipeline.

use chrono::{Datelike, Month, NaiveDate};
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::records::{GeoPoint, SaleRecord};

/// Field (or derived composite) that records are partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Location,
    Category,
    Seller,
    Product,
    PaymentType,
    /// `(year, month)` of the purchase date.
    Month,
}

impl GroupKey {
    /// Resolves a field name, accepting the API's Portuguese column names.
    /// Returns `None` for fields that cannot be grouped on.
    pub fn from_field(name: &str) -> Option<Self> {
        match name.trim() {
            "location" | "Local da compra" => Some(GroupKey::Location),
            "category" | "Categoria do Produto" => Some(GroupKey::Category),
            "seller" | "Vendedor" => Some(GroupKey::Seller),
            "product" | "Produto" => Some(GroupKey::Product),
            "payment_type" | "Tipo de pagamento" => Some(GroupKey::PaymentType),
            "month" | "Data da Compra" => Some(GroupKey::Month),
            _ => None,
        }
    }

    pub fn value_of(self, record: &SaleRecord) -> GroupValue {
        match self {
            GroupKey::Location => GroupValue::Text(record.location.clone()),
            GroupKey::Category => GroupValue::Text(record.category.clone()),
            GroupKey::Seller => GroupValue::Text(record.seller.clone()),
            GroupKey::Product => GroupValue::Text(record.product.clone()),
            GroupKey::PaymentType => GroupValue::Text(record.payment_type.clone()),
            GroupKey::Month => GroupValue::Month(YearMonth::of(record.purchase_date)),
        }
    }
}

/// Which reductions are computed per group. Sums are over `price`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reduction {
    Sum,
    Count,
    SumAndCount,
}

impl Reduction {
    /// Metric used for the default descending ordering.
    pub fn primary(self) -> Metric {
        match self {
            Reduction::Sum | Reduction::SumAndCount => Metric::Sum,
            Reduction::Count => Metric::Count,
        }
    }

    pub(crate) fn sums(self) -> bool {
        matches!(self, Reduction::Sum | Reduction::SumAndCount)
    }

    pub(crate) fn counts(self) -> bool {
        matches!(self, Reduction::Count | Reduction::SumAndCount)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Sum,
    Count,
}

/// Calendar month bucket. Orders chronologically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// English month name, e.g. `"January"`.
    pub fn month_name(&self) -> &'static str {
        u8::try_from(self.month)
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .map(|m| m.name())
            .unwrap_or("")
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("YearMonth", 3)?;
        s.serialize_field("year", &self.year)?;
        s.serialize_field("month", &self.month)?;
        s.serialize_field("month_name", self.month_name())?;
        s.end()
    }
}

/// The value a group was formed on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum GroupValue {
    Text(String),
    Month(YearMonth),
}

impl fmt::Display for GroupValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupValue::Text(s) => f.write_str(s),
            GroupValue::Month(ym) => ym.fmt(f),
        }
    }
}

/// One group of an [`AggregationResult`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: GroupValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sum: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<GeoPoint>,
}

impl AggregateRow {
    /// Value of `metric` for this row; metrics that were not reduced read as zero.
    pub fn value(&self, metric: Metric) -> Decimal {
        match metric {
            Metric::Sum => self.sum.unwrap_or(Decimal::ZERO),
            Metric::Count => Decimal::from(self.count.unwrap_or(0)),
        }
    }
}

/// Ordered groups produced by [`aggregate`](super::aggregate::aggregate).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AggregationResult {
    pub rows: Vec<AggregateRow>,
}

impl AggregationResult {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregateRow> {
        self.rows.iter()
    }
}
