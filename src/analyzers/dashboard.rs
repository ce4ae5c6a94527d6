//! Dashboard report composition.
//!
//! Builds every revenue, sales-count and seller view plus the headline
//! metrics from a single filtered record snapshot.

use crate::analyzers::aggregate::aggregate;
use crate::analyzers::types::{AggregationResult, GroupKey, Metric, Reduction};
use crate::format::format_number;
use crate::records::SaleRecord;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

/// Number of states shown in the "top states" views.
pub const TOP_STATES: usize = 5;
pub const DEFAULT_TOP_SELLERS: usize = 5;
pub const MIN_TOP_SELLERS: usize = 2;
pub const MAX_TOP_SELLERS: usize = 10;

/// Headline figures shown above every tab.
#[derive(Debug, Serialize)]
pub struct Metrics {
    pub revenue: Decimal,
    pub sales: usize,
    pub revenue_label: String,
    pub sales_label: String,
}

/// Revenue views.
#[derive(Debug, Serialize)]
pub struct RevenueViews {
    pub by_state: AggregationResult,
    pub by_month: AggregationResult,
    pub by_category: AggregationResult,
    pub top_states: AggregationResult,
}

/// Sales-count views.
#[derive(Debug, Serialize)]
pub struct SalesViews {
    pub by_state: AggregationResult,
    pub by_month: AggregationResult,
    pub by_category: AggregationResult,
    pub top_states: AggregationResult,
}

/// Seller views; both rankings come from one sum-and-count aggregation.
#[derive(Debug, Serialize)]
pub struct SellerViews {
    pub limit: usize,
    pub all: AggregationResult,
    pub top_by_revenue: AggregationResult,
    pub top_by_sales: AggregationResult,
}

/// Everything the dashboard renders, computed from one record snapshot.
#[derive(Debug, Serialize)]
pub struct DashboardReport {
    pub metrics: Metrics,
    pub revenue: RevenueViews,
    pub sales: SalesViews,
    pub sellers: SellerViews,
}

impl DashboardReport {
    /// Builds every view from `records`. `top_sellers` is clamped to
    /// [`MIN_TOP_SELLERS`]..=[`MAX_TOP_SELLERS`].
    #[tracing::instrument(skip(records), fields(records = records.len()))]
    pub fn build(records: &[SaleRecord], top_sellers: usize) -> Self {
        let limit = top_sellers.clamp(MIN_TOP_SELLERS, MAX_TOP_SELLERS);

        let revenue: Decimal = records.iter().map(|r| r.price).sum();
        let sales = records.len();

        let revenue_by_state = aggregate(records, GroupKey::Location, Reduction::Sum, true);
        let sales_by_state = aggregate(records, GroupKey::Location, Reduction::Count, true);
        let sellers = aggregate(records, GroupKey::Seller, Reduction::SumAndCount, false);

        DashboardReport {
            metrics: Metrics {
                revenue,
                sales,
                revenue_label: format_number(revenue.to_f64().unwrap_or_default(), "R$"),
                sales_label: format_number(sales as f64, ""),
            },
            revenue: RevenueViews {
                top_states: revenue_by_state.top_n(TOP_STATES),
                by_state: revenue_by_state,
                by_month: aggregate(records, GroupKey::Month, Reduction::Sum, false),
                by_category: aggregate(records, GroupKey::Category, Reduction::Sum, false),
            },
            sales: SalesViews {
                top_states: sales_by_state.top_n(TOP_STATES),
                by_state: sales_by_state,
                by_month: aggregate(records, GroupKey::Month, Reduction::Count, false),
                by_category: aggregate(records, GroupKey::Category, Reduction::Count, false),
            },
            sellers: SellerViews {
                limit,
                top_by_revenue: sellers.top_n(limit),
                top_by_sales: sellers.sorted_by(Metric::Count).top_n(limit),
                all: sellers,
            },
        }
    }
}
