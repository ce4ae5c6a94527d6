use crate::analyzers::types::{
    AggregateRow, AggregationResult, GroupKey, GroupValue, Metric, Reduction,
};
use crate::records::SaleRecord;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

/// Groups `records` by `key` and reduces each group.
///
/// Month groups come back in chronological order. Every other grouping is
/// ordered by the reduction's primary metric, descending, with ties broken
/// by ascending key. When `join_geo` is set and the grouping is by location,
/// each row carries the coordinates of the first record seen for it.
pub fn aggregate(
    records: &[SaleRecord],
    key: GroupKey,
    reduction: Reduction,
    join_geo: bool,
) -> AggregationResult {
    let mut index: HashMap<GroupValue, usize> = HashMap::new();
    let mut rows: Vec<AggregateRow> = Vec::new();
    let attach_geo = join_geo && key == GroupKey::Location;

    for record in records {
        let value = key.value_of(record);
        let slot = *index.entry(value.clone()).or_insert_with(|| {
            rows.push(AggregateRow {
                key: value,
                sum: reduction.sums().then_some(Decimal::ZERO),
                count: reduction.counts().then_some(0),
                geo: attach_geo.then(|| record.geo()),
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        if let Some(sum) = row.sum.as_mut() {
            *sum += record.price;
        }
        if let Some(count) = row.count.as_mut() {
            *count += 1;
        }
    }

    let mut result = AggregationResult { rows };
    if key == GroupKey::Month {
        result.rows.sort_by(|a, b| a.key.cmp(&b.key));
    } else {
        result.sort_desc(reduction.primary());
    }
    result
}

/// Like [`aggregate`], with the group key given as a field name.
///
/// A name that is not a groupable field produces an empty result.
pub fn aggregate_field(
    records: &[SaleRecord],
    field: &str,
    reduction: Reduction,
    join_geo: bool,
) -> AggregationResult {
    match GroupKey::from_field(field) {
        Some(key) => aggregate(records, key, reduction, join_geo),
        None => {
            warn!(field, "Cannot group on field; returning empty aggregation");
            AggregationResult::default()
        }
    }
}

fn by_value_desc(metric: Metric) -> impl Fn(&AggregateRow, &AggregateRow) -> Ordering {
    move |a, b| {
        b.value(metric)
            .cmp(&a.value(metric))
            .then_with(|| a.key.cmp(&b.key))
    }
}

impl AggregationResult {
    fn sort_desc(&mut self, metric: Metric) {
        self.rows.sort_by(by_value_desc(metric));
    }

    /// Returns a copy re-ordered by `metric`, descending, ties by key.
    pub fn sorted_by(&self, metric: Metric) -> AggregationResult {
        let mut sorted = self.clone();
        sorted.sort_desc(metric);
        sorted
    }

    /// Keeps the first `n` rows of an already ordered result.
    pub fn top_n(&self, n: usize) -> AggregationResult {
        AggregationResult {
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Total of the per-group counts.
    pub fn total_count(&self) -> usize {
        self.rows.iter().filter_map(|r| r.count).sum()
    }

    /// Total of the per-group sums.
    pub fn total_sum(&self) -> Decimal {
        self.rows.iter().filter_map(|r| r.sum).sum()
    }

    /// Largest value of `metric` across groups, zero when empty.
    pub fn max_value(&self, metric: Metric) -> Decimal {
        self.rows
            .iter()
            .map(|r| r.value(metric))
            .max()
            .unwrap_or(Decimal::ZERO)
    }
}
