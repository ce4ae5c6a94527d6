//! Composite record filter.
//!
//! A [`FilterCriteria`] holds one optional criterion per filterable field.
//! Membership criteria are allow-sets (empty means every value passes) and
//! range criteria are closed intervals (`None` means the full range). A
//! record is kept only when every configured criterion passes.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::records::SaleRecord;

/// Closed interval `[min, max]`. A range with `min > max` matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeCriterion<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd> RangeCriterion<T> {
    pub fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: &T) -> bool {
        self.min <= *value && *value <= self.max
    }

    pub fn is_satisfiable(&self) -> bool {
        self.min <= self.max
    }
}

/// Per-field filter configuration. Built fresh for each interaction and
/// only borrowed by [`filter`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub products: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub price: Option<RangeCriterion<Decimal>>,
    pub freight: Option<RangeCriterion<Decimal>>,
    pub purchase_date: Option<RangeCriterion<NaiveDate>>,
    pub rating: Option<RangeCriterion<u8>>,
    pub payment_types: BTreeSet<String>,
    pub installments: Option<RangeCriterion<u32>>,
    pub sellers: BTreeSet<String>,
    pub locations: BTreeSet<String>,
}

fn allowed(set: &BTreeSet<String>, value: &str) -> bool {
    set.is_empty() || set.contains(value)
}

fn in_range<T: PartialOrd>(range: &Option<RangeCriterion<T>>, value: &T) -> bool {
    range.as_ref().is_none_or(|r| r.contains(value))
}

fn collect<I, S>(values: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

impl FilterCriteria {
    /// Criteria that let every record through.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.products = collect(values);
        self
    }

    pub fn with_categories<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        values: I,
    ) -> Self {
        self.categories = collect(values);
        self
    }

    pub fn with_payment_types<I: IntoIterator<Item = S>, S: Into<String>>(
        mut self,
        values: I,
    ) -> Self {
        self.payment_types = collect(values);
        self
    }

    pub fn with_sellers<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.sellers = collect(values);
        self
    }

    pub fn with_locations<I: IntoIterator<Item = S>, S: Into<String>>(mut self, values: I) -> Self {
        self.locations = collect(values);
        self
    }

    pub fn with_price(mut self, min: Decimal, max: Decimal) -> Self {
        self.price = Some(RangeCriterion::new(min, max));
        self
    }

    pub fn with_freight(mut self, min: Decimal, max: Decimal) -> Self {
        self.freight = Some(RangeCriterion::new(min, max));
        self
    }

    pub fn with_purchase_date(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.purchase_date = Some(RangeCriterion::new(from, to));
        self
    }

    pub fn with_rating(mut self, min: u8, max: u8) -> Self {
        self.rating = Some(RangeCriterion::new(min, max));
        self
    }

    pub fn with_installments(mut self, min: u32, max: u32) -> Self {
        self.installments = Some(RangeCriterion::new(min, max));
        self
    }

    /// True when no criterion is configured.
    pub fn is_unrestricted(&self) -> bool {
        *self == Self::default()
    }

    /// False if any configured range has `min > max`.
    pub fn is_satisfiable(&self) -> bool {
        self.price.as_ref().is_none_or(RangeCriterion::is_satisfiable)
            && self.freight.as_ref().is_none_or(RangeCriterion::is_satisfiable)
            && self
                .purchase_date
                .as_ref()
                .is_none_or(RangeCriterion::is_satisfiable)
            && self.rating.as_ref().is_none_or(RangeCriterion::is_satisfiable)
            && self
                .installments
                .as_ref()
                .is_none_or(RangeCriterion::is_satisfiable)
    }

    /// Evaluates every criterion against `record`.
    pub fn matches(&self, record: &SaleRecord) -> bool {
        allowed(&self.products, &record.product)
            && allowed(&self.categories, &record.category)
            && in_range(&self.price, &record.price)
            && in_range(&self.freight, &record.freight)
            && in_range(&self.purchase_date, &record.purchase_date)
            && in_range(&self.rating, &record.rating)
            && allowed(&self.payment_types, &record.payment_type)
            && in_range(&self.installments, &record.installments)
            && allowed(&self.sellers, &record.seller)
            && allowed(&self.locations, &record.location)
    }
}

/// Returns the records that satisfy `criteria`, in input order.
///
/// Never fails: no match, and unsatisfiable ranges, give an empty vector.
pub fn filter(records: &[SaleRecord], criteria: &FilterCriteria) -> Vec<SaleRecord> {
    if !criteria.is_satisfiable() {
        warn!("Filter has a range with min > max; no record can match");
        return Vec::new();
    }

    if criteria.is_unrestricted() {
        return records.to_vec();
    }

    let kept: Vec<SaleRecord> = records
        .iter()
        .filter(|r| criteria.matches(r))
        .cloned()
        .collect();

    debug!(input = records.len(), kept = kept.len(), "Records filtered");
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::tests::{money, record};

    fn price(min: i64, max: i64) -> FilterCriteria {
        FilterCriteria::new().with_price(Decimal::from(min), Decimal::from(max))
    }

    fn sample() -> Vec<SaleRecord> {
        vec![record("SP", 100.0), record("SP", 50.0), record("RJ", 30.0)]
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unrestricted_keeps_everything() {
        let records = sample();
        assert_eq!(filter(&records, &FilterCriteria::new()), records);
    }

    #[test]
    fn test_price_range_is_inclusive() {
        let records = sample();
        let kept = filter(&records, &price(40, 200));
        assert_eq!(kept, records[..2].to_vec());

        let kept = filter(&records, &price(30, 50));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].price, Decimal::from(50));
        assert_eq!(kept[1].price, Decimal::from(30));
    }

    #[test]
    fn test_membership_criterion() {
        let records = sample();
        let kept = filter(&records, &FilterCriteria::new().with_locations(["RJ"]));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location, "RJ");

        let kept = filter(&records, &FilterCriteria::new().with_sellers(["Nobody"]));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_criteria_are_combined_with_and() {
        let records = sample();
        let criteria = price(0, 60).with_locations(["SP"]);
        let kept = filter(&records, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].price, Decimal::from(50));
    }

    #[test]
    fn test_date_rating_and_installments() {
        let mut records = sample();
        records[0].purchase_date = date(2020, 1, 1);
        records[1].rating = 1;
        records[2].installments = 10;

        let kept = filter(
            &records,
            &FilterCriteria::new()
                .with_purchase_date(date(2021, 1, 1), date(2021, 12, 31))
                .with_rating(2, 5)
                .with_installments(1, 6),
        );
        assert!(kept.is_empty());

        let kept = filter(
            &records,
            &FilterCriteria::new().with_purchase_date(date(2021, 3, 15), date(2021, 3, 15)),
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_unsatisfiable_range_yields_empty() {
        let records = sample();
        let criteria = price(200, 40);
        assert!(!criteria.is_satisfiable());
        assert!(filter(&records, &criteria).is_empty());
    }

    #[test]
    fn test_every_inverted_range_yields_empty() {
        let records = sample();
        let day = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
        let inverted = [
            FilterCriteria::new().with_freight(Decimal::from(20), Decimal::from(0)),
            FilterCriteria::new().with_purchase_date(day, date(2021, 3, 14)),
            FilterCriteria::new().with_rating(5, 1),
            FilterCriteria::new().with_installments(12, 1),
        ];

        for criteria in inverted {
            assert!(!criteria.is_satisfiable(), "{:?}", criteria);
            assert!(filter(&records, &criteria).is_empty(), "{:?}", criteria);
        }

        // Same bounds in the right order keep every record.
        let upright = FilterCriteria::new()
            .with_freight(Decimal::from(0), Decimal::from(20))
            .with_purchase_date(date(2021, 3, 14), day)
            .with_rating(1, 5)
            .with_installments(1, 12);
        assert_eq!(filter(&records, &upright), records);
    }

    #[test]
    fn test_price_bounds_are_exact_decimals() {
        let mut records = sample();
        records[2].price = money("0.3");
        let criteria = FilterCriteria::new().with_price(money("0.1") + money("0.2"), money("0.3"));
        let kept = filter(&records, &criteria);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].location, "RJ");
    }

    #[test]
    fn test_filter_is_idempotent_and_subset() {
        let records = sample();
        let criteria = FilterCriteria::new()
            .with_categories(["livros"])
            .with_freight(Decimal::from(0), Decimal::from(10))
            .with_payment_types(["cartao_credito"])
            .with_products(["Modelagem preditiva"])
            .with_price(Decimal::from(45), Decimal::from(1000));

        let once = filter(&records, &criteria);
        let twice = filter(&once, &criteria);
        assert_eq!(once, twice);
        assert!(once.iter().all(|r| records.contains(r) && criteria.matches(r)));
    }

    #[test]
    fn test_empty_input() {
        assert!(filter(&[], &price(0, 1)).is_empty());
    }

    #[test]
    fn test_deserialize_partial_criteria() {
        let json = r#"{"sellers": ["Ana"], "price": {"min": 10.0, "max": 20.0}}"#;
        let criteria: FilterCriteria = serde_json::from_str(json).unwrap();
        assert!(criteria.sellers.contains("Ana"));
        assert_eq!(
            criteria.price,
            Some(RangeCriterion::new(Decimal::from(10), Decimal::from(20)))
        );
        assert!(criteria.rating.is_none());
    }
}
