use sales_dashboard::analyzers::aggregate::aggregate;
use sales_dashboard::analyzers::dashboard::DashboardReport;
use sales_dashboard::analyzers::types::{GroupKey, GroupValue, Reduction, YearMonth};
use sales_dashboard::filter::{FilterCriteria, filter};
use sales_dashboard::output::to_csv_bytes;
use sales_dashboard::parser::parse_records;
use rust_decimal::Decimal;

fn fixture() -> Vec<sales_dashboard::records::SaleRecord> {
    let bytes = include_bytes!("fixtures/sample_sales.json");
    parse_records(bytes).expect("Failed to parse fixture")
}

#[test]
fn test_full_pipeline() {
    let records = fixture();
    assert_eq!(records.len(), 8);

    let criteria = FilterCriteria::new()
        .with_categories(["eletronicos", "moveis"])
        .with_price(Decimal::from(500), Decimal::from(5000));
    let selected = filter(&records, &criteria);
    assert_eq!(selected.len(), 4);

    let by_state = aggregate(&selected, GroupKey::Location, Reduction::Sum, true);
    assert_eq!(by_state.len(), 2);
    assert_eq!(by_state.rows[0].key, GroupValue::Text("SP".to_string()));
    assert_eq!(by_state.rows[0].geo.map(|g| g.lat), Some(-22.19));
    assert_eq!(by_state.total_sum(), selected.iter().map(|r| r.price).sum::<Decimal>());

    let report = DashboardReport::build(&selected, 2);
    assert_eq!(report.metrics.sales, 4);
    assert_eq!(report.sellers.top_by_sales.len(), 2);
}

#[test]
fn test_monthly_revenue_spans_years_in_order() {
    let records = fixture();
    let monthly = aggregate(&records, GroupKey::Month, Reduction::Sum, false);

    let months: Vec<_> = monthly
        .iter()
        .map(|row| match &row.key {
            GroupValue::Month(ym) => *ym,
            other => panic!("unexpected key {other}"),
        })
        .collect();

    assert_eq!(months.first(), Some(&YearMonth { year: 2020, month: 1 }));
    assert_eq!(months.last(), Some(&YearMonth { year: 2022, month: 7 }));
    assert!(months.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(monthly.len(), 5);
}

#[test]
fn test_count_totals_match_filtered_input() {
    let records = fixture();
    let criteria = FilterCriteria::new().with_payment_types(["cartao_credito", "boleto"]);
    let selected = filter(&records, &criteria);

    for key in [GroupKey::Location, GroupKey::Seller, GroupKey::Category, GroupKey::Month] {
        let counts = aggregate(&selected, key, Reduction::Count, false);
        assert_eq!(counts.total_count(), selected.len());
    }
}

#[test]
fn test_filtered_export() {
    let records = fixture();
    let selected = filter(&records, &FilterCriteria::new().with_locations(["RJ"]));
    let csv = String::from_utf8(to_csv_bytes(&selected).unwrap()).unwrap();

    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().skip(1).all(|l| l.contains(",RJ,")));
}
