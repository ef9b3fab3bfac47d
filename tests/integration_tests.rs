use chrono::NaiveDate;
use olist_dashboard::aggregate::{average_review_by_region, daily_revenue, revenue_by_category, total};
use olist_dashboard::loader::{load_table, read_table};
use olist_dashboard::report::{Highlights, render_summary};
use olist_dashboard::{Pipeline, PipelineError, Record, Table, Window, filter};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/orders.csv");

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn pipeline() -> Pipeline {
    Pipeline::new(load_table(FIXTURE).expect("Failed to load fixture"))
}

fn scenario_table() -> Table {
    let row = |state: &str, score: f64, category: &str, payment: f64, day: &str| Record {
        order_purchase_timestamp: date(day).and_hms_opt(12, 0, 0).unwrap(),
        customer_state: Some(state.to_string()),
        review_score: Some(score),
        product_category_name: Some(category.to_string()),
        payment_value: Some(payment),
    };
    Table::new(vec![
        row("SP", 5.0, "electronics", 100.0, "2018-01-01"),
        row("SP", 3.0, "electronics", 50.0, "2018-01-02"),
        row("RJ", 1.0, "toys", 20.0, "2018-01-01"),
    ])
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_full_pipeline() {
    let p = pipeline();
    assert_eq!(p.table().len(), 10);

    let window = p.default_window().unwrap();
    assert_eq!(window.start, date("2017-10-02"));
    assert_eq!(window.end, date("2017-10-06"));

    let views = p.views(&window).unwrap();
    assert_eq!(views.record_count, 10);
    assert_eq!(views.daily_revenue.len(), 5);
    assert!(render_summary(&views, 5).contains("Total Revenue: R$ 660,53"));
}

#[test]
fn test_scenario_full_range() {
    let table = scenario_table();
    let window = Window::covering(&table).unwrap();
    let filtered = filter(&table, &window).unwrap();

    let avg = average_review_by_region(&filtered);
    assert_eq!(avg.keys().cloned().collect::<Vec<_>>(), vec!["SP", "RJ"]);
    assert_eq!(avg.get(&"SP".to_string()), Some(4.0));
    assert_eq!(avg.get(&"RJ".to_string()), Some(1.0));

    let revenue = revenue_by_category(&filtered);
    assert_eq!(revenue.get(&"electronics".to_string()), Some(150.0));
    assert_eq!(revenue.get(&"toys".to_string()), Some(20.0));

    assert_eq!(total(&daily_revenue(&filtered)), 170.0);
}

#[test]
fn test_scenario_single_day() {
    let table = scenario_table();
    let window = Window::parse("2018-01-01", "2018-01-01").unwrap();
    let filtered = filter(&table, &window).unwrap();

    assert_eq!(filtered.len(), 2);
    assert!(filtered.iter().all(|r| r.purchase_date() == date("2018-01-01")));

    let revenue = revenue_by_category(&filtered);
    assert_eq!(revenue.len(), 2);
    assert_eq!(revenue.get(&"electronics".to_string()), Some(100.0));
    assert_eq!(revenue.get(&"toys".to_string()), Some(20.0));
}

#[test]
fn test_range_containment() {
    let p = pipeline();
    let window = Window::parse("2017-10-03", "2017-10-05").unwrap();
    let filtered = filter(p.table(), &window).unwrap();

    assert_eq!(filtered.len(), 7);
    for record in filtered.iter() {
        assert!(window.start <= record.purchase_date());
        assert!(record.purchase_date() <= window.end);
    }
}

#[test]
fn test_total_consistency() {
    let p = pipeline();
    let window = Window::parse("2017-10-02", "2017-10-05").unwrap();
    let filtered = filter(p.table(), &window).unwrap();
    let views = p.views(&window).unwrap();

    assert!(approx_eq(views.total_revenue, views.daily_revenue.sum()));
    assert!(approx_eq(views.total_revenue, filtered.payment_total()));
}

#[test]
fn test_total_consistency_with_nan_payment() {
    let csv = "order_purchase_timestamp,customer_state,review_score,product_category_name,payment_value\n\
               2018-01-01 09:00:00,SP,5,toys,10.0\n\
               2018-01-01 10:00:00,SP,4,toys,NaN\n";
    let p = Pipeline::new(read_table(csv.as_bytes()).unwrap());
    let window = p.default_window().unwrap();
    let filtered = filter(p.table(), &window).unwrap();
    let views = p.views(&window).unwrap();

    assert_eq!(filtered.len(), 2);
    assert_eq!(views.total_revenue, 10.0);
    assert_eq!(views.total_revenue, views.daily_revenue.sum());
    assert_eq!(views.total_revenue, filtered.payment_total());
    assert_eq!(views.revenue_by_category.get(&"toys".to_string()), Some(10.0));
}

#[test]
fn test_ranked_views_are_non_increasing() {
    let views = pipeline().views(&Window::parse("2017-10-01", "2017-10-31").unwrap()).unwrap();

    for series in [&views.average_review_by_region, &views.revenue_by_category] {
        let values: Vec<f64> = series.values().collect();
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_missing_values_in_fixture() {
    let views = pipeline().views(&pipeline().default_window().unwrap()).unwrap();

    // RS has no review score, PR has no payment and no category.
    assert_eq!(views.average_review_by_region.get(&"RS".to_string()), None);
    assert_eq!(views.average_review_by_region.get(&"PR".to_string()), Some(2.0));
    assert_eq!(views.average_review_by_region.get(&"SP".to_string()), Some(4.0));
    assert_eq!(views.revenue_by_category.len(), 7);
    assert!(approx_eq(
        views.daily_revenue.get(&date("2017-10-04")).unwrap(),
        38.62
    ));
}

#[test]
fn test_full_window_returns_full_table() {
    let p = pipeline();
    let window = p.default_window().unwrap();
    assert_eq!(&filter(p.table(), &window).unwrap(), p.table());
}

#[test]
fn test_disjoint_window_is_empty_not_error() {
    let p = pipeline();

    for (start, end) in [("2016-01-01", "2016-12-31"), ("2019-01-01", "2019-01-31")] {
        let views = p.views(&Window::parse(start, end).unwrap()).unwrap();
        assert_eq!(views.record_count, 0);
        assert!(views.average_review_by_region.is_empty());
        assert!(views.revenue_by_category.is_empty());
        assert!(views.daily_revenue.is_empty());
        assert_eq!(views.total_revenue, 0.0);
    }
}

#[test]
fn test_idempotent() {
    let p = pipeline();
    let window = Window::parse("2017-10-03", "2017-10-06").unwrap();
    let first = p.views(&window).unwrap();
    let second = p.views(&window).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first.total_revenue.to_bits(),
        second.total_revenue.to_bits()
    );
}

#[test]
fn test_invalid_window() {
    let p = pipeline();
    let window = Window {
        start: date("2017-10-06"),
        end: date("2017-10-02"),
    };

    assert!(matches!(
        p.views(&window),
        Err(PipelineError::InvalidWindow { .. })
    ));
}

#[test]
fn test_top_and_bottom_five() {
    let views = pipeline().views(&pipeline().default_window().unwrap()).unwrap();
    let revenue = &views.revenue_by_category;

    let top: Vec<_> = revenue.top_n(5).unwrap().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(
        top,
        vec!["perfumaria", "automotivo", "esporte_lazer", "pet_shop", "beleza_saude"]
    );

    let bottom: Vec<_> = revenue.bottom_n(5).unwrap().iter().map(|e| e.key.as_str()).collect();
    assert_eq!(
        bottom,
        vec!["esporte_lazer", "pet_shop", "beleza_saude", "papelaria", "utilidades_domesticas"]
    );

    assert!(matches!(
        revenue.top_n(8),
        Err(PipelineError::InsufficientData { requested: 8, available: 7 })
    ));

    let highlights = Highlights::from_views(&views, 8);
    assert_eq!(highlights.highest_revenue_categories.len(), 7);
}
