mod common;

use common::{day, table_from, write_csv};
use demand_forecast::data::{DataLoader, DateRange};
use demand_forecast::error::ForecastError;
use demand_forecast::utils::{date_parser, future_dates};
use pretty_assertions::assert_eq;
use rstest::rstest;

#[test]
fn test_data_loader_from_csv() {
    let file = write_csv(
        "product_id,date,sales\n\
         P001,2023-01-01,5\n\
         P001,2023-01-02,7\n\
         P002,2023-01-02,3\n",
    );

    let table = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(table.len(), 3);
    assert!(!table.is_empty());
    assert_eq!(table.columns(), vec!["product_id", "date", "sales"]);
    assert!(table.has_column("sales"));
    assert!(!table.has_column("Sales"));
}

#[test]
fn test_columns_read_as_text_and_numbers() {
    let table = table_from(
        "id,date,units\n\
         A,2023-01-01,4\n\
         A,,n/a\n\
         A,2023-01-03,2.5\n",
    );

    let dates = table.text_column("date").unwrap();
    assert_eq!(dates.len(), 3);
    assert_eq!(dates[0].as_deref(), Some("2023-01-01"));
    assert!(dates[1].as_deref().map_or(true, str::is_empty));
    assert_eq!(dates[2].as_deref(), Some("2023-01-03"));

    let units = table.numeric_column("units").unwrap();
    assert_eq!(units, vec![Some(4.0), None, Some(2.5)]);

    assert_eq!(table.distinct_count("id").unwrap(), 1);
}

#[test]
fn test_unknown_column_is_a_schema_error() {
    let table = table_from("id,date,units\nA,2023-01-01,4\n");
    assert!(matches!(
        table.numeric_column("revenue"),
        Err(ForecastError::SchemaError(_))
    ));
}

#[test]
fn test_data_loader_error_handling() {
    let result = DataLoader::from_csv("nonexistent_file.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));
}

#[test]
fn test_date_range() {
    let range = DateRange::new(day(2023, 1, 1), day(2023, 1, 31)).unwrap();
    assert_eq!(range.days(), 31);
    assert!(range.contains(day(2023, 1, 31)));
    assert!(!range.contains(day(2023, 2, 1)));

    let inverted = DateRange::new(day(2023, 2, 1), day(2023, 1, 1));
    assert!(matches!(inverted, Err(ForecastError::DateRangeError(_))));

    let bounds = DateRange::new(day(2023, 1, 10), day(2023, 1, 20)).unwrap();
    assert!(range.check_within(&bounds).is_err());
    assert!(bounds.check_within(&range).is_ok());
}

#[rstest]
#[case("2023-03-05")]
#[case("2023/03/05")]
#[case("03/05/2023")]
#[case("20230305")]
#[case("2023-03-05 14:30:00")]
#[case("2023-03-05T14:30:00.250")]
#[case("2023-03-05T14:30:00+02:00")]
#[case("  2023-03-05 ")]
fn test_date_parser_accepts_common_layouts(#[case] raw: &str) {
    assert_eq!(date_parser::parse_date(raw), Some(day(2023, 3, 5)));
}

#[rstest]
#[case("")]
#[case("not-a-date")]
#[case("2023-02-30")]
#[case("13/45/2023")]
fn test_date_parser_rejects_garbage(#[case] raw: &str) {
    assert_eq!(date_parser::parse_date(raw), None);
}

#[test]
fn test_future_dates() {
    let dates = future_dates(day(2023, 12, 30), 3);
    assert_eq!(dates, vec![day(2023, 12, 31), day(2024, 1, 1), day(2024, 1, 2)]);
}
