#![allow(dead_code)]

use chrono::{Days, NaiveDate};
use demand_forecast::data::{DataLoader, RawTable};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn nth_day(start: NaiveDate, offset: usize) -> NaiveDate {
    start.checked_add_days(Days::new(offset as u64)).unwrap()
}

/// Weekly pattern with a slow upward trend
pub fn sales_value(index: usize) -> f64 {
    20.0 + (index % 7) as f64 * 3.0 + index as f64 * 0.1
}

/// One row per day for a single product
pub fn daily_sales_csv(start: NaiveDate, days: usize) -> String {
    let mut csv = String::from("product_id,date,sales\n");
    for i in 0..days {
        csv.push_str(&format!(
            "P001,{},{}\n",
            nth_day(start, i).format("%Y-%m-%d"),
            sales_value(i)
        ));
    }
    csv
}

/// Daily rows where the listed row numbers carry an unparseable date
pub fn daily_sales_csv_with_bad_dates(start: NaiveDate, days: usize, bad_rows: &[usize]) -> String {
    let mut csv = String::from("product_id,date,sales\n");
    for i in 0..days {
        let date = if bad_rows.contains(&i) {
            "not-a-date".to_string()
        } else {
            nth_day(start, i).format("%Y-%m-%d").to_string()
        };
        csv.push_str(&format!("P001,{},{}\n", date, sales_value(i)));
    }
    csv
}

pub fn table_from(csv: &str) -> RawTable {
    DataLoader::from_bytes(csv.as_bytes().to_vec()).unwrap()
}

pub fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", content).unwrap();
    file.flush().unwrap();
    file
}
