//! CSV export for occupancy series and synthesized schedule rules.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::schedule::compile::{DateSpanCompiler, RuleCompiler};
use crate::schedule::synth::SynthesizedSchedule;
use crate::schedule::types::{AnnualSeries, DAYS_PER_YEAR, DayPattern, HOURS_PER_DAY};

/// Column header for hourly occupancy series export.
const SERIES_HEADER: &str = "day_of_year,hour,occupancy";

/// Column header for calendar-rule export: one row per rule date span.
const RULES_HEADER: &str = "group,rule,start_day,end_day,\
                            h00,h01,h02,h03,h04,h05,h06,h07,h08,h09,h10,h11,\
                            h12,h13,h14,h15,h16,h17,h18,h19,h20,h21,h22,h23";

/// Exports an hourly occupancy series to a CSV file at the given path.
///
/// Writes a header row followed by one data row per hour of the year.
/// Produces deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(series: &AnnualSeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_series_csv(series, buf)
}

/// Writes an hourly occupancy series as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_series_csv(series: &AnnualSeries, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(SERIES_HEADER.split(','))?;

    // Data rows
    for day_of_year in 1..=DAYS_PER_YEAR {
        for (hour, value) in series.day(day_of_year).iter().enumerate() {
            wtr.write_record(&[
                day_of_year.to_string(),
                hour.to_string(),
                format!("{value:.6}"),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}

/// Exports a synthesized schedule's calendar rules to a CSV file.
///
/// The default weekday pattern comes first, then the remaining weekday,
/// Saturday, and Sunday rules in deterministic order. Each pattern's
/// occurrence days are collapsed into contiguous date spans, one row per
/// span.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_rules_csv(schedule: &SynthesizedSchedule, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_rules_csv(schedule, buf)
}

/// Writes a synthesized schedule's calendar rules as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_rules_csv(schedule: &SynthesizedSchedule, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    // Header
    wtr.write_record(RULES_HEADER.split(',').map(str::trim))?;

    write_pattern(&mut wtr, "weekday", "default", &schedule.default_pattern)?;
    for (group, patterns) in [
        ("weekday", &schedule.weekday_rules),
        ("saturday", &schedule.saturday_rules),
        ("sunday", &schedule.sunday_rules),
    ] {
        for (index, pattern) in patterns.iter().enumerate() {
            write_pattern(&mut wtr, group, &format!("rule {index}"), pattern)?;
        }
    }

    wtr.flush()?;
    Ok(())
}

fn write_pattern(
    wtr: &mut csv::Writer<impl Write>,
    group: &str,
    rule: &str,
    pattern: &DayPattern,
) -> io::Result<()> {
    let compiled = DateSpanCompiler.compile(pattern);
    for (start_day, end_day) in compiled.date_spans {
        let mut record = Vec::with_capacity(4 + HOURS_PER_DAY);
        record.push(group.to_string());
        record.push(rule.to_string());
        record.push(start_day.to_string());
        record.push(end_day.to_string());
        for value in &compiled.values {
            record.push(format!("{value:.6}"));
        }
        wtr.write_record(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::synth::{SynthesisOptions, synthesize};
    use crate::schedule::types::{PeopleLoad, ScheduleRef, Space, ThresholdPolicy};
    use crate::store::MemoryStore;

    fn constant_schedule() -> SynthesizedSchedule {
        let store = MemoryStore::new();
        let spaces = vec![Space {
            name: "s1".to_string(),
            hours_of_operation: None,
            people: vec![PeopleLoad {
                schedule: ScheduleRef::Constant(0.5),
                occupants: 10.0,
            }],
        }];
        let options = SynthesisOptions::new(2009, ThresholdPolicy::None);
        synthesize(&spaces, &store, &options).expect("valid inputs")
    }

    #[test]
    fn series_header_and_row_count() {
        let series = AnnualSeries::constant(0.5);
        let mut buf = Vec::new();
        write_series_csv(&series, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let lines: Vec<&str> = output.as_deref().unwrap_or("").lines().collect();
        assert_eq!(lines.first().copied(), Some("day_of_year,hour,occupancy"));
        // 1 header + 8760 data rows
        assert_eq!(lines.len(), 8761);
    }

    #[test]
    fn series_values_use_six_decimals() {
        let series = AnnualSeries::constant(1.0 / 3.0);
        let mut buf = Vec::new();
        write_series_csv(&series, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let second_line = output.as_deref().unwrap_or("").lines().nth(1).unwrap_or("");
        assert_eq!(second_line, "1,0,0.333333");
    }

    #[test]
    fn deterministic_output() {
        let schedule = constant_schedule();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_rules_csv(&schedule, &mut buf1).ok();
        write_rules_csv(&schedule, &mut buf2).ok();
        assert_eq!(buf1, buf2);
    }

    #[test]
    fn rules_default_comes_first() {
        let schedule = constant_schedule();
        let mut buf = Vec::new();
        write_rules_csv(&schedule, &mut buf).ok();
        let output = String::from_utf8(buf).ok();
        let second_line = output.as_deref().unwrap_or("").lines().nth(1).unwrap_or("");
        assert!(second_line.starts_with("weekday,default,"));
    }

    #[test]
    fn rules_round_trip_parseable() {
        let schedule = constant_schedule();
        let mut buf = Vec::new();
        write_rules_csv(&schedule, &mut buf).ok();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(28));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.as_ref();
            // Day columns parse as u16, hour columns as f64
            for i in 2..4 {
                let val: Result<u16, _> = rec.unwrap()[i].parse();
                assert!(val.is_ok(), "column {i} should parse as u16");
            }
            for i in 4..28 {
                let val: Result<f64, _> = rec.unwrap()[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert!(row_count > 0);
    }
}
