use crate::ir::{AggregatedEntry, RawRecord, MONTHS};

/// Mean of the twelve monthly readings; missing readings count as zero.
pub fn monthly_mean(record: &RawRecord) -> f64 {
    let total: f64 = record.months.iter().map(|m| m.unwrap_or(0.0)).sum();
    total / MONTHS as f64
}

/// Reduce each record to its mean and rank the result, highest first.
/// The sort is stable, so ties keep their input order.
pub fn aggregate(records: &[RawRecord]) -> Vec<AggregatedEntry> {
    let mut entries: Vec<AggregatedEntry> = records
        .iter()
        .map(|record| AggregatedEntry {
            category: record.category.clone(),
            value: monthly_mean(record),
        })
        .collect();

    entries.sort_by(|a, b| b.value.total_cmp(&a.value));
    entries
}

/// One decimal place, as shown on value labels and tooltips.
pub fn format_value(value: f64) -> String {
    format!("{:.1}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(category: &str, months: [Option<f64>; MONTHS]) -> RawRecord {
        RawRecord {
            category: category.to_string(),
            months,
        }
    }

    fn filled(category: &str, value: f64) -> RawRecord {
        record(category, [Some(value); MONTHS])
    }

    #[test]
    fn test_mean_corozal() {
        let corozal = record(
            "Corozal",
            [
                Some(10.0), Some(20.0), Some(30.0), Some(40.0), Some(50.0), Some(60.0),
                Some(70.0), Some(80.0), Some(90.0), Some(100.0), Some(110.0), Some(0.0),
            ],
        );
        // 660 / 12
        assert_eq!(monthly_mean(&corozal), 55.0);
        assert_eq!(format_value(monthly_mean(&corozal)), "55.0");
    }

    #[test]
    fn test_all_missing_is_zero() {
        assert_eq!(monthly_mean(&record("Belize", [None; MONTHS])), 0.0);
    }

    #[test]
    fn test_partially_missing_counts_as_zero() {
        let mut months = [Some(12.0); MONTHS];
        months[0] = None;
        months[5] = None;
        // 10 * 12 / 12
        assert_eq!(monthly_mean(&record("Cayo", months)), 10.0);
    }

    #[test]
    fn test_aggregate_sorted_descending() {
        let records = vec![
            filled("Orange Walk", 0.0),
            filled("Corozal", 5.0),
            filled("Toledo", 200.0),
            filled("Cayo", 100.0),
        ];
        let entries = aggregate(&records);
        assert_eq!(entries.len(), records.len());
        let names: Vec<_> = entries.iter().map(|e| e.category.as_str()).collect();
        assert_eq!(names, vec!["Toledo", "Cayo", "Corozal", "Orange Walk"]);
        assert!(entries.windows(2).all(|w| w[0].value >= w[1].value));
    }

    #[test]
    fn test_aggregate_ties_keep_input_order() {
        let records = vec![
            filled("Stann Creek", 50.0),
            filled("Belize", 50.0),
            filled("Cayo", 50.0),
        ];
        let names: Vec<_> = aggregate(&records).into_iter().map(|e| e.category).collect();
        assert_eq!(names, vec!["Stann Creek", "Belize", "Cayo"]);
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn test_format_value_rounds() {
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(123.456), "123.5");
    }
}
