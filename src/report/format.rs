//! Terminal formatting for assembled comparison tables.

use crate::compare::ComparisonTable;

/// Per-series summary block: provenance, latest value, simple derived stats.
pub fn format_view_summary(table: &ComparisonTable) -> String {
    let mut out = String::new();

    out.push_str("=== macrot — macro indicator tracker ===\n");
    match (table.dates.first(), table.dates.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("Range: {first}..{last} | rows: {}\n", table.dates.len()));
        }
        _ => out.push_str("Range: (empty)\n"),
    }

    for (idx, column) in table.columns.iter().enumerate() {
        out.push_str(&format!("\n{}\n", column.label));
        if column.is_synthetic {
            let reason = column.fallback_reason.as_deref().unwrap_or("unknown");
            out.push_str(&format!("  source: synthetic fallback ({reason})\n"));
        } else {
            out.push_str("  source: live provider data\n");
        }

        match table.latest(idx) {
            Some((date, value)) => {
                out.push_str(&format!("  latest: {value:.2}{} ({date})\n", column.unit));
            }
            None => out.push_str("  latest: —\n"),
        }

        match table.trailing_delta(idx) {
            Some(delta) => {
                out.push_str(&format!("  12-period Δ: {delta:+.2}{}\n", column.unit));
            }
            None => out.push_str("  12-period Δ: —\n"),
        }

        match table.pct_change_over_range(idx) {
            Some(pct) => out.push_str(&format!("  change over range: {pct:+.1}%\n")),
            None => out.push_str("  change over range: undefined (missing boundary)\n"),
        }
    }

    out
}

/// The joined data table, trailing `max_rows` rows.
pub fn format_comparison_table(table: &ComparisonTable, max_rows: usize) -> String {
    let mut out = String::new();
    if table.is_empty() {
        out.push_str("(no rows)\n");
        return out;
    }

    out.push_str(&format!("{:<12}", "date"));
    for column in &table.columns {
        let mark = if column.is_synthetic { "*" } else { "" };
        out.push_str(&format!(
            " {:>14}",
            truncate(&format!("{} {}{mark}", column.country_key, column.indicator_key), 14)
        ));
    }
    out.push('\n');

    out.push_str(&format!("{:-<12}", ""));
    for _ in &table.columns {
        out.push_str(&format!(" {:->14}", ""));
    }
    out.push('\n');

    let n = table.dates.len();
    let skip = n.saturating_sub(max_rows);
    if skip > 0 {
        out.push_str(&format!("(showing last {max_rows} of {n} rows)\n"));
    }

    for (row, date) in table.dates.iter().enumerate().skip(skip) {
        out.push_str(&format!("{:<12}", date.to_string()));
        for column in &table.columns {
            match column.values[row] {
                Some(v) => out.push_str(&format!(" {v:>14.2}")),
                None => out.push_str(&format!(" {:>14}", "-")),
            }
        }
        out.push('\n');
    }

    if table.columns.iter().any(|c| c.is_synthetic) {
        out.push_str("(* synthetic fallback data)\n");
    }

    out
}

/// Pairwise correlations between every pair of columns.
pub fn format_correlations(table: &ComparisonTable) -> String {
    let mut out = String::new();
    for a in 0..table.columns.len() {
        for b in (a + 1)..table.columns.len() {
            let label = format!(
                "corr({} {}, {} {})",
                table.columns[a].country_key,
                table.columns[a].indicator_key,
                table.columns[b].country_key,
                table.columns[b].indicator_key,
            );
            match table.correlation(a, b) {
                Some(r) => out.push_str(&format!("{label} = {r:+.3}\n")),
                None => out.push_str(&format!("{label} = undefined (too few complete pairs)\n")),
            }
        }
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::SeriesColumn;
    use chrono::NaiveDate;

    fn table() -> ComparisonTable {
        let dates: Vec<NaiveDate> = (1..=3)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        ComparisonTable {
            dates,
            columns: vec![SeriesColumn {
                country_key: "TL".to_string(),
                indicator_key: "CPI".to_string(),
                label: "Testland — Inflation (CPI, % YoY)".to_string(),
                unit: "%",
                is_synthetic: true,
                fallback_reason: Some("no provider configured".to_string()),
                values: vec![Some(1.0), None, Some(3.0)],
            }],
        }
    }

    #[test]
    fn summary_surfaces_provenance_and_reason() {
        let text = format_view_summary(&table());
        assert!(text.contains("synthetic fallback (no provider configured)"));
        assert!(text.contains("latest: 3.00% (2024-03-01)"));
        // Only 3 rows: trailing delta undefined.
        assert!(text.contains("12-period Δ: —"));
    }

    #[test]
    fn data_table_marks_missing_and_synthetic() {
        let text = format_comparison_table(&table(), 50);
        assert!(text.contains("TL CPI*"));
        let missing_row = text.lines().find(|l| l.starts_with("2024-02-01")).unwrap();
        assert!(missing_row.trim_end().ends_with('-'));
        assert!(text.contains("(* synthetic fallback data)"));
    }

    #[test]
    fn single_column_has_no_correlations() {
        assert!(format_correlations(&table()).is_empty());
    }
}
