//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each series gets its own glyph; a legend underneath maps glyphs to
//! labels and marks synthetic series. Missing cells simply leave gaps.

use crate::compare::ComparisonTable;

const GLYPHS: [char; 6] = ['o', 'x', '+', '*', '#', '@'];

/// Render every column of the table into one shared grid.
pub fn render_ascii_chart(table: &ComparisonTable, width: usize, height: usize) -> String {
    let width = width.max(10);
    let height = height.max(5);

    if table.is_empty() || table.columns.is_empty() {
        return "(no data to plot)\n".to_string();
    }

    let n = table.dates.len();
    let (y_min, y_max) = match y_range(table) {
        Some(range) => range,
        None => return "(no data to plot)\n".to_string(),
    };
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for (idx, column) in table.columns.iter().enumerate() {
        let glyph = GLYPHS[idx % GLYPHS.len()];
        let mut prev: Option<(usize, usize)> = None;
        for (row, value) in column.values.iter().enumerate() {
            let Some(v) = value else {
                // A gap breaks the line: the next point starts a new segment.
                prev = None;
                continue;
            };
            let x = map_x(row, n, width);
            let y = map_y(*v, y_min, y_max, height);
            if let Some((px, py)) = prev {
                draw_segment(&mut grid, (px, py), (x, y), glyph);
            }
            grid[y][x] = glyph;
            prev = Some((x, y));
        }
    }

    let mut out = String::new();
    let first = table.dates.first().map(|d| d.to_string()).unwrap_or_default();
    let last = table.dates.last().map(|d| d.to_string()).unwrap_or_default();
    let unit = table.columns[0].unit;
    out.push_str(&format!(
        "Plot: {first}..{last} | y=[{y_min:.2}, {y_max:.2}]{unit}\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    for (idx, column) in table.columns.iter().enumerate() {
        let glyph = GLYPHS[idx % GLYPHS.len()];
        let provenance = if column.is_synthetic {
            " (synthetic)"
        } else {
            ""
        };
        out.push_str(&format!("  {glyph} = {}{provenance}\n", column.label));
    }

    out
}

fn y_range(table: &ComparisonTable) -> Option<(f64, f64)> {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for column in &table.columns {
        for v in column.values.iter().flatten() {
            min_y = min_y.min(*v);
            max_y = max_y.max(*v);
        }
    }
    if min_y.is_finite() && max_y.is_finite() {
        if max_y > min_y {
            Some((min_y, max_y))
        } else {
            // Flat series still plot on a one-unit band.
            Some((min_y - 0.5, max_y + 0.5))
        }
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(row: usize, n_rows: usize, width: usize) -> usize {
    if n_rows <= 1 {
        return 0;
    }
    let u = row as f64 / (n_rows as f64 - 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(v: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((v - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

/// Fill the cells between two plotted points with the series glyph,
/// leaving existing marks in place.
fn draw_segment(grid: &mut [Vec<char>], from: (usize, usize), to: (usize, usize), glyph: char) {
    let (x0, y0) = from;
    let (x1, y1) = to;
    if x1 <= x0 {
        return;
    }
    let steps = x1 - x0;
    for i in 1..steps {
        let u = i as f64 / steps as f64;
        let y = y0 as f64 + u * (y1 as f64 - y0 as f64);
        let x = x0 + i;
        let y = y.round() as usize;
        if grid[y][x] == ' ' {
            grid[y][x] = glyph;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::SeriesColumn;
    use chrono::NaiveDate;

    fn table() -> ComparisonTable {
        let dates: Vec<NaiveDate> = (1..=6)
            .map(|m| NaiveDate::from_ymd_opt(2024, m, 1).unwrap())
            .collect();
        ComparisonTable {
            dates,
            columns: vec![
                SeriesColumn {
                    country_key: "TL".to_string(),
                    indicator_key: "CPI".to_string(),
                    label: "Testland — CPI".to_string(),
                    unit: "%",
                    is_synthetic: true,
                    fallback_reason: None,
                    values: vec![Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)],
                },
                SeriesColumn {
                    country_key: "ZZ".to_string(),
                    indicator_key: "CPI".to_string(),
                    label: "Zedland — CPI".to_string(),
                    unit: "%",
                    is_synthetic: false,
                    fallback_reason: None,
                    values: vec![Some(6.0), Some(5.0), Some(4.0), Some(3.0), Some(2.0), Some(1.0)],
                },
            ],
        }
    }

    #[test]
    fn output_is_deterministic_and_marks_provenance() {
        let a = render_ascii_chart(&table(), 40, 12);
        let b = render_ascii_chart(&table(), 40, 12);
        assert_eq!(a, b);
        assert!(a.contains("o = Testland — CPI (synthetic)"));
        assert!(a.contains("x = Zedland — CPI\n"));
        assert!(a.contains('o'));
        assert!(a.contains('x'));
    }

    #[test]
    fn empty_table_renders_placeholder() {
        let empty = ComparisonTable {
            dates: vec![],
            columns: vec![],
        };
        assert_eq!(render_ascii_chart(&empty, 40, 10), "(no data to plot)\n");
    }
}
