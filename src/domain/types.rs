//! Shared domain types.
//!
//! These types are intentionally kept lightweight: every interaction builds
//! them from scratch (fetch → normalize → assemble) and discards them after
//! rendering. Nothing here is persisted.

use chrono::{DateTime, Months, NaiveDate, Utc};

/// One dated observation. `value: None` is an *explicit* missing value:
/// the normalizer keeps the date so downstream joins stay aligned instead
/// of silently dropping the row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// A normalized time series for one (country, indicator) pair.
///
/// Invariant: `points` is strictly date-ascending with no duplicate dates.
/// Both the normalizer and the synthetic generator uphold this on
/// construction; nothing mutates a `SeriesResult` afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResult {
    pub country_key: String,
    pub indicator_key: String,
    pub points: Vec<ObservationPoint>,
    /// Provenance flag: `false` means real provider data, `true` means the
    /// deterministic fallback generator produced this series.
    pub is_synthetic: bool,
    /// Human-readable reason the fallback was taken (credential missing,
    /// HTTP status, parse failure). `None` for real data.
    pub fallback_reason: Option<String>,
}

impl SeriesResult {
    /// The most recent non-missing observation.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.points
            .iter()
            .rev()
            .find_map(|p| p.value.map(|v| (p.date, v)))
    }

    /// Whether `points` satisfies the strictly-ascending / no-duplicate
    /// invariant. Construction paths are tested against this.
    pub fn is_strictly_sorted(&self) -> bool {
        self.points.windows(2).all(|w| w[0].date < w[1].date)
    }
}

/// Macro-theory framework tags for annotations. Fixed list, no validation
/// beyond membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TheoryTag {
    AdAs,
    IsLm,
    PhillipsCurve,
}

impl TheoryTag {
    pub const ALL: [TheoryTag; 3] = [TheoryTag::AdAs, TheoryTag::IsLm, TheoryTag::PhillipsCurve];

    pub fn display_name(self) -> &'static str {
        match self {
            TheoryTag::AdAs => "AD–AS",
            TheoryTag::IsLm => "IS–LM",
            TheoryTag::PhillipsCurve => "Phillips Curve",
        }
    }

    pub fn next(self) -> TheoryTag {
        match self {
            TheoryTag::AdAs => TheoryTag::IsLm,
            TheoryTag::IsLm => TheoryTag::PhillipsCurve,
            TheoryTag::PhillipsCurve => TheoryTag::AdAs,
        }
    }

    pub fn prev(self) -> TheoryTag {
        match self {
            TheoryTag::AdAs => TheoryTag::PhillipsCurve,
            TheoryTag::IsLm => TheoryTag::AdAs,
            TheoryTag::PhillipsCurve => TheoryTag::IsLm,
        }
    }
}

/// A free-text annotation with a theory tag. Held only in the current
/// session's UI state; there is no persistence path.
#[derive(Debug, Clone)]
pub struct Note {
    pub saved_at: DateTime<Utc>,
    pub tag: TheoryTag,
    pub text: String,
}

/// A dated policy or shock event (central bank move, fiscal change,
/// commodity shock) with a free-form tag. Session-only, like `Note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub date: NaiveDate,
    pub tag: String,
    pub text: String,
}

/// The user's current selection, shared by the CLI and the TUI.
#[derive(Debug, Clone)]
pub struct ViewConfig {
    /// Primary economy (country registry key).
    pub primary: String,
    /// Comparison economy for the Compare view.
    pub compare: String,
    /// Main indicator (indicator registry key).
    pub indicator: String,
    /// Second indicator for the Charts view.
    pub second_indicator: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Default chart window: the trailing ten years ending today.
pub fn default_range() -> (NaiveDate, NaiveDate) {
    let end = Utc::now().date_naive();
    let start = end
        .checked_sub_months(Months::new(120))
        .unwrap_or(NaiveDate::MIN);
    (start, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_skips_missing_tail() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let series = SeriesResult {
            country_key: "US".to_string(),
            indicator_key: "CPI".to_string(),
            points: vec![
                ObservationPoint { date: d(1), value: Some(1.0) },
                ObservationPoint { date: d(2), value: Some(2.0) },
                ObservationPoint { date: d(3), value: None },
            ],
            is_synthetic: false,
            fallback_reason: None,
        };
        assert_eq!(series.latest(), Some((d(2), 2.0)));
    }

    #[test]
    fn theory_tag_cycle_round_trips() {
        for tag in TheoryTag::ALL {
            assert_eq!(tag.next().prev(), tag);
        }
        // Cycling through all tags returns to the start.
        let mut tag = TheoryTag::AdAs;
        for _ in 0..TheoryTag::ALL.len() {
            tag = tag.next();
        }
        assert_eq!(tag, TheoryTag::AdAs);
    }

    #[test]
    fn sorted_invariant_rejects_duplicates() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let mut series = SeriesResult {
            country_key: "US".to_string(),
            indicator_key: "CPI".to_string(),
            points: vec![
                ObservationPoint { date: d(1), value: Some(1.0) },
                ObservationPoint { date: d(1), value: Some(2.0) },
            ],
            is_synthetic: false,
            fallback_reason: None,
        };
        assert!(!series.is_strictly_sorted());
        series.points.pop();
        assert!(series.is_strictly_sorted());
    }
}
