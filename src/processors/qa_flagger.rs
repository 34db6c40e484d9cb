use crate::models::{ObservationSeries, QaRules, Reading, Variable};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Counts from one QA pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QaSummary {
    pub checked: BTreeMap<Variable, usize>,
    pub flagged: BTreeMap<Variable, usize>,
}

impl QaSummary {
    pub fn total_flagged(&self) -> usize {
        self.flagged.values().sum()
    }

    pub fn flagged_for(&self, variable: Variable) -> usize {
        self.flagged.get(&variable).copied().unwrap_or(0)
    }

    pub fn merge(&mut self, other: QaSummary) {
        for (variable, count) in other.checked {
            *self.checked.entry(variable).or_default() += count;
        }
        for (variable, count) in other.flagged {
            *self.flagged.entry(variable).or_default() += count;
        }
    }

    /// Generate a summary report
    pub fn generate_summary(&self) -> String {
        let mut summary = String::new();

        summary.push_str("=== QA Report ===\n");
        summary.push_str(&format!("Total QA-failed values: {}\n", self.total_flagged()));

        for (variable, checked) in &self.checked {
            let flagged = self.flagged_for(*variable);
            let percentage = if *checked > 0 {
                100.0 * flagged as f64 / *checked as f64
            } else {
                0.0
            };
            summary.push_str(&format!(
                "  {:<4} {:>6} of {:>6} values flagged ({:.1}%)\n",
                variable.code(),
                flagged,
                checked,
                percentage
            ));
        }

        summary
    }
}

/// Applies admissible-range rules, turning out-of-range values into `QaFailed`.
pub struct QaFlagger {
    rules: QaRules,
}

impl QaFlagger {
    pub fn new(rules: QaRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &QaRules {
        &self.rules
    }

    /// Flag every ruled variable that the series carries. Re-running is a no-op.
    pub fn apply(&self, series: &mut ObservationSeries) -> QaSummary {
        let variables: Vec<Variable> = self
            .rules
            .iter()
            .map(|(variable, _)| *variable)
            .filter(|variable| series.has_column(*variable))
            .collect();

        let mut summary = QaSummary::default();
        for variable in variables {
            summary.merge(self.apply_variable(series, variable));
        }

        info!("QA flagged {} values", summary.total_flagged());
        summary
    }

    /// Flag one column. Absent cells stay absent; variables without a rule pass through.
    pub fn apply_variable(&self, series: &mut ObservationSeries, variable: Variable) -> QaSummary {
        let mut summary = QaSummary::default();
        let Some(rule) = self.rules.get(variable).copied() else {
            return summary;
        };

        let mut checked = 0;
        let mut flagged = 0;
        for row in series.rows_mut() {
            if let Reading::Present(value) = row.get(variable) {
                checked += 1;
                if !rule.admits(value) {
                    row.set(variable, Reading::QaFailed);
                    flagged += 1;
                }
            }
        }

        debug!(
            "{}: {} of {} values outside [{}, {}]",
            variable, flagged, checked, rule.low_limit, rule.high_limit
        );

        summary.checked.insert(variable, checked);
        summary.flagged.insert(variable, flagged);
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ObservationRow, QaRule};
    use chrono::{NaiveDate, NaiveDateTime};

    fn ts(m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 2, 1)
            .unwrap()
            .and_hms_opt(0, m, 0)
            .unwrap()
    }

    fn series_with(variable: Variable, readings: &[Reading]) -> ObservationSeries {
        let rows = readings
            .iter()
            .enumerate()
            .map(|(i, reading)| {
                let mut row = ObservationRow::absent(ts(i as u32 * 5));
                row.set(variable, *reading);
                row.raw_backed = reading.is_present();
                row
            })
            .collect();
        ObservationSeries::new(rows)
    }

    fn flagger() -> QaFlagger {
        QaFlagger::new(
            QaRules::new().with_rule(Variable::AirTemperature, QaRule::new(0.0, 40.0).unwrap()),
        )
    }

    #[test]
    fn test_out_of_range_flagged_boundaries_kept() {
        let mut series = series_with(
            Variable::AirTemperature,
            &[
                Reading::Present(-0.5),
                Reading::Present(0.0),
                Reading::Present(40.0),
                Reading::Present(40.5),
                Reading::Absent,
            ],
        );

        let summary = flagger().apply(&mut series);

        let readings: Vec<_> = series
            .rows()
            .iter()
            .map(|r| r.get(Variable::AirTemperature))
            .collect();
        assert_eq!(
            readings,
            vec![
                Reading::QaFailed,
                Reading::Present(0.0),
                Reading::Present(40.0),
                Reading::QaFailed,
                Reading::Absent,
            ]
        );
        assert_eq!(summary.flagged_for(Variable::AirTemperature), 2);
        assert_eq!(summary.checked[&Variable::AirTemperature], 4);
    }

    #[test]
    fn test_flagging_is_idempotent() {
        let mut series = series_with(
            Variable::AirTemperature,
            &[Reading::Present(55.0), Reading::Present(20.0), Reading::Absent],
        );

        let flagger = flagger();
        flagger.apply(&mut series);
        let once = series.clone();
        let second = flagger.apply(&mut series);

        assert_eq!(series, once);
        assert_eq!(second.total_flagged(), 0);
    }

    #[test]
    fn test_unruled_variable_passes_through() {
        let mut series = series_with(Variable::Rainfall, &[Reading::Present(999.0)]);
        let before = series.clone();

        let summary = flagger().apply(&mut series);

        assert_eq!(series, before);
        assert_eq!(summary.flagged_for(Variable::Rainfall), 0);
    }

    #[test]
    fn test_rule_for_missing_column_skipped() {
        let flagger = QaFlagger::new(
            QaRules::new().with_rule(Variable::WindChill, QaRule::new(-60.0, 50.0).unwrap()),
        );
        let mut series = series_with(Variable::AirTemperature, &[Reading::Present(1.0)]);

        let summary = flagger.apply(&mut series);
        assert!(summary.checked.is_empty());
    }

    #[test]
    fn test_summary_text() {
        let mut series = series_with(
            Variable::AirTemperature,
            &[Reading::Present(-1.0), Reading::Present(1.0)],
        );
        let summary = flagger().apply(&mut series);
        let text = summary.generate_summary();

        assert!(text.contains("Total QA-failed values: 1"));
        assert!(text.contains("TAIR"));
        assert!(text.contains("(50.0%)"));
    }
}
