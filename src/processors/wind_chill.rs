use crate::models::{ObservationSeries, Reading, Variable};
use crate::processors::qa_flagger::{QaFlagger, QaSummary};
use tracing::{debug, info};

/// Wind chill in C from air temperature (C) and wind speed (m/s).
///
/// CHIL = 13.12 + 0.6215 T - 11.37 (3.6 W)^0.16 + 0.3965 T (3.6 W)^0.16
///
/// The fractional power has no real value for a negative base, so a negative
/// wind speed yields `None` rather than a number.
pub fn wind_chill(air_temperature: f64, wind_speed: f64) -> Option<f64> {
    let speed_kmh = 3.6 * wind_speed;
    if !speed_kmh.is_finite() || speed_kmh < 0.0 || !air_temperature.is_finite() {
        return None;
    }

    let factor = speed_kmh.powf(0.16);
    Some(13.12 + 0.6215 * air_temperature - 11.37 * factor + 0.3965 * air_temperature * factor)
}

/// Derives the CHIL column and QA-flags it.
pub struct WindChillCalculator;

impl WindChillCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Computes CHIL for every row; returns how many rows got a value.
    /// Any absent or QA-failed input leaves CHIL absent.
    pub fn derive(&self, series: &mut ObservationSeries) -> usize {
        series.add_column(Variable::WindChill);

        let mut computed = 0;
        let mut rejected = 0;
        for row in series.rows_mut() {
            let reading = match (
                row.get(Variable::AirTemperature),
                row.get(Variable::WindSpeed),
            ) {
                (Reading::Present(t), Reading::Present(w)) => match wind_chill(t, w) {
                    Some(chill) => {
                        computed += 1;
                        Reading::Present(chill)
                    }
                    None => {
                        rejected += 1;
                        Reading::Absent
                    }
                },
                _ => Reading::Absent,
            };
            row.set(Variable::WindChill, reading);
        }

        if rejected > 0 {
            debug!("{} rows with negative wind speed left without wind chill", rejected);
        }
        info!("Derived wind chill for {} of {} rows", computed, series.len());

        computed
    }

    /// Derive, then apply the CHIL QA rule if one is configured.
    pub fn derive_and_flag(&self, series: &mut ObservationSeries, flagger: &QaFlagger) -> QaSummary {
        self.derive(series);
        flagger.apply_variable(series, Variable::WindChill)
    }
}

impl Default for WindChillCalculator {
    fn default() -> Self {
        Self::new()
    }
}
