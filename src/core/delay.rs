use serde::{Serialize, Serializer};

use super::annuity::required_payment;
use super::types::FinancialProfile;

/// The curve always extends at least to this starting age.
pub const CURVE_HORIZON_AGE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostOfDelay {
    pub sip_ideal: f64,
    pub sip_real: f64,
    pub catch_up_tax: f64,
    pub catch_up_pct: f64,
    pub years_delayed: u32,
    pub curve: DelayCurve,
}

/// Required monthly contribution by the age investing starts. Each call to
/// [`DelayCurve::iter`] recomputes the points from scratch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayCurve {
    target_corpus: f64,
    retire_age: u32,
    expected_return_pct: f64,
    first_age: u32,
    end_age: u32,
}

impl DelayCurve {
    fn for_profile(profile: &FinancialProfile) -> Self {
        Self {
            target_corpus: profile.target_corpus,
            retire_age: profile.retire_age,
            expected_return_pct: profile.expected_return_pct,
            first_age: profile.start_age,
            end_age: CURVE_HORIZON_AGE.max(profile.current_age.saturating_add(1)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        (self.first_age..self.end_age).map(move |age| (age, self.payment_at(age)))
    }

    pub fn len(&self) -> usize {
        self.end_age.saturating_sub(self.first_age) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn payment_at(&self, age: u32) -> f64 {
        let years = self.retire_age.saturating_sub(age);
        required_payment(self.target_corpus, years, self.expected_return_pct)
    }
}

#[derive(Serialize)]
struct CurvePoint {
    age: u32,
    payment: f64,
}

impl Serialize for DelayCurve {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(|(age, payment)| CurvePoint { age, payment }))
    }
}

pub fn cost_of_delay(profile: FinancialProfile) -> CostOfDelay {
    let years_ideal = profile.retire_age.saturating_sub(profile.start_age);
    let years_real = profile.retire_age.saturating_sub(profile.current_age);

    let target = profile.target_corpus;
    let sip_ideal = required_payment(target, years_ideal, profile.expected_return_pct);
    let sip_real = required_payment(target, years_real, profile.expected_return_pct);

    let catch_up_tax = sip_real - sip_ideal;
    let catch_up_pct = if sip_ideal > 0.0 {
        catch_up_tax / sip_ideal * 100.0
    } else {
        0.0
    };

    tracing::debug!(sip_ideal, sip_real, catch_up_pct, "cost of delay computed");

    CostOfDelay {
        sip_ideal,
        sip_real,
        catch_up_tax,
        catch_up_pct,
        years_delayed: profile.current_age.saturating_sub(profile.start_age),
        curve: DelayCurve::for_profile(&profile),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn sample_profile() -> FinancialProfile {
        FinancialProfile {
            target_corpus: 50_000_000.0,
            current_age: 30,
            start_age: 22,
            retire_age: 60,
            expected_return_pct: 12.0,
        }
    }

    #[test]
    fn late_start_costs_more_each_month() {
        let delay = cost_of_delay(sample_profile());
        assert_approx_tol(delay.sip_ideal, 5_355.19, 0.01);
        assert_approx_tol(delay.sip_real, 14_164.65, 0.01);
        assert_approx_tol(delay.catch_up_tax, 8_809.46, 0.01);
        assert_approx_tol(delay.catch_up_pct, 164.50, 0.01);
        assert_eq!(delay.years_delayed, 8);
    }

    #[test]
    fn starting_now_has_no_catch_up() {
        let mut profile = sample_profile();
        profile.start_age = profile.current_age;
        let delay = cost_of_delay(profile);
        assert_eq!(delay.catch_up_tax, 0.0);
        assert_eq!(delay.catch_up_pct, 0.0);
        assert_eq!(delay.years_delayed, 0);
    }

    #[test]
    fn zero_ideal_sip_guards_percentage() {
        let mut profile = sample_profile();
        profile.start_age = 60;
        profile.current_age = 55;
        let delay = cost_of_delay(profile);
        assert_eq!(delay.sip_ideal, 0.0);
        assert_eq!(delay.catch_up_pct, 0.0);
    }

    #[test]
    fn curve_covers_start_through_horizon() {
        let delay = cost_of_delay(sample_profile());
        let points: Vec<_> = delay.curve.iter().collect();
        assert_eq!(points.len(), delay.curve.len());
        assert_eq!(points.first().map(|p| p.0), Some(22));
        assert_eq!(points.last().map(|p| p.0), Some(49));
        assert_approx_tol(points[0].1, delay.sip_ideal, 1e-9);
        assert_approx_tol(points[8].1, delay.sip_real, 1e-9);
        assert!(points.windows(2).all(|w| w[1].1 > w[0].1));
    }

    #[test]
    fn curve_extends_past_horizon_to_include_current_age() {
        let profile = FinancialProfile {
            target_corpus: 10_000_000.0,
            current_age: 58,
            start_age: 45,
            retire_age: 56,
            expected_return_pct: 10.0,
        };
        let delay = cost_of_delay(profile);
        let points: Vec<_> = delay.curve.iter().collect();
        assert_eq!(points.last().map(|p| p.0), Some(58));
        for (age, payment) in points {
            if age >= profile.retire_age {
                assert_eq!(payment, 0.0);
            } else {
                assert!(payment > 0.0);
            }
        }
    }

    #[test]
    fn curve_is_restartable() {
        let delay = cost_of_delay(sample_profile());
        let first: Vec<_> = delay.curve.iter().collect();
        let second: Vec<_> = delay.curve.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn curve_serializes_as_points() {
        let delay = cost_of_delay(sample_profile());
        let json = serde_json::to_value(delay).expect("delay should serialize");
        let curve = json["curve"].as_array().expect("curve is an array");
        assert_eq!(curve.len(), 28);
        assert_eq!(curve[0]["age"], 22);
        assert!(json.get("catchUpTax").is_some());
    }
}
