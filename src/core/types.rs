use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialProfile {
    pub target_corpus: f64,
    pub current_age: u32,
    pub start_age: u32,
    pub retire_age: u32,
    pub expected_return_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTerms {
    /// Sticker price of the financed purchase.
    pub principal: f64,
    pub down_payment: f64,
    pub annual_rate_pct: f64,
    pub tenure_years: u32,
}

impl LoanTerms {
    pub fn loan_amount(&self) -> f64 {
        self.principal - self.down_payment
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationConfig {
    pub home_price: f64,
    pub monthly_rent_start: f64,
    pub tenure_years: u32,
    pub market_return_mean_pct: f64,
    pub market_return_vol_pct: f64,
    pub home_appreciation_mean_pct: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MarketRiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

impl MarketRiskProfile {
    /// Annual (mean, volatility) of market returns in percent.
    pub fn return_params(self) -> (f64, f64) {
        match self {
            MarketRiskProfile::Conservative => (10.0, 10.0),
            MarketRiskProfile::Balanced => (12.0, 15.0),
            MarketRiskProfile::Aggressive => (15.0, 20.0),
        }
    }
}

/// Rates sampled for a single trial, as fractions (0.12 is 12%).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationDraw {
    pub market_return: f64,
    pub home_appreciation: f64,
    pub rent_inflation: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Rent,
    Buy,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    pub mean_buy_value: f64,
    pub mean_rent_value: f64,
    pub rent_win_count: u32,
    pub trial_count: u32,
}

/// Rent win probability above which renting is the recommended strategy.
pub const RENT_VERDICT_THRESHOLD_PCT: f64 = 60.0;

impl SimulationResult {
    pub fn rent_win_probability_pct(&self) -> f64 {
        if self.trial_count == 0 {
            return 0.0;
        }
        self.rent_win_count as f64 / self.trial_count as f64 * 100.0
    }

    pub fn rent_advantage(&self) -> f64 {
        self.mean_rent_value - self.mean_buy_value
    }

    pub fn verdict(&self) -> Strategy {
        if self.rent_win_probability_pct() > RENT_VERDICT_THRESHOLD_PCT {
            Strategy::Rent
        } else {
            Strategy::Buy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtTrap {
    pub loan_amount: f64,
    pub emi: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub opportunity_cost_fv: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthIllusion {
    pub invested: f64,
    pub fv_nominal: f64,
    pub tax: f64,
    pub fv_post_tax: f64,
    pub fv_real: f64,
    pub erosion_pct: f64,
}
