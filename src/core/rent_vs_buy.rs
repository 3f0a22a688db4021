use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, NormalError};
use thiserror::Error;

use super::annuity::{exponent, required_emi};
use super::types::{SimulationConfig, SimulationDraw, SimulationResult};

pub const DEFAULT_TRIALS: u32 = 500;

pub const MORTGAGE_RATE_PCT: f64 = 8.5;
const DOWN_PAYMENT_SHARE: f64 = 0.20;
const UPFRONT_COST_SHARE: f64 = 0.06;
const ANNUAL_MAINTENANCE_SHARE: f64 = 0.005;
const MAINTENANCE_GROWTH: f64 = 0.05;

const HOME_APPRECIATION_VOL_PCT: f64 = 1.0;
const RENT_INFLATION_MEAN_PCT: f64 = 6.0;
const RENT_INFLATION_VOL_PCT: f64 = 1.0;

// Keeps (1 + rate) strictly positive for every sampled rate.
const RATE_FLOOR: f64 = -0.95;
const RATE_CEILING: f64 = 2.5;

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid {name} distribution (mean={mean}, std_dev={std_dev}): {source}")]
    InvalidDistribution {
        name: &'static str,
        mean: f64,
        std_dev: f64,
        #[source]
        source: NormalError,
    },
}

fn normal(name: &'static str, mean: f64, std_dev: f64) -> Result<Normal<f64>, SimulationError> {
    Normal::new(mean, std_dev).map_err(|source| SimulationError::InvalidDistribution {
        name,
        mean,
        std_dev,
        source,
    })
}

struct DrawSampler {
    market_return: Normal<f64>,
    home_appreciation: Normal<f64>,
    rent_inflation: Normal<f64>,
}

impl DrawSampler {
    fn new(config: &SimulationConfig) -> Result<Self, SimulationError> {
        Ok(Self {
            market_return: normal(
                "market return",
                config.market_return_mean_pct,
                config.market_return_vol_pct,
            )?,
            home_appreciation: normal(
                "home appreciation",
                config.home_appreciation_mean_pct,
                HOME_APPRECIATION_VOL_PCT,
            )?,
            rent_inflation: normal(
                "rent inflation",
                RENT_INFLATION_MEAN_PCT,
                RENT_INFLATION_VOL_PCT,
            )?,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SimulationDraw {
        let as_rate = |pct: f64| (pct / 100.0).clamp(RATE_FLOOR, RATE_CEILING);
        SimulationDraw {
            market_return: as_rate(self.market_return.sample(rng)),
            home_appreciation: as_rate(self.home_appreciation.sample(rng)),
            rent_inflation: as_rate(self.rent_inflation.sample(rng)),
        }
    }
}

/// Quantities shared by every trial of a run.
#[derive(Debug, Clone, Copy)]
struct PurchaseSetup {
    initial_investable: f64,
    emi: f64,
    monthly_maintenance: f64,
}

impl PurchaseSetup {
    fn new(config: &SimulationConfig) -> Self {
        let down_payment = config.home_price * DOWN_PAYMENT_SHARE;
        let loan_amount = config.home_price - down_payment;
        let upfront_costs = config.home_price * UPFRONT_COST_SHARE;
        Self {
            initial_investable: down_payment + upfront_costs,
            emi: required_emi(loan_amount, MORTGAGE_RATE_PCT, config.tenure_years),
            monthly_maintenance: config.home_price * ANNUAL_MAINTENANCE_SHARE / 12.0,
        }
    }
}

fn buy_outcome(config: &SimulationConfig, draw: &SimulationDraw) -> f64 {
    config.home_price * (1.0 + draw.home_appreciation).powi(exponent(config.tenure_years))
}

/// The renter invests what the buyer spends up front, then each year invests
/// the difference between the buyer's outgoings (EMI + maintenance) and rent.
fn rent_outcome(config: &SimulationConfig, setup: &PurchaseSetup, draw: &SimulationDraw) -> f64 {
    let mut portfolio = setup.initial_investable;
    let mut rent = config.monthly_rent_start;
    let mut maintenance = setup.monthly_maintenance;

    for _ in 0..config.tenure_years {
        let buyer_outgoings = setup.emi * 12.0 + maintenance * 12.0;
        let surplus = buyer_outgoings - rent * 12.0;
        portfolio = portfolio * (1.0 + draw.market_return) + surplus;

        rent *= 1.0 + draw.rent_inflation;
        maintenance *= 1.0 + MAINTENANCE_GROWTH;
    }
    portfolio
}

pub fn run_rent_vs_buy<R: Rng + ?Sized>(
    config: SimulationConfig,
    trials: u32,
    rng: &mut R,
) -> Result<SimulationResult, SimulationError> {
    let sampler = DrawSampler::new(&config)?;
    let setup = PurchaseSetup::new(&config);

    let mut buy_total = 0.0;
    let mut rent_total = 0.0;
    let mut rent_win_count = 0_u32;

    for _ in 0..trials {
        let draw = sampler.sample(rng);
        let buy = buy_outcome(&config, &draw);
        let rent = rent_outcome(&config, &setup, &draw);
        buy_total += buy;
        rent_total += rent;
        if rent > buy {
            rent_win_count += 1;
        }
    }

    let mean = |total: f64| {
        if trials == 0 {
            0.0
        } else {
            total / trials as f64
        }
    };
    let result = SimulationResult {
        mean_buy_value: mean(buy_total),
        mean_rent_value: mean(rent_total),
        rent_win_count,
        trial_count: trials,
    };

    tracing::debug!(
        trials,
        emi = setup.emi,
        mean_buy = result.mean_buy_value,
        mean_rent = result.mean_rent_value,
        rent_wins = result.rent_win_count,
        "rent vs buy simulation finished"
    );
    Ok(result)
}

pub fn run_rent_vs_buy_seeded(
    config: SimulationConfig,
    trials: u32,
    seed: u64,
) -> Result<SimulationResult, SimulationError> {
    let mut rng = StdRng::seed_from_u64(seed);
    run_rent_vs_buy(config, trials, &mut rng)
}
