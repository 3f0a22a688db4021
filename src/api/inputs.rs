use clap::{Args, ValueEnum};
use serde::Deserialize;
use thiserror::Error;

use crate::core::{DEFAULT_TRIALS, FinancialProfile, LoanTerms, MarketRiskProfile, SimulationConfig};

/// Upper bound on trials accepted from callers, to keep a single request cheap.
pub const MAX_TRIALS: u32 = 100_000;
pub const MAX_AGE: u32 = 120;
pub const MAX_YEARS: u32 = 100;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{flag} must be {rule}")]
    OutOfRange {
        flag: &'static str,
        rule: &'static str,
    },
    #[error("Invalid API JSON payload: {0}")]
    Payload(String),
}

fn reject(flag: &'static str, rule: &'static str) -> InputError {
    InputError::OutOfRange { flag, rule }
}

fn check_age(flag: &'static str, age: u32) -> Result<(), InputError> {
    if age > MAX_AGE {
        return Err(reject(flag, "<= 120"));
    }
    Ok(())
}

fn check_years(flag: &'static str, years: u32) -> Result<(), InputError> {
    if years == 0 || years > MAX_YEARS {
        return Err(reject(flag, "between 1 and 100"));
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliRiskProfile {
    Conservative,
    Balanced,
    Aggressive,
}

impl From<CliRiskProfile> for MarketRiskProfile {
    fn from(value: CliRiskProfile) -> Self {
        match value {
            CliRiskProfile::Conservative => MarketRiskProfile::Conservative,
            CliRiskProfile::Balanced => MarketRiskProfile::Balanced,
            CliRiskProfile::Aggressive => MarketRiskProfile::Aggressive,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApiRiskProfile {
    #[serde(alias = "low")]
    Conservative,
    #[serde(alias = "medium")]
    Balanced,
    #[serde(alias = "high")]
    Aggressive,
}

impl From<ApiRiskProfile> for CliRiskProfile {
    fn from(value: ApiRiskProfile) -> Self {
        match value {
            ApiRiskProfile::Conservative => CliRiskProfile::Conservative,
            ApiRiskProfile::Balanced => CliRiskProfile::Balanced,
            ApiRiskProfile::Aggressive => CliRiskProfile::Aggressive,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DelayArgs {
    #[arg(long, default_value_t = 50_000_000.0, help = "Target wealth at retirement")]
    pub target_corpus: f64,
    #[arg(long, default_value_t = 30)]
    pub current_age: u32,
    #[arg(
        long,
        default_value_t = 22,
        help = "Age investing would ideally have started, e.g. first job"
    )]
    pub start_age: u32,
    #[arg(long, default_value_t = 60)]
    pub retire_age: u32,
    #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent")]
    pub expected_return: f64,
}

impl Default for DelayArgs {
    fn default() -> Self {
        Self {
            target_corpus: 50_000_000.0,
            current_age: 30,
            start_age: 22,
            retire_age: 60,
            expected_return: 12.0,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DebtArgs {
    #[arg(long, default_value_t = 1_500_000.0, help = "Price of the financed purchase")]
    pub price: f64,
    #[arg(long, default_value_t = 200_000.0)]
    pub down_payment: f64,
    #[arg(long, default_value_t = 9.5, help = "Annual loan interest in percent")]
    pub rate: f64,
    #[arg(long, default_value_t = 5)]
    pub tenure_years: u32,
}

impl Default for DebtArgs {
    fn default() -> Self {
        Self {
            price: 1_500_000.0,
            down_payment: 200_000.0,
            rate: 9.5,
            tenure_years: 5,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct IllusionArgs {
    #[arg(long, default_value_t = 25_000.0, help = "Monthly investment")]
    pub sip: f64,
    #[arg(long, default_value_t = 20)]
    pub years: u32,
    #[arg(long, default_value_t = 12.0, help = "Expected annual return in percent")]
    pub expected_return: f64,
    #[arg(long, default_value_t = 6.0, help = "Annual inflation in percent")]
    pub inflation: f64,
}

impl Default for IllusionArgs {
    fn default() -> Self {
        Self {
            sip: 25_000.0,
            years: 20,
            expected_return: 12.0,
            inflation: 6.0,
        }
    }
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct RentVsBuyArgs {
    #[arg(long, default_value_t = 10_000_000.0)]
    pub home_price: f64,
    #[arg(long, default_value_t = 25_000.0)]
    pub monthly_rent: f64,
    #[arg(long, default_value_t = 20)]
    pub tenure_years: u32,
    #[arg(
        long,
        default_value_t = 6.0,
        help = "Expected annual property/land appreciation in percent"
    )]
    pub home_appreciation: f64,
    #[arg(long, value_enum, default_value_t = CliRiskProfile::Balanced)]
    pub risk_profile: CliRiskProfile,
    #[arg(
        long,
        help = "Expected annual market return in percent, overrides the risk profile"
    )]
    pub market_return: Option<f64>,
    #[arg(
        long,
        help = "Annual market return volatility in percent, overrides the risk profile"
    )]
    pub market_volatility: Option<f64>,
    #[arg(long, default_value_t = DEFAULT_TRIALS)]
    pub trials: u32,
    #[arg(long, help = "Seed for reproducible runs; random when omitted")]
    pub seed: Option<u64>,
}

impl Default for RentVsBuyArgs {
    fn default() -> Self {
        Self {
            home_price: 10_000_000.0,
            monthly_rent: 25_000.0,
            tenure_years: 20,
            home_appreciation: 6.0,
            risk_profile: CliRiskProfile::Balanced,
            market_return: None,
            market_volatility: None,
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DelayPayload {
    target_corpus: Option<f64>,
    current_age: Option<u32>,
    start_age: Option<u32>,
    retire_age: Option<u32>,
    expected_return: Option<f64>,
}

impl From<DelayPayload> for DelayArgs {
    fn from(payload: DelayPayload) -> Self {
        let defaults = DelayArgs::default();
        Self {
            target_corpus: payload.target_corpus.unwrap_or(defaults.target_corpus),
            current_age: payload.current_age.unwrap_or(defaults.current_age),
            start_age: payload.start_age.unwrap_or(defaults.start_age),
            retire_age: payload.retire_age.unwrap_or(defaults.retire_age),
            expected_return: payload.expected_return.unwrap_or(defaults.expected_return),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DebtPayload {
    price: Option<f64>,
    down_payment: Option<f64>,
    rate: Option<f64>,
    tenure_years: Option<u32>,
}

impl From<DebtPayload> for DebtArgs {
    fn from(payload: DebtPayload) -> Self {
        let defaults = DebtArgs::default();
        Self {
            price: payload.price.unwrap_or(defaults.price),
            down_payment: payload.down_payment.unwrap_or(defaults.down_payment),
            rate: payload.rate.unwrap_or(defaults.rate),
            tenure_years: payload.tenure_years.unwrap_or(defaults.tenure_years),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IllusionPayload {
    sip: Option<f64>,
    years: Option<u32>,
    expected_return: Option<f64>,
    inflation: Option<f64>,
}

impl From<IllusionPayload> for IllusionArgs {
    fn from(payload: IllusionPayload) -> Self {
        let defaults = IllusionArgs::default();
        Self {
            sip: payload.sip.unwrap_or(defaults.sip),
            years: payload.years.unwrap_or(defaults.years),
            expected_return: payload.expected_return.unwrap_or(defaults.expected_return),
            inflation: payload.inflation.unwrap_or(defaults.inflation),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RentVsBuyPayload {
    home_price: Option<f64>,
    monthly_rent: Option<f64>,
    tenure_years: Option<u32>,
    home_appreciation: Option<f64>,
    risk_profile: Option<ApiRiskProfile>,
    market_return: Option<f64>,
    market_volatility: Option<f64>,
    trials: Option<u32>,
    seed: Option<u64>,
}

impl From<RentVsBuyPayload> for RentVsBuyArgs {
    fn from(payload: RentVsBuyPayload) -> Self {
        let defaults = RentVsBuyArgs::default();
        Self {
            home_price: payload.home_price.unwrap_or(defaults.home_price),
            monthly_rent: payload.monthly_rent.unwrap_or(defaults.monthly_rent),
            tenure_years: payload.tenure_years.unwrap_or(defaults.tenure_years),
            home_appreciation: payload
                .home_appreciation
                .unwrap_or(defaults.home_appreciation),
            risk_profile: payload
                .risk_profile
                .map(Into::into)
                .unwrap_or(defaults.risk_profile),
            market_return: payload.market_return,
            market_volatility: payload.market_volatility,
            trials: payload.trials.unwrap_or(defaults.trials),
            seed: payload.seed,
        }
    }
}

pub fn build_profile(args: &DelayArgs) -> Result<FinancialProfile, InputError> {
    if !args.target_corpus.is_finite() || args.target_corpus <= 0.0 {
        return Err(reject("--target-corpus", "> 0"));
    }
    check_age("--current-age", args.current_age)?;
    check_age("--start-age", args.start_age)?;
    check_age("--retire-age", args.retire_age)?;
    if args.retire_age <= args.current_age {
        return Err(reject("--retire-age", "> --current-age"));
    }
    if args.retire_age <= args.start_age {
        return Err(reject("--retire-age", "> --start-age"));
    }
    if !args.expected_return.is_finite() || args.expected_return <= 0.0 {
        return Err(reject("--expected-return", "> 0"));
    }

    Ok(FinancialProfile {
        target_corpus: args.target_corpus,
        current_age: args.current_age,
        start_age: args.start_age,
        retire_age: args.retire_age,
        expected_return_pct: args.expected_return,
    })
}

pub fn build_loan_terms(args: &DebtArgs) -> Result<LoanTerms, InputError> {
    if !args.price.is_finite() || args.price <= 0.0 {
        return Err(reject("--price", "> 0"));
    }
    if !args.down_payment.is_finite() || args.down_payment < 0.0 {
        return Err(reject("--down-payment", ">= 0"));
    }
    if args.down_payment > args.price {
        return Err(reject("--down-payment", "<= --price"));
    }
    if !args.rate.is_finite() || args.rate < 0.0 {
        return Err(reject("--rate", ">= 0"));
    }
    check_years("--tenure-years", args.tenure_years)?;

    Ok(LoanTerms {
        principal: args.price,
        down_payment: args.down_payment,
        annual_rate_pct: args.rate,
        tenure_years: args.tenure_years,
    })
}

/// Validated inputs for the wealth illusion engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IllusionInputs {
    pub payment: f64,
    pub years: u32,
    pub return_pct: f64,
    pub inflation_pct: f64,
}

pub fn build_illusion_inputs(args: &IllusionArgs) -> Result<IllusionInputs, InputError> {
    if !args.sip.is_finite() || args.sip < 0.0 {
        return Err(reject("--sip", ">= 0"));
    }
    check_years("--years", args.years)?;
    if !args.expected_return.is_finite() || args.expected_return < 0.0 {
        return Err(reject("--expected-return", ">= 0"));
    }
    if !args.inflation.is_finite() || args.inflation <= -100.0 {
        return Err(reject("--inflation", "> -100"));
    }

    Ok(IllusionInputs {
        payment: args.sip,
        years: args.years,
        return_pct: args.expected_return,
        inflation_pct: args.inflation,
    })
}

pub fn build_simulation_config(args: &RentVsBuyArgs) -> Result<SimulationConfig, InputError> {
    if !args.home_price.is_finite() || args.home_price <= 0.0 {
        return Err(reject("--home-price", "> 0"));
    }
    if !args.monthly_rent.is_finite() || args.monthly_rent < 0.0 {
        return Err(reject("--monthly-rent", ">= 0"));
    }
    check_years("--tenure-years", args.tenure_years)?;
    if !args.home_appreciation.is_finite() || args.home_appreciation <= -100.0 {
        return Err(reject("--home-appreciation", "> -100"));
    }
    if args.trials == 0 || args.trials > MAX_TRIALS {
        return Err(reject("--trials", "between 1 and 100000"));
    }

    let (profile_mean, profile_vol) = MarketRiskProfile::from(args.risk_profile).return_params();
    let market_return_mean_pct = args.market_return.unwrap_or(profile_mean);
    let market_return_vol_pct = args.market_volatility.unwrap_or(profile_vol);

    if !market_return_mean_pct.is_finite() || market_return_mean_pct <= -100.0 {
        return Err(reject("--market-return", "> -100"));
    }
    if !market_return_vol_pct.is_finite() || market_return_vol_pct < 0.0 {
        return Err(reject("--market-volatility", ">= 0"));
    }

    Ok(SimulationConfig {
        home_price: args.home_price,
        monthly_rent_start: args.monthly_rent,
        tenure_years: args.tenure_years,
        market_return_mean_pct,
        market_return_vol_pct,
        home_appreciation_mean_pct: args.home_appreciation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn build_profile_accepts_defaults() {
        let profile = build_profile(&DelayArgs::default()).expect("defaults are valid");
        assert_eq!(profile.current_age, 30);
        assert_eq!(profile.start_age, 22);
        assert_approx(profile.target_corpus, 50_000_000.0);
    }

    #[test]
    fn build_profile_rejects_retirement_before_current_age() {
        let args = DelayArgs {
            retire_age: 30,
            ..DelayArgs::default()
        };
        let err = build_profile(&args).expect_err("must reject retire <= current");
        assert!(err.to_string().contains("--retire-age must be > --current-age"));
    }

    #[test]
    fn build_profile_rejects_zero_return() {
        let args = DelayArgs {
            expected_return: 0.0,
            ..DelayArgs::default()
        };
        let err = build_profile(&args).expect_err("must reject zero return");
        assert!(err.to_string().contains("--expected-return"));
    }

    #[test]
    fn build_loan_terms_rejects_down_payment_above_price() {
        let args = DebtArgs {
            down_payment: 2_000_000.0,
            ..DebtArgs::default()
        };
        let err = build_loan_terms(&args).expect_err("must reject down > price");
        assert_eq!(
            err,
            InputError::OutOfRange {
                flag: "--down-payment",
                rule: "<= --price"
            }
        );
    }

    #[test]
    fn build_loan_terms_rejects_zero_tenure() {
        let args = DebtArgs {
            tenure_years: 0,
            ..DebtArgs::default()
        };
        assert!(build_loan_terms(&args).is_err());
    }

    #[test]
    fn build_profile_rejects_ages_beyond_lifespan() {
        for args in [
            DelayArgs {
                retire_age: 3_000_000_000,
                ..DelayArgs::default()
            },
            DelayArgs {
                retire_age: 200_000_000,
                ..DelayArgs::default()
            },
            DelayArgs {
                current_age: 121,
                retire_age: 120,
                ..DelayArgs::default()
            },
            DelayArgs {
                start_age: 500,
                ..DelayArgs::default()
            },
        ] {
            let err = build_profile(&args).expect_err("must reject age above 120");
            assert!(err.to_string().contains("must be <= 120"), "{err}");
        }

        let args = DelayArgs {
            retire_age: MAX_AGE,
            ..DelayArgs::default()
        };
        assert!(build_profile(&args).is_ok());
    }

    #[test]
    fn build_loan_terms_rejects_century_long_tenure() {
        let args = DebtArgs {
            tenure_years: MAX_YEARS + 1,
            ..DebtArgs::default()
        };
        assert_eq!(
            build_loan_terms(&args).expect_err("must reject long tenure"),
            InputError::OutOfRange {
                flag: "--tenure-years",
                rule: "between 1 and 100"
            }
        );
    }

    #[test]
    fn build_illusion_inputs_rejects_excessive_years() {
        let args = IllusionArgs {
            years: 200_000_000,
            ..IllusionArgs::default()
        };
        let err = build_illusion_inputs(&args).expect_err("must reject huge horizon");
        assert!(err.to_string().contains("--years must be between 1 and 100"));
    }

    #[test]
    fn simulation_config_rejects_excessive_tenure() {
        let args = RentVsBuyArgs {
            tenure_years: 4_000_000_000,
            ..RentVsBuyArgs::default()
        };
        let err = build_simulation_config(&args).expect_err("must reject huge tenure");
        assert!(err.to_string().contains("--tenure-years"));

        let args = RentVsBuyArgs {
            tenure_years: MAX_YEARS,
            ..RentVsBuyArgs::default()
        };
        assert!(build_simulation_config(&args).is_ok());
    }

    #[test]
    fn build_illusion_inputs_rejects_zero_years() {
        let args = IllusionArgs {
            years: 0,
            ..IllusionArgs::default()
        };
        let err = build_illusion_inputs(&args).expect_err("must reject zero years");
        assert!(err.to_string().contains("--years"));
    }

    #[test]
    fn simulation_config_uses_risk_profile_params() {
        let args = RentVsBuyArgs {
            risk_profile: CliRiskProfile::Aggressive,
            ..RentVsBuyArgs::default()
        };
        let config = build_simulation_config(&args).expect("valid args");
        assert_approx(config.market_return_mean_pct, 15.0);
        assert_approx(config.market_return_vol_pct, 20.0);
    }

    #[test]
    fn explicit_market_params_override_risk_profile() {
        let args = RentVsBuyArgs {
            market_return: Some(9.0),
            market_volatility: Some(4.0),
            ..RentVsBuyArgs::default()
        };
        let config = build_simulation_config(&args).expect("valid args");
        assert_approx(config.market_return_mean_pct, 9.0);
        assert_approx(config.market_return_vol_pct, 4.0);
    }

    #[test]
    fn simulation_config_rejects_negative_volatility_and_bad_trials() {
        let args = RentVsBuyArgs {
            market_volatility: Some(-2.0),
            ..RentVsBuyArgs::default()
        };
        let err = build_simulation_config(&args).expect_err("must reject negative vol");
        assert!(err.to_string().contains("--market-volatility"));

        let args = RentVsBuyArgs {
            trials: 0,
            ..RentVsBuyArgs::default()
        };
        let err = build_simulation_config(&args).expect_err("must reject zero trials");
        assert!(err.to_string().contains("--trials"));
    }

    #[test]
    fn payload_overlays_defaults() {
        let payload: RentVsBuyPayload = serde_json::from_str(
            r#"{"homePrice": 8000000, "riskProfile": "conservative", "seed": 7}"#,
        )
        .expect("payload should parse");
        let args = RentVsBuyArgs::from(payload);
        assert_approx(args.home_price, 8_000_000.0);
        assert_approx(args.monthly_rent, 25_000.0);
        assert_eq!(args.risk_profile, CliRiskProfile::Conservative);
        assert_eq!(args.trials, DEFAULT_TRIALS);
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn risk_profile_accepts_aliases() {
        let payload: RentVsBuyPayload =
            serde_json::from_str(r#"{"riskProfile": "high"}"#).expect("payload should parse");
        assert_eq!(
            RentVsBuyArgs::from(payload).risk_profile,
            CliRiskProfile::Aggressive
        );
    }
}
