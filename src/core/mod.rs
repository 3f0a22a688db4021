mod annuity;
mod debt;
mod delay;
mod illusion;
mod rent_vs_buy;
mod tax;
mod types;

pub use annuity::{
    Amortization, AmortizationRow, amortization_schedule, future_value_annuity_due,
    required_emi, required_payment,
};
pub use debt::{OPPORTUNITY_RATE_PCT, debt_trap};
pub use delay::{CURVE_HORIZON_AGE, CostOfDelay, DelayCurve, cost_of_delay};
pub use illusion::wealth_illusion;
pub use rent_vs_buy::{
    DEFAULT_TRIALS, MORTGAGE_RATE_PCT, SimulationError, run_rent_vs_buy, run_rent_vs_buy_seeded,
};
pub use tax::{LTCG_EXEMPTION, LTCG_RATE, long_term_capital_gains_tax};
pub use types::{
    DebtTrap, FinancialProfile, LoanTerms, MarketRiskProfile, RENT_VERDICT_THRESHOLD_PCT,
    SimulationConfig, SimulationDraw, SimulationResult, Strategy, WealthIllusion,
};
