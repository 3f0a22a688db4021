use super::annuity::{future_value_annuity_due, required_emi};
use super::types::{DebtTrap, LoanTerms};

/// Annual return the EMI could have earned if invested instead.
pub const OPPORTUNITY_RATE_PCT: f64 = 12.0;

pub fn debt_trap(terms: LoanTerms) -> DebtTrap {
    let tenure = terms.tenure_years;
    let loan_amount = terms.loan_amount();
    let emi = required_emi(loan_amount, terms.annual_rate_pct, tenure);
    let months = terms.tenure_years as f64 * 12.0;
    let instalments = emi * months;

    DebtTrap {
        loan_amount,
        emi,
        total_paid: instalments + terms.down_payment,
        total_interest: instalments - loan_amount,
        opportunity_cost_fv: future_value_annuity_due(emi, tenure, OPPORTUNITY_RATE_PCT),
    }
}
