fn monthly_rate(annual_rate_pct: f64) -> f64 {
    annual_rate_pct / 1200.0
}

/// Integer exponent for `powi`, saturating instead of wrapping.
pub(crate) fn exponent(periods: u32) -> i32 {
    i32::try_from(periods).unwrap_or(i32::MAX)
}

fn months(years: u32) -> u32 {
    years.saturating_mul(12)
}

/// Growth factor of an annuity-due: the future value of paying 1 at the
/// start of each of `months` periods.
fn annuity_due_factor(monthly_rate: f64, months: u32) -> f64 {
    if monthly_rate == 0.0 {
        return months as f64;
    }
    ((1.0 + monthly_rate).powi(exponent(months)) - 1.0) / monthly_rate * (1.0 + monthly_rate)
}

/// Monthly contribution needed to accumulate `target_fv` after `years`,
/// contributing at the start of each month. An empty horizon needs no
/// contribution and yields 0.
pub fn required_payment(target_fv: f64, years: u32, annual_rate_pct: f64) -> f64 {
    if years == 0 {
        return 0.0;
    }
    target_fv / annuity_due_factor(monthly_rate(annual_rate_pct), months(years))
}

/// Future value of contributing `payment` at the start of every month for
/// `years`.
pub fn future_value_annuity_due(payment: f64, years: u32, annual_rate_pct: f64) -> f64 {
    if years == 0 {
        return 0.0;
    }
    payment * annuity_due_factor(monthly_rate(annual_rate_pct), months(years))
}

/// Equal monthly instalment that fully repays `principal` over
/// `tenure_years`. A zero tenure returns 0.
pub fn required_emi(principal: f64, annual_rate_pct: f64, tenure_years: u32) -> f64 {
    if tenure_years == 0 {
        return 0.0;
    }
    let r = monthly_rate(annual_rate_pct);
    let n = months(tenure_years);
    if r == 0.0 {
        return principal / n as f64;
    }
    let growth = (1.0 + r).powi(exponent(n));
    if growth.is_infinite() {
        return principal * r;
    }
    principal * r * growth / (growth - 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmortizationRow {
    pub month: u32,
    pub interest: f64,
    pub principal_repaid: f64,
    pub balance: f64,
}

/// Month-by-month repayment of a loan at its EMI.
#[derive(Debug, Clone)]
pub struct Amortization {
    balance: f64,
    emi: f64,
    rate: f64,
    month: u32,
    months: u32,
}

pub fn amortization_schedule(
    principal: f64,
    annual_rate_pct: f64,
    tenure_years: u32,
) -> Amortization {
    Amortization {
        balance: principal,
        emi: required_emi(principal, annual_rate_pct, tenure_years),
        rate: monthly_rate(annual_rate_pct),
        month: 0,
        months: months(tenure_years),
    }
}

impl Iterator for Amortization {
    type Item = AmortizationRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.month >= self.months {
            return None;
        }
        self.month += 1;
        let interest = self.balance * self.rate;
        let principal_repaid = self.emi - interest;
        self.balance -= principal_repaid;
        Some(AmortizationRow {
            month: self.month,
            interest,
            principal_repaid,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.months - self.month) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Amortization {}
