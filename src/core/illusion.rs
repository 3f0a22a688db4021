use super::annuity::{exponent, future_value_annuity_due};
use super::tax::long_term_capital_gains_tax;
use super::types::WealthIllusion;

/// Splits the future value of a monthly investment into what the statement
/// shows and what it is worth after LTCG and inflation.
pub fn wealth_illusion(
    payment: f64,
    years: u32,
    return_pct: f64,
    inflation_pct: f64,
) -> WealthIllusion {
    let invested = payment * years as f64 * 12.0;
    let fv_nominal = future_value_annuity_due(payment, years, return_pct);
    let tax = long_term_capital_gains_tax(fv_nominal, invested);
    let fv_post_tax = fv_nominal - tax;
    let fv_real = fv_post_tax / (1.0 + inflation_pct / 100.0).powi(exponent(years));
    let erosion_pct = if fv_nominal == 0.0 {
        0.0
    } else {
        (1.0 - fv_real / fv_nominal) * 100.0
    };

    WealthIllusion {
        invested,
        fv_nominal,
        tax,
        fv_post_tax,
        fv_real,
        erosion_pct,
    }
}
