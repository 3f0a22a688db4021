/// Gains up to this amount are exempt from long-term capital gains tax.
pub const LTCG_EXEMPTION: f64 = 125_000.0;
pub const LTCG_RATE: f64 = 0.125;

/// Tax due on redeeming `corpus` that was built from `invested` contributions.
/// A loss is always below the exemption, so it is never taxed.
pub fn long_term_capital_gains_tax(corpus: f64, invested: f64) -> f64 {
    let gains = corpus - invested;
    if gains < LTCG_EXEMPTION {
        return 0.0;
    }
    (gains - LTCG_EXEMPTION) * LTCG_RATE
}
