use super::types::{AllocationRange, Assumptions, BandRange, RiskTolerance};

/// Blended return used before any allocation has been computed.
pub const FALLBACK_EXPECTED_RETURN: f64 = 0.05;

const fn band(min: f64, max: f64) -> BandRange {
    BandRange { min, max }
}

/// Fixed range tables per risk category. Total over the enum; the boundary
/// layer maps unrecognized category strings to `High` before calling.
pub fn recommended_allocation(risk: RiskTolerance) -> AllocationRange {
    match risk {
        RiskTolerance::Low => AllocationRange {
            equities: band(20.0, 40.0),
            bonds: band(40.0, 60.0),
            cash: band(10.0, 20.0),
            reits: band(0.0, 10.0),
            crypto: band(0.0, 0.0),
        },
        RiskTolerance::Medium => AllocationRange {
            equities: band(40.0, 70.0),
            bonds: band(20.0, 40.0),
            cash: band(5.0, 15.0),
            reits: band(0.0, 15.0),
            crypto: band(0.0, 5.0),
        },
        RiskTolerance::MediumHigh => AllocationRange {
            equities: band(60.0, 80.0),
            bonds: band(10.0, 25.0),
            cash: band(5.0, 10.0),
            reits: band(0.0, 15.0),
            crypto: band(0.0, 10.0),
        },
        RiskTolerance::High => AllocationRange {
            equities: band(70.0, 90.0),
            bonds: band(0.0, 20.0),
            cash: band(5.0, 10.0),
            reits: band(0.0, 15.0),
            crypto: band(0.0, 15.0),
        },
    }
}

/// Linear blend of per-asset expected returns, weighted by the allocation
/// midpoints normalized to sum to one. A zero midpoint total is treated as
/// one so degenerate ranges still produce a finite rate.
pub fn weighted_expected_return(
    allocation: Option<&AllocationRange>,
    assumptions: &Assumptions,
) -> f64 {
    let Some(ranges) = allocation else {
        return FALLBACK_EXPECTED_RETURN;
    };

    let equities = ranges.equities.midpoint() / 100.0;
    let bonds = ranges.bonds.midpoint() / 100.0;
    let cash = ranges.cash.midpoint() / 100.0;
    let reits = ranges.reits.midpoint() / 100.0;
    let crypto = ranges.crypto.midpoint() / 100.0;

    let total = equities + bonds + cash + reits + crypto;
    let total = if total == 0.0 { 1.0 } else { total };

    let er = &assumptions.expected_returns;
    (equities / total) * er.equity
        + (bonds / total) * er.bonds
        + (cash / total) * er.cash
        + (reits / total) * er.reits
        + (crypto / total) * er.crypto
}
