//! Built-in formulas provided by the FinCalc catalog.
//!
//! Each group module exposes a `FORMULAS` table; `all()` chains them in
//! category order.

use crate::catalog::FormulaSpec;

// Dates and year fractions
pub mod utility;

// Interest
pub mod compound_interest;
pub mod rates;
pub mod simple_interest;

// Discounts
pub mod discount;

// Annuities and gradients
pub mod annuities;
pub mod gradients;

// Amortization schedules
pub mod loans;

/// Every built-in formula.
pub fn all() -> impl Iterator<Item = &'static FormulaSpec> {
    utility::FORMULAS
        .iter()
        .chain(simple_interest::FORMULAS)
        .chain(compound_interest::FORMULAS)
        .chain(rates::FORMULAS)
        .chain(discount::FORMULAS)
        .chain(annuities::FORMULAS)
        .chain(gradients::FORMULAS)
        .chain(loans::FORMULAS)
}
