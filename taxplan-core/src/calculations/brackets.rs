//! Progressive tax over a marginal bracket table.
//!
//! Each bracket taxes the slice `min(net, max) - min + 1` of net income,
//! so a bracket starting at `150001` taxes one baht of an income of exactly
//! `150001`. The accumulated tax is rounded to whole baht once, after all
//! brackets have been applied.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use taxplan_core::calculations::{BracketEngine, progressive_tax};
//! use taxplan_core::THAI_BRACKETS_2024;
//!
//! assert_eq!(progressive_tax(dec!(440000)), dec!(21500));
//!
//! let engine = BracketEngine::new(&THAI_BRACKETS_2024);
//! assert_eq!(engine.tax(dec!(300000)), dec!(7500));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;

use crate::calculations::common::round_to_whole;
use crate::models::{THAI_BRACKETS_2024, TaxBracket, TaxSchedule};

/// Tax attributed to a single bracket, for display next to the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketTax {
    pub bracket: TaxBracket,
    /// Net income reaches into this bracket.
    pub is_applicable: bool,
    /// This bracket's share, rounded on its own.
    pub tax: Decimal,
}

/// Applies an ordered bracket table to net income.
#[derive(Debug, Clone, Copy)]
pub struct BracketEngine<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketEngine<'a> {
    /// Brackets must be sorted by `min_income` ascending.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    /// Total tax on `net_income`, rounded to whole baht. Zero for any
    /// non-positive income.
    pub fn tax(
        &self,
        net_income: Decimal,
    ) -> Decimal {
        if net_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut tax = Decimal::ZERO;
        for bracket in self.brackets {
            if net_income <= bracket.min_income {
                break;
            }

            let slice = taxable_slice(bracket, net_income);
            if slice > Decimal::ZERO {
                tax += slice * bracket.tax_rate;
            }
        }

        trace!(%net_income, %tax, "progressive tax before rounding");
        round_to_whole(tax)
    }

    /// One row per bracket. Rows are rounded individually, so their sum
    /// can differ from [`Self::tax`] by a baht or two.
    pub fn breakdown(
        &self,
        net_income: Decimal,
    ) -> Vec<BracketTax> {
        self.brackets
            .iter()
            .map(|bracket| {
                let is_applicable = bracket.applies_to(net_income);
                let tax = if is_applicable {
                    let slice = taxable_slice(bracket, net_income);
                    if slice > Decimal::ZERO {
                        round_to_whole(slice * bracket.tax_rate)
                    } else {
                        Decimal::ZERO
                    }
                } else {
                    Decimal::ZERO
                };

                BracketTax {
                    bracket: *bracket,
                    is_applicable,
                    tax,
                }
            })
            .collect()
    }

    /// The highest bracket `net_income` reaches, if any.
    pub fn marginal_bracket(
        &self,
        net_income: Decimal,
    ) -> Option<&'a TaxBracket> {
        self.brackets
            .iter()
            .take_while(|b| b.applies_to(net_income))
            .last()
    }
}

fn taxable_slice(
    bracket: &TaxBracket,
    net_income: Decimal,
) -> Decimal {
    let upper = match bracket.max_income {
        Some(max) => net_income.min(max),
        None => net_income,
    };
    upper - bracket.min_income + Decimal::ONE
}

impl TaxSchedule {
    pub fn bracket_engine(&self) -> BracketEngine<'_> {
        BracketEngine::new(self.brackets())
    }

    pub fn progressive_tax(
        &self,
        net_income: Decimal,
    ) -> Decimal {
        self.bracket_engine().tax(net_income)
    }

    pub fn bracket_breakdown(
        &self,
        net_income: Decimal,
    ) -> Vec<BracketTax> {
        self.bracket_engine().breakdown(net_income)
    }

    pub fn marginal_bracket(
        &self,
        net_income: Decimal,
    ) -> Option<&TaxBracket> {
        self.bracket_engine().marginal_bracket(net_income)
    }
}

/// Tax on `net_income` under the built-in 2024 brackets.
pub fn progressive_tax(net_income: Decimal) -> Decimal {
    BracketEngine::new(&THAI_BRACKETS_2024).tax(net_income)
}
