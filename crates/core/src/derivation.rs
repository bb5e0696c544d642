//! Pure computation of the equation and area-model partition shown for a step.

use serde::Serialize;

use crate::model::{Fraction, StepKind, StepLayout};

/// Largest factor the area model can be split into.
pub const MAX_FACTOR: u32 = 6;

/// Operator shown between the two fractions of the equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FractionPair {
    pub numerator: u32,
    pub denominator: u32,
}

impl FractionPair {
    #[must_use]
    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// Everything needed to draw the equation for one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DerivedView {
    pub factor: u32,
    pub scaled_numerator: u32,
    pub scaled_denominator: u32,
    pub is_simplify_step: bool,
    /// Fraction left of the operator.
    pub left: FractionPair,
    pub operator: Operator,
    /// Fraction right of the equals sign.
    pub result: FractionPair,
    /// Horizontal partition lines drawn inside the area model.
    pub line_count: u32,
}

/// Factor the tutorial starts from: thirds scale by 3, everything else by 2.
#[must_use]
pub fn base_factor(fraction: &Fraction) -> u32 {
    if fraction.denominator() == 3 { 3 } else { 2 }
}

/// How many lines the learner may add on top of the base factor.
#[must_use]
pub fn max_extra_lines(fraction: &Fraction) -> u32 {
    MAX_FACTOR.saturating_sub(base_factor(fraction))
}

/// Derive the equation for `step` of `layout`.
///
/// Extra lines only count from step 1 onwards and are capped at
/// [`max_extra_lines`], so the factor never exceeds [`MAX_FACTOR`]. The
/// simplify step swaps the sides and divides instead of multiplying.
#[must_use]
pub fn derive(
    fraction: &Fraction,
    layout: StepLayout,
    step: usize,
    extra_lines: u32,
) -> DerivedView {
    let extra = if step >= 1 {
        extra_lines.min(max_extra_lines(fraction))
    } else {
        0
    };
    let factor = base_factor(fraction) + extra;
    let scaled_numerator = fraction.numerator() * factor;
    let scaled_denominator = fraction.denominator() * factor;
    let original = FractionPair::new(fraction.numerator(), fraction.denominator());
    let scaled = FractionPair::new(scaled_numerator, scaled_denominator);
    let is_simplify_step = layout.kind_at(step) == StepKind::Simplify;

    let (left, operator, result) = if is_simplify_step {
        (scaled, Operator::Divide, original)
    } else {
        (original, Operator::Multiply, scaled)
    };

    DerivedView {
        factor,
        scaled_numerator,
        scaled_denominator,
        is_simplify_step,
        left,
        operator,
        result,
        line_count: factor - 1,
    }
}
