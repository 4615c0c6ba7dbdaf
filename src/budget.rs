//! Monthly budget progress and the geometry of the progress ring.

use std::f64::consts::PI;

use serde::Serialize;

/// How much of a monthly budget has been spent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// The amount spent so far.
    pub spent: i64,
    /// The budget for the month.
    pub budget: i64,
}

impl BudgetProgress {
    /// Create the progress for `spent` out of `budget`.
    pub fn new(spent: i64, budget: i64) -> Self {
        Self { spent, budget }
    }

    /// The share of the budget spent, in percent. Not clamped, so overspending
    /// gives values above 100. A budget of zero or less gives 0.
    pub fn used_percent(&self) -> f64 {
        if self.budget <= 0 {
            return 0.0;
        }

        self.spent as f64 / self.budget as f64 * 100.0
    }

    /// The amount left to spend. Negative when over budget.
    pub fn remaining(&self) -> i64 {
        self.budget - self.spent
    }

    /// Whether more than the budget has been spent.
    pub fn is_over_budget(&self) -> bool {
        self.spent > self.budget
    }
}

/// The stroke settings for drawing a percentage as an SVG circle.
///
/// The ring is a circle with `stroke-dasharray` set to the circumference and
/// `stroke-dashoffset` set to the part of the circumference left undrawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingGeometry {
    /// The circle's radius.
    pub radius: f64,
    /// The circle's circumference, `2πr`.
    pub circumference: f64,
    /// The undrawn length of the stroke.
    pub dash_offset: f64,
}

impl RingGeometry {
    /// The geometry for `percent` (clamped to 0..=100) on a ring of `radius`.
    pub fn new(percent: f64, radius: f64) -> Self {
        let circumference = 2.0 * PI * radius;
        let percent = if percent.is_nan() {
            0.0
        } else {
            percent.clamp(0.0, 100.0)
        };

        Self {
            radius,
            circumference,
            dash_offset: circumference * (1.0 - percent / 100.0),
        }
    }
}
