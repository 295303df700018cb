use std::collections::HashMap;

use crate::domain::models::{Axis, AxisPriority, AxisTier};

/// Service for weighing completeness gaps and checking the baseline gate
///
/// Priority formula: weight(axis) * (1 - completeness(axis))
#[derive(Debug, Clone)]
pub struct PriorityCalculator {
    essential_floor: f64,
    core_floor: f64,
    core_required: usize,
}

impl Default for PriorityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl PriorityCalculator {
    /// Create a calculator with the standard baseline thresholds
    pub fn new() -> Self {
        Self {
            essential_floor: 0.5,
            core_floor: 0.3,
            core_required: 2,
        }
    }

    /// Create a calculator with custom baseline thresholds
    pub fn with_thresholds(essential_floor: f64, core_floor: f64, core_required: usize) -> Self {
        Self {
            essential_floor,
            core_floor,
            core_required,
        }
    }

    /// Priority of one axis given its completeness (clamped to `[0, 1]`)
    pub fn priority(&self, axis: Axis, completeness: f64) -> f64 {
        axis.weight() * (1.0 - completeness.clamp(0.0, 1.0))
    }

    /// Priorities for every axis in enumeration order
    ///
    /// Axes missing from `completeness` are treated as fully unknown.
    pub fn calculate_all(&self, completeness: &HashMap<Axis, f64>) -> Vec<AxisPriority> {
        Axis::ALL
            .iter()
            .map(|&axis| {
                let c = completeness.get(&axis).copied().unwrap_or(0.0);
                AxisPriority {
                    axis,
                    weight: axis.weight(),
                    completeness: c,
                    priority: self.priority(axis, c),
                }
            })
            .collect()
    }

    /// Highest-priority entry; the earliest axis wins ties
    ///
    /// Returns `None` when every priority is zero.
    pub fn highest(&self, priorities: &[AxisPriority]) -> Option<AxisPriority> {
        let mut best: Option<AxisPriority> = None;
        for entry in priorities {
            if entry.priority > best.map_or(0.0, |b| b.priority) {
                best = Some(*entry);
            }
        }
        best
    }

    /// Whether enough of the profile is known for guided mode to stand down
    ///
    /// Every Tier-1 axis must reach the essential floor and at least
    /// `core_required` Tier-2 axes must reach the core floor.
    pub fn baseline_met(&self, completeness: &HashMap<Axis, f64>) -> bool {
        let score = |axis: &Axis| completeness.get(axis).copied().unwrap_or(0.0);

        let essentials_met = Axis::in_tier(AxisTier::Essential).all(|axis| score(&axis) >= self.essential_floor);
        let core_met = Axis::in_tier(AxisTier::Core)
            .filter(|axis| score(axis) >= self.core_floor)
            .count();

        essentials_met && core_met >= self.core_required
    }
}
