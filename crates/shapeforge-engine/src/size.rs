//! Size budget for recursive generation.
//!
//! Every composite hands its children a smaller budget than its own, so any
//! chain of nested composites reaches zero after at most `size` steps.

use rand::Rng;

/// Budget for each of `children` immediate children of a node with budget
/// `parent`.
///
/// - no children: 0
/// - one child: `round(parent * 0.9)`
/// - several: `round(parent / children)`
pub fn child_budget(parent: u32, children: usize) -> u32 {
    match children {
        0 => 0,
        1 => (parent as f64 * 0.9).round() as u32,
        c => (parent as f64 / c as f64).round() as u32,
    }
}

/// [`child_budget`] clamped strictly below `parent`.
///
/// Rounding alone keeps small budgets fixed (`round(4 * 0.9) == 4`), which
/// would let a single-child self reference recurse forever.
pub fn descend(parent: u32, children: usize) -> u32 {
    child_budget(parent, children).min(parent.saturating_sub(1))
}

/// Element count for a container, uniform in `[0, budget)`.
pub fn element_count<R: Rng + ?Sized>(rng: &mut R, budget: u32) -> usize {
    if budget == 0 {
        return 0;
    }
    rng.gen_range(0..budget) as usize
}
