//! Balanced marks invariant: alternating play keeps counts within one.

use super::super::Mark;
use super::{Invariant, Recorded};

/// Invariant: the X and O counts on the board never differ by more than one.
pub struct BalancedMarksInvariant;

impl<S: Recorded> Invariant<S> for BalancedMarksInvariant {
    fn holds(state: &S) -> bool {
        let x = state.board().count(Mark::X);
        let o = state.board().count(Mark::O);
        x.abs_diff(o) <= 1
    }

    fn description() -> &'static str {
        "Mark counts differ by at most one"
    }
}
