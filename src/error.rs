//! Error types for the gear search engine.
//!
//! Only two kinds of failure are ever surfaced to a caller: a
//! construction-time configuration mistake, or an internal invariant
//! violation that means the engine's own bookkeeping is broken. Every
//! other failure named in the design (constraint violations, missing
//! coefficients) is expected, local, and handled by marking a candidate
//! invalid rather than by raising an error.

use thiserror::Error;

/// Errors that can occur while constructing or driving [`crate::search::Engine`].
///
/// # Examples
///
/// ```rust
/// use gearsolve::error::GearError;
///
/// let err = GearError::UnknownInfusionMode("quintuple".into());
/// assert!(err.to_string().contains("quintuple"));
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GearError {
    /// The requested infusion mode is not one of the five recognized
    /// strategies (`none`, `primary`, `few`, `secondary`,
    /// `secondary-no-duplicates`).
    #[error("unknown infusion mode: {0}")]
    UnknownInfusionMode(String),

    /// One of the slot layout's symmetry groups referenced a slot index
    /// that does not exist in `settings.slots`.
    #[error("slot layout is inconsistent: {0}")]
    InvalidSlotLayout(String),

    /// The search's internal gear/stats stacks underflowed at the given
    /// slot depth. This can only happen if the engine's own bookkeeping
    /// is wrong; it is never caused by caller input.
    #[error("internal invariant violated: stack underflow at slot {at_slot}")]
    StackUnderflow { at_slot: usize },
}
