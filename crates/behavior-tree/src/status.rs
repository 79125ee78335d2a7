//! Status returned by behavior nodes.

/// The result of evaluating a behavior node for one tick.
///
/// # Tick Semantics
///
/// A battle tick is a single decision point, so nothing stays "running"
/// across ticks:
/// - Conditions answer immediately from the context (e.g. "is the target in
///   range?")
/// - Actions write their decision into the context and return at once (e.g.
///   "step toward the target")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The node got what it wanted.
    ///
    /// For conditions: the predicate held.
    /// For actions: a decision was committed to the context.
    Success,

    /// The node did not get what it wanted.
    ///
    /// For conditions: the predicate did not hold.
    /// For actions: the action declined to act this tick, leaving the
    /// context untouched.
    Failure,
}

impl Status {
    /// Returns `true` for [`Status::Success`].
    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    /// Returns `true` for [`Status::Failure`].
    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    /// Success becomes Failure and vice versa.
    ///
    /// Backs the [`Inverter`](crate::Inverter) decorator.
    #[inline]
    pub fn invert(self) -> Self {
        match self {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
        }
    }
}

/// `true` maps to [`Status::Success`], which lets plain predicates act as
/// condition nodes.
impl From<bool> for Status {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            Status::Success
        } else {
            Status::Failure
        }
    }
}
