//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Everything this workspace hands back to the host (move-line drafts, bill
/// drafts, report requests, tax breakdowns) is a value object: it is built in
/// one go, compared field by field, and never mutated afterwards.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq)]
/// struct MoveLineDraft { name: String, price_unit: Decimal }
///
/// impl ValueObject for MoveLineDraft {}
///
/// // Projecting the same expense twice gives equal drafts.
/// assert_eq!(project(&expense), project(&expense));
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
