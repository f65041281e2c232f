//! String-backed enumerations.
//!
//! Members are addressed by an upper-case name (`NACIONAL`) and carry a
//! separate storage value (`nacional`). The name is what gets shown and
//! serialized in API responses.

use crate::error::DomainError;

/// Enumeration whose members are looked up and rendered by name.
pub trait StrEnum: Copy + Sized + 'static {
    /// Human-readable kind, used in error messages.
    const KIND: &'static str;

    /// Every member, in declaration order.
    const MEMBERS: &'static [Self];

    /// Upper-case member name.
    fn name(&self) -> &'static str;

    /// Stored value of the member.
    fn value(&self) -> &'static str;

    /// Look a member up by name, ignoring case.
    fn from_name(name: &str) -> Result<Self, DomainError> {
        let wanted = name.trim().to_uppercase();
        Self::MEMBERS
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| DomainError::unknown_member(Self::KIND, name))
    }

    /// Look a member up by its stored value.
    fn from_value(value: &str) -> Result<Self, DomainError> {
        Self::MEMBERS
            .iter()
            .copied()
            .find(|m| m.value() == value)
            .ok_or_else(|| DomainError::unknown_member(Self::KIND, value))
    }
}
