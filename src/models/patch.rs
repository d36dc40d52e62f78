use serde::{Deserialize, Deserializer};

/// One field of a merge-patch body.
///
/// A key missing from the JSON object deserializes to `Absent` (the field
/// must be marked `#[serde(default)]`); a key that is present, even with a
/// `null` value, becomes `Present`. Use `Patch<Option<T>>` for columns that
/// may be cleared with `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Patch<T> {
    Absent,
    Present(T),
}

impl<T> Default for Patch<T> {
    fn default() -> Self {
        Patch::Absent
    }
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Patch::Present(value) => Some(value),
            Patch::Absent => None,
        }
    }

    /// Overwrites `target` only when a value was supplied.
    pub fn apply_to(self, target: &mut T) {
        if let Patch::Present(value) = self {
            *target = value;
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Patch::Present)
    }
}
