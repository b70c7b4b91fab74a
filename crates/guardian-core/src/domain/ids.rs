use uuid::Uuid;

/// Number of logical gamepad units that can carry an override.
pub const MAX_UNITS: usize = 4;

/// Index of a logical gamepad unit, guaranteed to be below [`MAX_UNITS`].
///
/// The only way to build one from untrusted input is [`UnitIndex::new`], so a
/// value of this type can index per-unit tables without a bounds check
/// failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitIndex(u8);

impl UnitIndex {
    /// Returns `Some` when `index` addresses one of the [`MAX_UNITS`] units.
    pub fn new(index: u8) -> Option<Self> {
        if (index as usize) < MAX_UNITS {
            Some(Self(index))
        } else {
            None
        }
    }

    /// The raw index as it appears on the wire.
    pub fn raw(self) -> u8 {
        self.0
    }

    /// The index as a table offset.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Iterates over every valid unit in ascending order.
    pub fn all() -> impl Iterator<Item = UnitIndex> {
        (0..MAX_UNITS as u8).map(UnitIndex)
    }
}

impl std::fmt::Display for UnitIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operating-system identifier of the process issuing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessId(pub u32);

impl std::fmt::Display for ProcessId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identity of one attached filtered device instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(pub Uuid);

impl InstanceId {
    /// Generates a fresh random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for InstanceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
