#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StateSyncStatus {
    /// Registered but never computed.
    #[default]
    Init,
    Dirty,
    Clean,
}

impl StateSyncStatus {
    pub fn needs_compute(self) -> bool {
        matches!(self, Self::Init | Self::Dirty)
    }
}
