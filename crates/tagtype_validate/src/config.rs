//! Configuration for the validation runtime.

/// How many elements of a sequence are checked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ArrayScan {
    /// Only the first element at each nesting level is checked.
    #[default]
    FirstSample,
    /// Every element at every nesting level is checked.
    FullScan,
}

/// Configuration for the validation runtime.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Sequence and lookup-table element scanning.
    pub array_scan: ArrayScan,
}

impl ValidationConfig {
    /// Creates a configuration that checks every element of every sequence.
    #[must_use]
    pub fn full_scan() -> Self {
        Self {
            array_scan: ArrayScan::FullScan,
        }
    }

    /// Builder method to set the array scan mode.
    #[must_use]
    pub fn with_array_scan(mut self, scan: ArrayScan) -> Self {
        self.array_scan = scan;
        self
    }
}
