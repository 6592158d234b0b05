//! Approximate byte sizes for cache accounting.

use std::fmt;

/// A size in bytes, kept as a float because it is only ever used for
/// estimates and human-readable reporting.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct StorageSize(pub f64);

const UNITS: [(f64, &str); 4] = [
    (1024.0 * 1024.0 * 1024.0 * 1024.0, "TiB"),
    (1024.0 * 1024.0 * 1024.0, "GiB"),
    (1024.0 * 1024.0, "MiB"),
    (1024.0, "KiB"),
];

impl StorageSize {
    pub fn bytes(self) -> f64 {
        self.0
    }
}

impl From<usize> for StorageSize {
    fn from(len: usize) -> Self {
        StorageSize(len as f64)
    }
}

impl fmt::Display for StorageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (scale, unit) in UNITS {
            if self.0 > scale {
                return write!(f, "{:.2} {}", self.0 / scale, unit);
            }
        }
        write!(f, "{:.2} B", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_picks_unit() {
        assert_eq!(StorageSize(512.0).to_string(), "512.00 B");
        assert_eq!(StorageSize(1024.0).to_string(), "1024.00 B");
        assert_eq!(StorageSize(2048.0).to_string(), "2.00 KiB");
        assert_eq!(StorageSize(3.5 * 1024.0 * 1024.0).to_string(), "3.50 MiB");
    }

    #[test]
    fn from_usize() {
        assert_eq!(StorageSize::from(540usize), StorageSize(540.0));
    }
}
