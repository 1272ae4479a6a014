//! Error types for registry operations

use core::fmt;

/// Errors from the domain registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Every slot holds a domain; no new category can be wrapped.
    ///
    /// This is a configuration error, not a transient one: the set of
    /// foreign categories a process uses is expected to be small and fixed.
    Full { capacity: usize },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::Full { capacity } => {
                write!(f, "domain registry full ({} slots in use)", capacity)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_capacity() {
        let e = RegistryError::Full { capacity: 64 };
        assert_eq!(e.to_string(), "domain registry full (64 slots in use)");
    }
}
