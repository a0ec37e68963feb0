use core::fmt;

use serde::{Deserialize, Serialize};

/// The type carried by one slot of the population.
///
/// `A` is the mutant, `B` the resident. The single-character form is what
/// appears in event encodings (`3A:17B`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndividualType {
    /// Mutant
    A,
    /// Resident
    B,
}

impl IndividualType {
    /// Return the other type.
    #[inline(always)]
    pub const fn flipped(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    #[inline(always)]
    pub const fn is_mutant(self) -> bool {
        matches!(self, Self::A)
    }

    /// Convert to an uppercase `char`.
    #[inline(always)]
    pub const fn to_char(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
        }
    }
}

impl From<IndividualType> for char {
    #[inline(always)]
    fn from(t: IndividualType) -> char {
        t.to_char()
    }
}

impl fmt::Display for IndividualType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped() {
        assert_eq!(IndividualType::A.flipped(), IndividualType::B);
        assert_eq!(IndividualType::B.flipped(), IndividualType::A);
        assert_eq!(IndividualType::A.flipped().flipped(), IndividualType::A);
    }

    #[test]
    fn test_char_conversion() {
        assert_eq!(char::from(IndividualType::A), 'A');
        assert_eq!(IndividualType::B.to_char(), 'B');
    }

    #[test]
    fn test_display() {
        assert_eq!(IndividualType::A.to_string(), "A");
        assert_eq!(IndividualType::B.to_string(), "B");
        assert!(IndividualType::A.is_mutant());
        assert!(!IndividualType::B.is_mutant());
    }
}
