//! Validity oracle: decodes candidate encodings and scores valid molecules.
//!
//! The evolutionary search only depends on the [`Oracle`] trait. A decode
//! failure of any kind is reported as `None`; invalidity is an ordinary
//! outcome, never an error the caller has to handle.
//!
//! [`SmilesOracle`] is the built-in back-end. It parses a SMILES subset
//! (see [`smiles`]) and derives drug-likeness (QED) and lipophilicity
//! (atom-contribution logP) from the decoded graph.

pub mod descriptors;
pub mod smiles;

pub use crate::schema::Descriptors;
pub use descriptors::{Alert, MolProperties};
pub use smiles::{Element, MolGraph, SmilesError};

/// Decode and describe candidate encodings.
///
/// Implementations must be deterministic for a given encoding.
pub trait Oracle {
    /// Validated structure produced by a successful decode.
    type Structure;

    /// Decode an encoding, or `None` if it is not a valid molecule.
    fn decode(&self, encoding: &str) -> Option<Self::Structure>;

    /// Descriptors of a decoded structure.
    fn descriptors(&self, structure: &Self::Structure) -> Descriptors;

    /// Decode check only.
    fn is_valid(&self, encoding: &str) -> bool {
        self.decode(encoding).is_some()
    }

    /// Decode and describe in one step.
    fn describe(&self, encoding: &str) -> Option<Descriptors> {
        self.decode(encoding).map(|s| self.descriptors(&s))
    }
}

impl<O: Oracle + ?Sized> Oracle for &O {
    type Structure = O::Structure;

    fn decode(&self, encoding: &str) -> Option<Self::Structure> {
        (**self).decode(encoding)
    }

    fn descriptors(&self, structure: &Self::Structure) -> Descriptors {
        (**self).descriptors(structure)
    }

    fn is_valid(&self, encoding: &str) -> bool {
        (**self).is_valid(encoding)
    }
}

/// Built-in SMILES back-end.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmilesOracle;

impl SmilesOracle {
    pub fn new() -> Self {
        Self
    }
}

impl Oracle for SmilesOracle {
    type Structure = MolGraph;

    fn decode(&self, encoding: &str) -> Option<MolGraph> {
        match smiles::parse(encoding) {
            Ok(mol) => Some(mol),
            Err(e) => {
                log::trace!("Rejected {encoding:?}: {e}");
                None
            }
        }
    }

    fn descriptors(&self, structure: &MolGraph) -> Descriptors {
        let props = MolProperties::of(structure);
        Descriptors {
            druglikeness: descriptors::qed(&props),
            lipophilicity: props.logp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_valid_and_invalid() {
        let oracle = SmilesOracle::new();
        assert!(oracle.is_valid("CCN(C)"));
        assert!(!oracle.is_valid("CC(("));
        assert!(!oracle.is_valid(""));
    }

    #[test]
    fn test_describe() {
        let oracle = SmilesOracle::new();
        let d = oracle.describe("CCCO").unwrap();
        assert!((d.lipophilicity - 0.3887).abs() < 1e-4);
        assert!(d.druglikeness > 0.0 && d.druglikeness <= 1.0);
        assert!(oracle.describe("C=").is_none());
    }

    #[test]
    fn test_deterministic() {
        let oracle = SmilesOracle::new();
        assert_eq!(oracle.describe("CC(=O)N"), oracle.describe("CC(=O)N"));
    }

    #[test]
    fn test_reference_forwarding() {
        let oracle = SmilesOracle::new();
        let by_ref = &oracle;
        assert!(by_ref.is_valid("CCO"));
        assert_eq!(by_ref.describe("CCO"), oracle.describe("CCO"));
    }
}
