//! SMILES subset parser.
//!
//! Accepts organic-subset atoms (`B C N O P S F Cl Br I`), bracket atoms with
//! isotope, hydrogen count and charge, the bonds `-`, `=` and `#`, branches and
//! ring closures (`1`-`9`, `%nn`). Aromatic (lowercase) atoms, stereo markers
//! and disconnected components are outside the subset and rejected.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Elements the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    B,
    C,
    N,
    O,
    P,
    S,
    F,
    Cl,
    Br,
    I,
}

impl Element {
    /// Parse an element symbol.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "B" => Self::B,
            "C" => Self::C,
            "N" => Self::N,
            "O" => Self::O,
            "P" => Self::P,
            "S" => Self::S,
            "F" => Self::F,
            "Cl" => Self::Cl,
            "Br" => Self::Br,
            "I" => Self::I,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::S => "S",
            Self::F => "F",
            Self::Cl => "Cl",
            Self::Br => "Br",
            Self::I => "I",
        }
    }

    /// Standard atomic weight.
    pub fn mass(self) -> f64 {
        match self {
            Self::B => 10.811,
            Self::C => 12.011,
            Self::N => 14.007,
            Self::O => 15.999,
            Self::P => 30.974,
            Self::S => 32.065,
            Self::F => 18.998,
            Self::Cl => 35.453,
            Self::Br => 79.904,
            Self::I => 126.904,
        }
    }

    /// Allowed valences of the neutral atom, ascending.
    pub fn valences(self) -> &'static [u8] {
        match self {
            Self::B => &[3],
            Self::C => &[4],
            Self::N => &[3],
            Self::O => &[2],
            Self::P => &[3, 5],
            Self::S => &[2, 4, 6],
            Self::F | Self::Cl | Self::Br | Self::I => &[1],
        }
    }

    /// Valence shift caused by a formal charge.
    fn charge_shift(self, charge: i8) -> i16 {
        let charge = i16::from(charge);
        match self {
            Self::C => -charge.abs(),
            Self::B => -charge,
            _ => charge,
        }
    }

    pub fn is_halogen(self) -> bool {
        matches!(self, Self::F | Self::Cl | Self::Br | Self::I)
    }
}

/// A heavy atom in the molecular graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub element: Element,
    pub charge: i8,
    /// Hydrogens attached (implicit or bracket-specified).
    pub hydrogens: u8,
    /// Whether the atom was written in brackets.
    pub bracket: bool,
}

/// A bond between two heavy atoms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    pub a: usize,
    pub b: usize,
    pub order: u8,
}

impl Bond {
    /// The atom on the other end, if `atom` is an endpoint.
    pub fn other(&self, atom: usize) -> Option<usize> {
        if self.a == atom {
            Some(self.b)
        } else if self.b == atom {
            Some(self.a)
        } else {
            None
        }
    }
}

/// Validated heavy-atom graph decoded from a SMILES string.
#[derive(Debug, Clone, PartialEq)]
pub struct MolGraph {
    atoms: Vec<Atom>,
    bonds: Vec<Bond>,
}

impl MolGraph {
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Bonds incident to `atom` paired with the neighbouring atom index.
    pub fn neighbors(&self, atom: usize) -> impl Iterator<Item = (usize, &Bond)> {
        self.bonds
            .iter()
            .filter_map(move |bond| bond.other(atom).map(|n| (n, bond)))
    }

    /// Number of heavy-atom neighbours.
    pub fn degree(&self, atom: usize) -> usize {
        self.neighbors(atom).count()
    }

    /// Sum of bond orders to heavy atoms.
    pub fn bond_order_sum(&self, atom: usize) -> u8 {
        self.neighbors(atom).map(|(_, b)| b.order).sum()
    }

    /// Total hydrogen count.
    pub fn hydrogen_count(&self) -> usize {
        self.atoms.iter().map(|a| a.hydrogens as usize).sum()
    }

    /// Whether the bond at `index` lies on a cycle.
    pub fn is_ring_bond(&self, index: usize) -> bool {
        let Some(bond) = self.bonds.get(index) else {
            return false;
        };

        // Search for a path from a to b that avoids this bond.
        let mut visited = vec![false; self.atoms.len()];
        let mut stack = vec![bond.a];
        visited[bond.a] = true;
        while let Some(current) = stack.pop() {
            for (i, other) in self.bonds.iter().enumerate() {
                if i == index {
                    continue;
                }
                if let Some(next) = other.other(current) {
                    if next == bond.b {
                        return true;
                    }
                    if !visited[next] {
                        visited[next] = true;
                        stack.push(next);
                    }
                }
            }
        }
        false
    }

    /// Number of independent cycles.
    pub fn ring_count(&self) -> usize {
        // The graph is connected by construction.
        (self.bonds.len() + 1).saturating_sub(self.atoms.len())
    }
}

/// SMILES parse and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SmilesError {
    #[error("Empty SMILES string")]
    Empty,
    #[error("Unexpected character '{ch}' at position {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("Bond at position {pos} is not between two atoms")]
    DanglingBond { pos: usize },
    #[error("Branch at position {pos} does not follow an atom")]
    BranchWithoutAtom { pos: usize },
    #[error("Empty branch at position {pos}")]
    EmptyBranch { pos: usize },
    #[error("Unmatched ')' at position {pos}")]
    UnbalancedBranch { pos: usize },
    #[error("{0} branch(es) left open")]
    UnclosedBranch(usize),
    #[error("Ring closure at position {pos} does not follow an atom")]
    RingWithoutAtom { pos: usize },
    #[error("Ring label {0} never closed")]
    UnclosedRing(u16),
    #[error("Ring label {label} closes onto its own atom")]
    SelfBond { label: u16 },
    #[error("Ring label {label} duplicates an existing bond")]
    DuplicateBond { label: u16 },
    #[error("Ring label {label} has conflicting bond orders")]
    ConflictingRingBond { label: u16 },
    #[error("Malformed bracket atom at position {pos}")]
    BadBracketAtom { pos: usize },
    #[error("Atom {index} ({element}) exceeds its allowed valence")]
    Valence { index: usize, element: &'static str },
}

/// Parse and validate a SMILES string.
pub fn parse(smiles: &str) -> Result<MolGraph, SmilesError> {
    Parser::new(smiles).run()
}

struct PendingAtom {
    element: Element,
    charge: i8,
    hydrogens: Option<u8>,
}

struct Parser<'a> {
    chars: Vec<char>,
    pos: usize,
    source: &'a str,
    atoms: Vec<PendingAtom>,
    bonds: Vec<Bond>,
    prev: Option<usize>,
    pending_bond: Option<(u8, usize)>,
    /// Branch start: (atom the branch hangs from, atom count at open, position).
    branches: Vec<(usize, usize, usize)>,
    rings: HashMap<u16, (usize, Option<u8>)>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            source,
            atoms: Vec::new(),
            bonds: Vec::new(),
            prev: None,
            pending_bond: None,
            branches: Vec::new(),
            rings: HashMap::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn run(mut self) -> Result<MolGraph, SmilesError> {
        if self.source.is_empty() {
            return Err(SmilesError::Empty);
        }

        while let Some(ch) = self.peek() {
            let start = self.pos;
            self.pos += 1;
            match ch {
                'B' | 'C' => {
                    let two = match (ch, self.peek()) {
                        ('B', Some('r')) => Some(Element::Br),
                        ('C', Some('l')) => Some(Element::Cl),
                        _ => None,
                    };
                    let element = match two {
                        Some(element) => {
                            self.pos += 1;
                            element
                        }
                        None if ch == 'B' => Element::B,
                        None => Element::C,
                    };
                    self.push_atom(element, 0, None);
                }
                'N' | 'O' | 'P' | 'S' | 'F' | 'I' => {
                    let element = Element::from_symbol(&ch.to_string())
                        .ok_or(SmilesError::UnexpectedChar { ch, pos: start })?;
                    self.push_atom(element, 0, None);
                }
                '[' => {
                    let (element, charge, hydrogens) = self.bracket_atom(start)?;
                    self.push_atom(element, charge, Some(hydrogens));
                }
                '-' | '=' | '#' => {
                    if self.prev.is_none() || self.pending_bond.is_some() {
                        return Err(SmilesError::DanglingBond { pos: start });
                    }
                    let order = match ch {
                        '-' => 1,
                        '=' => 2,
                        _ => 3,
                    };
                    self.pending_bond = Some((order, start));
                }
                '(' => {
                    let Some(anchor) = self.prev else {
                        return Err(SmilesError::BranchWithoutAtom { pos: start });
                    };
                    if let Some((_, pos)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond { pos });
                    }
                    self.branches.push((anchor, self.atoms.len(), start));
                }
                ')' => {
                    let Some((anchor, opened_at, open_pos)) = self.branches.pop() else {
                        return Err(SmilesError::UnbalancedBranch { pos: start });
                    };
                    if let Some((_, pos)) = self.pending_bond {
                        return Err(SmilesError::DanglingBond { pos });
                    }
                    if self.atoms.len() == opened_at {
                        return Err(SmilesError::EmptyBranch { pos: open_pos });
                    }
                    self.prev = Some(anchor);
                }
                '0'..='9' => {
                    let label = ch.to_digit(10).map(|d| d as u16).unwrap_or_default();
                    self.ring_closure(label, start)?;
                }
                '%' => {
                    let tens = self.peek().and_then(|c| c.to_digit(10));
                    let units = self.chars.get(self.pos + 1).and_then(|c| c.to_digit(10));
                    let (Some(tens), Some(units)) = (tens, units) else {
                        return Err(SmilesError::UnexpectedChar { ch, pos: start });
                    };
                    self.pos += 2;
                    self.ring_closure((tens * 10 + units) as u16, start)?;
                }
                _ => return Err(SmilesError::UnexpectedChar { ch, pos: start }),
            }
        }

        if let Some((_, pos)) = self.pending_bond {
            return Err(SmilesError::DanglingBond { pos });
        }
        if !self.branches.is_empty() {
            return Err(SmilesError::UnclosedBranch(self.branches.len()));
        }
        if let Some(label) = self.rings.keys().min() {
            return Err(SmilesError::UnclosedRing(*label));
        }
        if self.atoms.is_empty() {
            return Err(SmilesError::Empty);
        }

        self.finish()
    }

    fn push_atom(&mut self, element: Element, charge: i8, hydrogens: Option<u8>) {
        let index = self.atoms.len();
        self.atoms.push(PendingAtom {
            element,
            charge,
            hydrogens,
        });
        if let Some(prev) = self.prev {
            let order = self.pending_bond.take().map(|(o, _)| o).unwrap_or(1);
            self.bonds.push(Bond {
                a: prev,
                b: index,
                order,
            });
        }
        self.prev = Some(index);
    }

    fn ring_closure(&mut self, label: u16, pos: usize) -> Result<(), SmilesError> {
        let Some(current) = self.prev else {
            return Err(SmilesError::RingWithoutAtom { pos });
        };
        let order_here = self.pending_bond.take().map(|(o, _)| o);

        match self.rings.entry(label) {
            Entry::Occupied(entry) => {
                let (opener, order_there) = entry.remove();
                if opener == current {
                    return Err(SmilesError::SelfBond { label });
                }
                let order = match (order_there, order_here) {
                    (Some(a), Some(b)) if a != b => {
                        return Err(SmilesError::ConflictingRingBond { label });
                    }
                    (Some(a), _) | (None, Some(a)) => a,
                    (None, None) => 1,
                };
                let duplicate = self
                    .bonds
                    .iter()
                    .any(|b| b.other(current) == Some(opener));
                if duplicate {
                    return Err(SmilesError::DuplicateBond { label });
                }
                self.bonds.push(Bond {
                    a: opener,
                    b: current,
                    order,
                });
            }
            Entry::Vacant(entry) => {
                entry.insert((current, order_here));
            }
        }
        Ok(())
    }

    /// Parse `[isotope? symbol H? count? charge?]` after the opening bracket.
    fn bracket_atom(&mut self, start: usize) -> Result<(Element, i8, u8), SmilesError> {
        let bad = SmilesError::BadBracketAtom { pos: start };

        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }

        let first = self.peek().filter(|c| c.is_ascii_uppercase()).ok_or(bad.clone())?;
        self.pos += 1;
        let mut symbol = first.to_string();
        if let Some(second) = self.peek().filter(|c| c.is_ascii_lowercase()) {
            let candidate = format!("{first}{second}");
            if Element::from_symbol(&candidate).is_some() {
                symbol = candidate;
                self.pos += 1;
            }
        }
        let element = Element::from_symbol(&symbol).ok_or(bad.clone())?;

        let mut hydrogens = 0u8;
        if self.peek() == Some('H') {
            self.pos += 1;
            hydrogens = match self.peek().and_then(|c| c.to_digit(10)) {
                Some(d) => {
                    self.pos += 1;
                    d as u8
                }
                None => 1,
            };
        }

        let mut charge: i8 = 0;
        if let Some(sign @ ('+' | '-')) = self.peek() {
            self.pos += 1;
            let unit: i8 = if sign == '+' { 1 } else { -1 };
            charge = unit;
            if let Some(d) = self.peek().and_then(|c| c.to_digit(10)) {
                self.pos += 1;
                charge = unit * d as i8;
            } else {
                while self.peek() == Some(sign) {
                    self.pos += 1;
                    charge = charge.checked_add(unit).ok_or(bad.clone())?;
                }
            }
        }

        if self.peek() != Some(']') {
            return Err(bad);
        }
        self.pos += 1;
        Ok((element, charge, hydrogens))
    }

    /// Check valences and assign implicit hydrogens.
    fn finish(self) -> Result<MolGraph, SmilesError> {
        let mut bond_sums = vec![0i16; self.atoms.len()];
        for bond in &self.bonds {
            bond_sums[bond.a] += i16::from(bond.order);
            bond_sums[bond.b] += i16::from(bond.order);
        }

        let mut atoms = Vec::with_capacity(self.atoms.len());
        for (index, pending) in self.atoms.into_iter().enumerate() {
            let shift = pending.element.charge_shift(pending.charge);
            let allowed = pending
                .element
                .valences()
                .iter()
                .map(|&v| i16::from(v) + shift)
                .filter(|&v| v >= 0);
            let used = bond_sums[index];
            let error = SmilesError::Valence {
                index,
                element: pending.element.symbol(),
            };

            let hydrogens = match pending.hydrogens {
                Some(h) => {
                    let total = used + i16::from(h);
                    let mut allowed = allowed;
                    if !allowed.any(|v| v == total) {
                        return Err(error);
                    }
                    h
                }
                None => {
                    let mut allowed = allowed;
                    let target = allowed.find(|&v| v >= used).ok_or(error)?;
                    (target - used) as u8
                }
            };

            atoms.push(Atom {
                element: pending.element,
                charge: pending.charge,
                hydrogens,
                bracket: pending.hydrogens.is_some(),
            });
        }

        Ok(MolGraph {
            atoms,
            bonds: self.bonds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_seed_vocabulary() {
        for smiles in ["CCCO", "CCCC", "CC(=O)", "C=C(C)", "CCN(C)"] {
            assert!(parse(smiles).is_ok(), "{smiles} should parse");
        }
    }

    #[test]
    fn test_implicit_hydrogens() {
        let mol = parse("CC(=O)").unwrap();
        let hs: Vec<u8> = mol.atoms().iter().map(|a| a.hydrogens).collect();
        assert_eq!(hs, vec![3, 1, 0]);
        assert_eq!(mol.hydrogen_count(), 4);
    }

    #[test]
    fn test_two_letter_atoms() {
        let mol = parse("ClCBr").unwrap();
        assert_eq!(mol.atoms()[0].element, Element::Cl);
        assert_eq!(mol.atoms()[2].element, Element::Br);
    }

    #[test]
    fn test_ring_closure() {
        let mol = parse("C1CCCCC1").unwrap();
        assert_eq!(mol.bonds().len(), 6);
        assert_eq!(mol.ring_count(), 1);
        assert!((0..6).all(|i| mol.is_ring_bond(i)));
        assert!(mol.atoms().iter().all(|a| a.hydrogens == 2));
    }

    #[test]
    fn test_percent_ring_label() {
        assert!(parse("C%12CC%12").is_ok());
        assert!(parse("C%1CC").is_err());
    }

    #[test]
    fn test_chain_bond_not_in_ring() {
        let mol = parse("CC1CC1").unwrap();
        assert!(!mol.is_ring_bond(0));
        assert!(mol.is_ring_bond(1));
    }

    #[test]
    fn test_bracket_atoms() {
        let mol = parse("C[NH3+]").unwrap();
        assert_eq!(mol.atoms()[1].charge, 1);
        assert_eq!(mol.atoms()[1].hydrogens, 3);

        let mol = parse("CC(=O)[O-]").unwrap();
        assert_eq!(mol.atoms()[3].charge, -1);
        assert_eq!(mol.atoms()[3].hydrogens, 0);

        assert!(parse("[13CH4]").is_ok());
        assert!(parse("[Xx]").is_err());
        assert!(parse("[CH4").is_err());
    }

    #[test]
    fn test_valence_violations() {
        assert_eq!(
            parse("C(C)(C)(C)(C)C"),
            Err(SmilesError::Valence {
                index: 0,
                element: "C"
            })
        );
        assert!(parse("O=O=O").is_err());
        assert!(parse("FF").is_ok());
        assert!(parse("FCF(C)").is_err());
        assert!(parse("[CH4]C").is_err());
    }

    #[test]
    fn test_hypervalent_sulfur() {
        let mol = parse("CS(=O)(=O)C").unwrap();
        assert_eq!(mol.atoms()[1].hydrogens, 0);
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse(""), Err(SmilesError::Empty));
        assert_eq!(parse("C=").unwrap_err(), SmilesError::DanglingBond { pos: 1 });
        assert_eq!(parse("=C").unwrap_err(), SmilesError::DanglingBond { pos: 0 });
        assert_eq!(parse("(C)C").unwrap_err(), SmilesError::BranchWithoutAtom { pos: 0 });
        assert_eq!(parse("C()C").unwrap_err(), SmilesError::EmptyBranch { pos: 1 });
        assert_eq!(parse("CC)").unwrap_err(), SmilesError::UnbalancedBranch { pos: 2 });
        assert_eq!(parse("C(C").unwrap_err(), SmilesError::UnclosedBranch(1));
        assert_eq!(parse("C1CC").unwrap_err(), SmilesError::UnclosedRing(1));
        assert_eq!(parse("C11").unwrap_err(), SmilesError::SelfBond { label: 1 });
        assert_eq!(parse("C12CC12").unwrap_err(), SmilesError::DuplicateBond { label: 2 });
        assert_eq!(parse("C=1CC#1").unwrap_err(), SmilesError::ConflictingRingBond { label: 1 });
        assert!(matches!(parse("c1ccccc1"), Err(SmilesError::UnexpectedChar { .. })));
        assert!(matches!(parse("CC.O"), Err(SmilesError::UnexpectedChar { .. })));
    }
}
