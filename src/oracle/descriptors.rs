//! Molecular descriptors computed from a decoded graph.
//!
//! Lipophilicity uses typed atom contributions in the style of Wildman and
//! Crippen. Drug-likeness is the quantitative estimate of drug-likeness (QED):
//! a weighted geometric mean of desirability functions over eight properties.
//! The alert term counts matched [`Alert`] patterns.

use super::smiles::{Element, MolGraph};

const HYDROGEN_MASS: f64 = 1.008;

/// Raw properties feeding the QED desirability functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MolProperties {
    pub molecular_weight: f64,
    pub logp: f64,
    pub h_bond_acceptors: usize,
    pub h_bond_donors: usize,
    pub polar_surface_area: f64,
    pub rotatable_bonds: usize,
    pub aromatic_rings: usize,
    pub alerts: usize,
}

impl MolProperties {
    /// Compute all properties of a molecule.
    pub fn of(mol: &MolGraph) -> Self {
        let mut acceptors = 0;
        let mut donors = 0;
        for atom in mol.atoms() {
            if matches!(atom.element, Element::N | Element::O) {
                if atom.charge <= 0 {
                    acceptors += 1;
                }
                if atom.hydrogens > 0 {
                    donors += 1;
                }
            }
        }

        Self {
            molecular_weight: molecular_weight(mol),
            logp: crippen_logp(mol),
            h_bond_acceptors: acceptors,
            h_bond_donors: donors,
            polar_surface_area: polar_surface_area(mol),
            rotatable_bonds: rotatable_bonds(mol),
            // Aromatic atoms are outside the parsed subset.
            aromatic_rings: 0,
            alerts: structural_alerts(mol),
        }
    }
}

/// Average molecular weight including hydrogens.
pub fn molecular_weight(mol: &MolGraph) -> f64 {
    let heavy: f64 = mol.atoms().iter().map(|a| a.element.mass()).sum();
    heavy + mol.hydrogen_count() as f64 * HYDROGEN_MASS
}

/// Atom-contribution octanol/water partition coefficient.
pub fn crippen_logp(mol: &MolGraph) -> f64 {
    let mut total = 0.0;

    for (index, atom) in mol.atoms().iter().enumerate() {
        let hydrogens = f64::from(atom.hydrogens);
        let mut hetero_neighbors = 0;
        let mut max_order = 1;
        let mut double_to_hetero = false;
        for (n, bond) in mol.neighbors(index) {
            let neighbor = mol.atoms()[n].element;
            if neighbor != Element::C {
                hetero_neighbors += 1;
                if bond.order == 2 {
                    double_to_hetero = true;
                }
            }
            max_order = max_order.max(bond.order);
        }

        let (heavy, per_h) = match atom.element {
            Element::C => {
                let contribution = if double_to_hetero {
                    -0.2783
                } else if max_order == 3 {
                    0.0017
                } else if max_order == 2 {
                    0.1551
                } else if hetero_neighbors == 0 {
                    if atom.hydrogens >= 2 { 0.1441 } else { 0.0 }
                } else if atom.hydrogens >= 2 {
                    -0.2035
                } else {
                    -0.2051
                };
                (contribution, 0.1230)
            }
            Element::N => {
                let contribution = if atom.charge > 0 {
                    -0.3396
                } else if max_order > 1 {
                    -0.4806
                } else {
                    match atom.hydrogens {
                        0 => -0.3187,
                        1 => -0.7096,
                        _ => -1.0190,
                    }
                };
                (contribution, 0.2142)
            }
            Element::O => {
                let contribution = if atom.charge < 0 {
                    -1.3260
                } else if max_order == 2 {
                    -0.1526
                } else if atom.hydrogens > 0 {
                    -0.2893
                } else {
                    -0.0684
                };
                (contribution, -0.2677)
            }
            Element::S => (0.6482, 0.1230),
            Element::P => (0.8612, 0.1230),
            Element::B => (0.3, 0.1230),
            Element::F => (0.4202, 0.0),
            Element::Cl => (0.6895, 0.0),
            Element::Br => (0.8456, 0.0),
            Element::I => (0.8857, 0.0),
        };

        total += heavy + per_h * hydrogens;
    }

    total
}

/// Topological polar surface area from N and O fragment contributions.
pub fn polar_surface_area(mol: &MolGraph) -> f64 {
    let mut total = 0.0;

    for (index, atom) in mol.atoms().iter().enumerate() {
        let mut singles = 0;
        let mut doubles = 0;
        let mut triples = 0;
        for (_, bond) in mol.neighbors(index) {
            match bond.order {
                1 => singles += 1,
                2 => doubles += 1,
                _ => triples += 1,
            }
        }
        let h = atom.hydrogens;

        total += match (atom.element, atom.charge) {
            (Element::N, 0) => match (singles, doubles, triples, h) {
                (3, 0, 0, 0) => 3.24,
                (2, 0, 0, 1) => 12.03,
                (1, 0, 0, 2) => 26.02,
                (1, 1, 0, 0) => 12.36,
                (0, 1, 0, 1) => 23.85,
                (0, 0, 1, 0) => 23.79,
                _ => 3.24,
            },
            (Element::N, c) if c > 0 => match h {
                0 => 3.01,
                1 => 4.36,
                2 => 13.97,
                _ => 27.64,
            },
            (Element::O, 0) => match (singles, doubles, h) {
                (2, 0, 0) => 9.23,
                (1, 0, 1) => 20.23,
                (0, 1, 0) => 17.07,
                _ => 20.23,
            },
            (Element::O, c) if c < 0 => 23.06,
            _ => 0.0,
        };
    }

    total
}

/// Acyclic single bonds between two non-terminal atoms.
pub fn rotatable_bonds(mol: &MolGraph) -> usize {
    let has_triple = |atom: usize| mol.neighbors(atom).any(|(_, b)| b.order == 3);
    let acyclic = mol.ring_count() == 0;

    mol.bonds()
        .iter()
        .enumerate()
        .filter(|(index, bond)| {
            bond.order == 1
                && mol.degree(bond.a) > 1
                && mol.degree(bond.b) > 1
                && !has_triple(bond.a)
                && !has_triple(bond.b)
                && (acyclic || !mol.is_ring_bond(*index))
        })
        .count()
}

/// Unwanted substructures penalized by the QED alert term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alert {
    /// O-O
    Peroxide,
    /// N-N single bond
    Hydrazine,
    /// S-S
    Disulfide,
    /// N=N
    Azo,
    /// C(=O)X
    AcylHalide,
    /// C(=O)H
    Aldehyde,
    /// Cl, Br or I on a saturated carbon
    AlkylHalide,
    /// C=C-C=O
    MichaelAcceptor,
}

impl Alert {
    pub const ALL: [Alert; 8] = [
        Alert::Peroxide,
        Alert::Hydrazine,
        Alert::Disulfide,
        Alert::Azo,
        Alert::AcylHalide,
        Alert::Aldehyde,
        Alert::AlkylHalide,
        Alert::MichaelAcceptor,
    ];

    /// Whether the pattern occurs anywhere in `mol`.
    pub fn matches(self, mol: &MolGraph) -> bool {
        let atoms = mol.atoms();
        let element = |i: usize| atoms[i].element;
        let bond_between = |x: Element, y: Element, order: u8| {
            mol.bonds().iter().any(|b| {
                b.order == order
                    && ((element(b.a) == x && element(b.b) == y)
                        || (element(b.a) == y && element(b.b) == x))
            })
        };
        // Carbon indices carrying a C=O.
        let carbonyls = || {
            (0..atoms.len()).filter(move |&i| {
                element(i) == Element::C
                    && mol
                        .neighbors(i)
                        .any(|(n, b)| b.order == 2 && element(n) == Element::O)
            })
        };

        match self {
            Alert::Peroxide => bond_between(Element::O, Element::O, 1),
            Alert::Hydrazine => bond_between(Element::N, Element::N, 1),
            Alert::Disulfide => bond_between(Element::S, Element::S, 1),
            Alert::Azo => bond_between(Element::N, Element::N, 2),
            Alert::AcylHalide => carbonyls()
                .any(|c| mol.neighbors(c).any(|(n, _)| element(n).is_halogen())),
            Alert::Aldehyde => carbonyls().any(|c| atoms[c].hydrogens > 0),
            Alert::AlkylHalide => (0..atoms.len()).any(|c| {
                element(c) == Element::C
                    && usize::from(mol.bond_order_sum(c)) == mol.degree(c)
                    && mol.neighbors(c).any(|(n, _)| {
                        element(n).is_halogen() && element(n) != Element::F
                    })
            }),
            Alert::MichaelAcceptor => carbonyls().any(|carbonyl| {
                mol.neighbors(carbonyl).any(|(beta, b)| {
                    b.order == 1
                        && element(beta) == Element::C
                        && mol.neighbors(beta).any(|(alpha, b)| {
                            b.order == 2 && alpha != carbonyl && element(alpha) == Element::C
                        })
                })
            }),
        }
    }
}

/// Number of distinct alert patterns present.
pub fn structural_alerts(mol: &MolGraph) -> usize {
    Alert::ALL.iter().filter(|alert| alert.matches(mol)).count()
}

/// Parameters of an asymmetric double sigmoid desirability function.
struct Desirability {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    e: f64,
    f: f64,
    dmax: f64,
}

impl Desirability {
    const fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64, dmax: f64) -> Self {
        Self {
            a,
            b,
            c,
            d,
            e,
            f,
            dmax,
        }
    }

    fn eval(&self, x: f64) -> f64 {
        let rise = 1.0 + (-(x - self.c + self.d / 2.0) / self.e).exp();
        let fall = 1.0 + (-(x - self.c - self.d / 2.0) / self.f).exp();
        (self.a + self.b / rise * (1.0 - 1.0 / fall)) / self.dmax
    }
}

const MW: Desirability = Desirability::new(
    2.817065973,
    392.5754953,
    290.7489764,
    2.419764353,
    49.22325677,
    65.37051707,
    104.9805561,
);
const ALOGP: Desirability = Desirability::new(
    3.172690585,
    137.8624751,
    2.534937431,
    4.581497897,
    0.822739154,
    0.576295591,
    131.3186604,
);
const HBA: Desirability = Desirability::new(
    2.948620388,
    160.4605972,
    3.615294657,
    4.435986202,
    0.290141953,
    1.300669958,
    148.7763046,
);
const HBD: Desirability = Desirability::new(
    1.618662227,
    1010.051101,
    0.985094388,
    0.000000001,
    0.713820843,
    0.920922555,
    258.1632616,
);
const PSA: Desirability = Desirability::new(
    1.876861559,
    125.2232657,
    62.90773554,
    87.83366614,
    12.01999824,
    28.51324732,
    104.5686167,
);
const ROTB: Desirability = Desirability::new(
    0.010000000,
    272.4121427,
    2.558379970,
    1.566547729,
    1.271567166,
    2.758063707,
    105.4420403,
);
const AROM: Desirability = Desirability::new(
    3.217788970,
    957.7374108,
    2.274627939,
    0.000000001,
    1.317690384,
    0.375760881,
    312.3372610,
);
const ALERTS: Desirability = Desirability::new(
    0.010000000,
    1199.094025,
    -0.09002883,
    0.000000001,
    0.185904477,
    0.875193782,
    417.7253140,
);

/// Mean weights: MW, ALOGP, HBA, HBD, PSA, ROTB, AROM, ALERTS.
const QED_WEIGHTS: [f64; 8] = [0.66, 0.46, 0.05, 0.61, 0.06, 0.65, 0.48, 0.95];

/// Quantitative estimate of drug-likeness in [0, 1].
pub fn qed(props: &MolProperties) -> f64 {
    let desirabilities = [
        MW.eval(props.molecular_weight),
        ALOGP.eval(props.logp),
        HBA.eval(props.h_bond_acceptors as f64),
        HBD.eval(props.h_bond_donors as f64),
        PSA.eval(props.polar_surface_area),
        ROTB.eval(props.rotatable_bonds as f64),
        AROM.eval(props.aromatic_rings as f64),
        ALERTS.eval(props.alerts as f64),
    ];

    let weight_sum: f64 = QED_WEIGHTS.iter().sum();
    let log_sum: f64 = desirabilities
        .iter()
        .zip(QED_WEIGHTS)
        .map(|(d, w)| w * d.max(f64::MIN_POSITIVE).ln())
        .sum();

    (log_sum / weight_sum).exp().clamp(0.0, 1.0)
}
