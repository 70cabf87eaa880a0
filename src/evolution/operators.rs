//! Variation operators over SMILES encodings.
//!
//! Both operators edit the raw string and keep the edit only if the oracle
//! still decodes it; otherwise the parent is returned untouched.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::oracle::Oracle;

use super::Individual;

/// Single-point crossover with validity fallback.
///
/// Parents of unequal length (or shorter than two characters) are returned
/// unchanged. Otherwise the suffixes after a split point in `[1, len - 1]`
/// are swapped, and each child that fails to decode reverts to its parent.
pub fn crossover<O, R>(
    a: &Individual,
    b: &Individual,
    oracle: &O,
    rng: &mut R,
) -> (Individual, Individual)
where
    O: Oracle + ?Sized,
    R: Rng + ?Sized,
{
    let len = a.encoding.chars().count();
    if len != b.encoding.chars().count() || len < 2 {
        return (a.clone(), b.clone());
    }

    let point = rng.gen_range(1..len);
    let (a_head, a_tail) = split_at_char(&a.encoding, point);
    let (b_head, b_tail) = split_at_char(&b.encoding, point);

    let first = accept_or_revert(a, format!("{a_head}{b_tail}"), oracle);
    let second = accept_or_revert(b, format!("{b_head}{a_tail}"), oracle);
    (first, second)
}

/// Point mutation with validity fallback.
///
/// Replaces one character, chosen uniformly, with a symbol drawn uniformly
/// from `alphabet`. Multi-character symbols lengthen the encoding.
pub fn mutate<O, R, S>(
    individual: &Individual,
    alphabet: &[S],
    oracle: &O,
    rng: &mut R,
) -> Individual
where
    O: Oracle + ?Sized,
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    let len = individual.encoding.chars().count();
    if len == 0 {
        return individual.clone();
    }

    let index = rng.gen_range(0..len);
    let Some(symbol) = alphabet.choose(rng) else {
        return individual.clone();
    };

    let mutant: String = individual
        .encoding
        .chars()
        .take(index)
        .chain(symbol.as_ref().chars())
        .chain(individual.encoding.chars().skip(index + 1))
        .collect();

    accept_or_revert(individual, mutant, oracle)
}

/// Keep `candidate` if it decodes, else the parent.
///
/// A candidate equal to its parent keeps the parent's cached fitness.
fn accept_or_revert<O: Oracle + ?Sized>(
    parent: &Individual,
    candidate: String,
    oracle: &O,
) -> Individual {
    if candidate == parent.encoding {
        return parent.clone();
    }
    if oracle.is_valid(&candidate) {
        Individual::new(candidate)
    } else {
        log::trace!("Reverting {candidate:?} to {:?}", parent.encoding);
        parent.clone()
    }
}

/// Split at a character (not byte) offset.
fn split_at_char(s: &str, chars: usize) -> (&str, &str) {
    let byte = s.char_indices().nth(chars).map_or(s.len(), |(i, _)| i);
    s.split_at(byte)
}
