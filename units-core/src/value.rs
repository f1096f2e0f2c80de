// This file is part of units, a units-of-measurement conversion library.
// Copyright (C) 2026 Mara Lindqvist
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! The [`Value`] rational-product representation of a unit expression

use crate::atom::CANCELLED;
use crate::{Atom, Error, ErrorKind};

/// Safety backstop on the number of symbolic factors a single `Value` may
/// accumulate. Unlike the historical fixed-size array this guards dynamic
/// growth against pathological recursive definitions rather than ordinary
/// legal products; [`ErrorKind::ProdOverflow`] stays part of the error
/// taxonomy for callers that want to detect it.
pub const MAX_SUBUNITS: usize = 1 << 20;

/// A reduced or partially-reduced unit value: a scalar factor together with
/// two ordered bags of symbolic [`Atom`]s, the numerator and the
/// denominator.
///
/// After canonicalization (see `units-reduce`'s `sort_and_cancel`) both
/// sequences are lexicographically sorted and no atom appears in both; the
/// [`CANCELLED`] sentinel may be interleaved and is ignored by every
/// consumer.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    pub factor: f64,
    numerator: Vec<Atom>,
    denominator: Vec<Atom>,
}

impl Value {
    /// A dimensionless numeric value.
    pub fn number(factor: f64) -> Self {
        Value {
            factor,
            numerator: Vec::new(),
            denominator: Vec::new(),
        }
    }

    /// A single atom with factor 1, e.g. the irreducible body of a primitive
    /// unit.
    pub fn atom(name: impl Into<Atom>) -> Self {
        Value {
            factor: 1.0,
            numerator: vec![name.into()],
            denominator: Vec::new(),
        }
    }

    pub fn numerator(&self) -> &[Atom] {
        &self.numerator
    }

    pub fn denominator(&self) -> &[Atom] {
        &self.denominator
    }

    pub fn numerator_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.numerator
    }

    pub fn denominator_mut(&mut self) -> &mut Vec<Atom> {
        &mut self.denominator
    }

    /// Whether the value carries no symbolic atoms (ignoring cancelled
    /// slots), i.e. it is a plain number.
    pub fn is_dimensionless(&self) -> bool {
        self.numerator.iter().all(Atom::is_cancelled)
            && self.denominator.iter().all(Atom::is_cancelled)
    }

    fn check_capacity(&self) -> Result<(), Error> {
        if self.numerator.len() > MAX_SUBUNITS || self.denominator.len() > MAX_SUBUNITS {
            return Err(Error::new(ErrorKind::ProdOverflow));
        }
        Ok(())
    }

    /// Multiplies `self` by `other` in place, taking ownership of `other`'s
    /// atoms. `other`'s sequences are left empty, mirroring the teacher's
    /// ownership-transfer convention for binary operators.
    pub fn mul_assign(&mut self, mut other: Value) -> Result<(), Error> {
        self.factor *= other.factor;
        self.numerator.append(&mut other.numerator);
        self.denominator.append(&mut other.denominator);
        self.check_capacity()
    }

    /// Divides `self` by `other` in place: multiplies by `other`'s
    /// reciprocal.
    pub fn div_assign(&mut self, other: Value) -> Result<(), Error> {
        self.mul_assign(other.reciprocal())
    }

    /// Returns the reciprocal of this value: factor inverted, numerator and
    /// denominator swapped.
    pub fn reciprocal(mut self) -> Value {
        self.factor = 1.0 / self.factor;
        std::mem::swap(&mut self.numerator, &mut self.denominator);
        self
    }

    /// Raises the value to an integer power by repeated squaring of the
    /// atom bags and `factor.powi`.
    pub fn pow_int(&self, exponent: i32) -> Result<Value, Error> {
        if exponent == 0 {
            return Ok(Value::number(1.0));
        }
        let (base, exponent) = if exponent < 0 {
            (self.clone().reciprocal(), -exponent)
        } else {
            (self.clone(), exponent)
        };
        let mut result = Value::number(1.0);
        for _ in 0..exponent {
            result.mul_assign(base.clone())?;
        }
        Ok(result)
    }

    /// Takes the `n`-th root of this value: `factor` is `self.factor.powf(1.0
    /// / n as f64)` and every atom's multiplicity (numerator minus
    /// denominator occurrences) must be evenly divisible by `n`, else the
    /// root is not expressible as a rational product and
    /// [`ErrorKind::NotRoot`] is returned.
    pub fn nth_root(&self, n: i32) -> Result<Value, Error> {
        if n == 0 {
            return Err(Error::new(ErrorKind::NotRoot));
        }
        if n % 2 == 0 && self.factor < 0.0 {
            return Err(Error::new(ErrorKind::NotANumber));
        }

        let mut tally: std::collections::BTreeMap<&str, i32> = std::collections::BTreeMap::new();
        for atom in self.live_numerator() {
            *tally.entry(atom.as_str()).or_default() += 1;
        }
        for atom in self.live_denominator() {
            *tally.entry(atom.as_str()).or_default() -= 1;
        }

        let mut result = Value::number(self.factor.powf(1.0 / f64::from(n)));
        for (name, count) in tally {
            if count % n != 0 {
                return Err(Error::new(ErrorKind::NotRoot));
            }
            let reduced = count / n;
            if reduced > 0 {
                for _ in 0..reduced {
                    result.numerator.push(Atom::new(name));
                }
            } else {
                for _ in 0..(-reduced) {
                    result.denominator.push(Atom::new(name));
                }
            }
        }
        Ok(result)
    }

    /// Sorts numerator and denominator lexicographically by atom name.
    pub fn sort(&mut self) {
        self.numerator.sort();
        self.denominator.sort();
    }

    /// Cancels atoms that occur in both numerator and denominator. Requires
    /// both sequences to already be sorted (call [`Value::sort`] first).
    /// Cancelled slots are replaced with the [`CANCELLED`] sentinel rather
    /// than removed, so that a single pass suffices.
    pub fn cancel(&mut self) {
        let mut i = 0;
        let mut j = 0;
        while i < self.numerator.len() && j < self.denominator.len() {
            if self.numerator[i].is_cancelled() {
                i += 1;
                continue;
            }
            if self.denominator[j].is_cancelled() {
                j += 1;
                continue;
            }
            match self.numerator[i].as_str().cmp(self.denominator[j].as_str()) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    self.numerator[i] = Atom::cancelled();
                    self.denominator[j] = Atom::cancelled();
                    i += 1;
                    j += 1;
                }
            }
        }
    }

    /// Sorts then cancels; the canonicalization step the reducer performs
    /// once no atom can be rewritten any further.
    pub fn sort_and_cancel(&mut self) {
        self.sort();
        self.cancel();
    }

    /// Non-sentinel atoms in the numerator, in sorted order once
    /// canonicalized.
    pub fn live_numerator(&self) -> impl Iterator<Item = &Atom> {
        self.numerator.iter().filter(|a| !a.is_cancelled())
    }

    /// Non-sentinel atoms in the denominator, in sorted order once
    /// canonicalized.
    pub fn live_denominator(&self) -> impl Iterator<Item = &Atom> {
        self.denominator.iter().filter(|a| !a.is_cancelled())
    }

    /// Replaces the numerator atom at `index` with the cancellation
    /// sentinel, returning the atom that was there.
    pub fn take_numerator(&mut self, index: usize) -> Atom {
        std::mem::replace(&mut self.numerator[index], Atom::cancelled())
    }

    /// Replaces the denominator atom at `index` with the cancellation
    /// sentinel, returning the atom that was there.
    pub fn take_denominator(&mut self, index: usize) -> Atom {
        std::mem::replace(&mut self.denominator[index], Atom::cancelled())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplying_numbers_multiplies_factors() {
        let mut a = Value::number(2.0);
        a.mul_assign(Value::number(3.0)).unwrap();
        assert_eq!(a.factor, 6.0);
        assert!(a.is_dimensionless());
    }

    #[test]
    fn reciprocal_swaps_bags_and_inverts_factor() {
        let v = Value::atom("meter");
        let r = v.reciprocal();
        assert_eq!(r.factor, 1.0);
        assert_eq!(r.denominator(), &[Atom::new("meter")]);
        assert!(r.numerator().is_empty());
    }

    #[test]
    fn cancel_removes_matching_atoms_from_both_sides() {
        let mut v = Value::number(1.0);
        v.numerator_mut().push(Atom::new("meter"));
        v.numerator_mut().push(Atom::new("second"));
        v.denominator_mut().push(Atom::new("meter"));
        v.sort_and_cancel();
        assert_eq!(
            v.live_numerator().cloned().collect::<Vec<_>>(),
            vec![Atom::new("second")]
        );
        assert!(v.live_denominator().next().is_none());
    }

    #[test]
    fn pow_int_repeats_atoms() {
        let v = Value::atom("meter");
        let squared = v.pow_int(2).unwrap();
        assert_eq!(squared.numerator().len(), 2);
        assert_eq!(squared.factor, 1.0);
    }

    #[test]
    fn nth_root_divides_multiplicities() {
        let v = Value::atom("meter").pow_int(2).unwrap();
        let root = v.nth_root(2).unwrap();
        assert_eq!(root.numerator(), &[Atom::new("meter")]);
    }

    #[test]
    fn nth_root_rejects_uneven_exponents() {
        let v = Value::atom("meter").pow_int(3).unwrap();
        assert_eq!(v.nth_root(2).unwrap_err().kind, ErrorKind::NotRoot);
    }

    #[test]
    fn even_root_of_negative_factor_is_not_a_number() {
        let v = Value::number(-4.0);
        assert_eq!(v.nth_root(2).unwrap_err().kind, ErrorKind::NotANumber);
    }
}
