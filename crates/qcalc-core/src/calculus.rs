// crates/qcalc-core/src/calculus.rs

//! The relation algebra (spec.md §3 "Calculus", §4.B).
//!
//! A [`Calculus`] owns the base-relation vocabulary and the converse/
//! composition tables, and exposes the label-level operations (`compose`,
//! `converse`, `complement`) that everything else in the workspace is built
//! on. It is immutable once constructed and safe to share across closure
//! calls (spec.md §5).

use crate::bits::{self, popcount};
use crate::error::{Error, Result};
use indexmap::IndexMap;

/// A subset of base relations, represented as a bitmask of width `k`
/// (spec.md §3). Bit `i` corresponds to the `i`-th base relation in
/// declaration order.
pub type Label = u32;

/// The empty label: no relation is possible (inconsistency).
pub const EMPTY: Label = 0;

/// Maximum number of base relations a [`Calculus`] can encode; bounded by
/// the width of [`Label`].
pub const MAX_BASES: usize = Label::BITS as usize;

/// Owns the base-relation vocabulary plus the converse and composition
/// tables, and provides the pure label operations of spec.md §4.B.
#[derive(Clone, Debug)]
pub struct Calculus {
    base_names: Vec<String>,
    name_to_bit: IndexMap<String, Label>,
    /// `converse_base[i]` = converse of the base relation at bit `i`.
    converse_base: Vec<Label>,
    /// `composition_base[i][j]` = composition of bases `i` and `j`, as a
    /// (possibly multi-bit) label.
    composition_base: Vec<Vec<Label>>,
    universe: Label,
}

impl Calculus {
    /// Build a calculus from parsed tables (spec.md §4.B construction steps
    /// 1–3). `base_names` declares the bit order; `converse_base` and
    /// `composition_base` are keyed by base-relation name.
    ///
    /// # Errors
    /// Returns [`Error::MalformedCalculus`] if any name is unknown, the
    /// converse table is not a total involution on declared bases, or the
    /// composition table is not total on `base_names × base_names`.
    pub fn new(
        base_names: Vec<String>,
        converse: &std::collections::HashMap<String, String>,
        composition: &std::collections::HashMap<(String, String), Vec<String>>,
    ) -> Result<Self> {
        if base_names.is_empty() {
            return Err(Error::MalformedCalculus(
                "calculus declares no base relations".into(),
            ));
        }
        if base_names.len() > MAX_BASES {
            return Err(Error::MalformedCalculus(format!(
                "calculus declares {} base relations, exceeds the {}-bit label width",
                base_names.len(),
                MAX_BASES
            )));
        }

        let mut name_to_bit = IndexMap::with_capacity(base_names.len());
        for (idx, name) in base_names.iter().enumerate() {
            if name_to_bit.insert(name.clone(), 1u32 << idx).is_some() {
                return Err(Error::MalformedCalculus(format!(
                    "duplicate base relation name: {name}"
                )));
            }
        }

        let encode_name = |name: &str| -> Result<Label> {
            name_to_bit
                .get(name)
                .copied()
                .ok_or_else(|| Error::MalformedCalculus(format!("unknown base relation: {name}")))
        };

        let mut converse_base = vec![None; base_names.len()];
        for name in &base_names {
            let target = converse.get(name).ok_or_else(|| {
                Error::MalformedCalculus(format!("missing converse entry for: {name}"))
            })?;
            let idx = encode_name(name)?.trailing_zeros() as usize;
            converse_base[idx] = Some(encode_name(target)?);
        }
        let converse_base: Vec<Label> = converse_base
            .into_iter()
            .enumerate()
            .map(|(idx, v)| {
                v.ok_or_else(|| {
                    Error::MalformedCalculus(format!(
                        "converse table missing entry for bit {idx}"
                    ))
                })
            })
            .collect::<Result<_>>()?;

        // Involution check: converse(converse(b)) == b for every base b.
        for (idx, &conv) in converse_base.iter().enumerate() {
            let conv_idx = conv.trailing_zeros() as usize;
            if converse_base[conv_idx] != (1u32 << idx) {
                return Err(Error::MalformedCalculus(format!(
                    "converse table is not an involution at {}",
                    base_names[idx]
                )));
            }
        }

        let n = base_names.len();
        let mut composition_base = vec![vec![None; n]; n];
        for (i, name_i) in base_names.iter().enumerate() {
            for (j, name_j) in base_names.iter().enumerate() {
                let rhs = composition.get(&(name_i.clone(), name_j.clone())).ok_or_else(|| {
                    Error::MalformedCalculus(format!(
                        "composition table missing entry for ({name_i}, {name_j})"
                    ))
                })?;
                let mut label = EMPTY;
                for tok in rhs {
                    label |= encode_name(tok)?;
                }
                composition_base[i][j] = Some(label);
            }
        }
        let composition_base: Vec<Vec<Label>> = composition_base
            .into_iter()
            .map(|row| row.into_iter().map(|v| v.unwrap_or(EMPTY)).collect())
            .collect();

        let universe = if n == MAX_BASES {
            Label::MAX
        } else {
            (1u32 << n) - 1
        };

        Ok(Self {
            base_names,
            name_to_bit,
            converse_base,
            composition_base,
            universe,
        })
    }

    /// Number of base relations `k`.
    #[inline]
    #[must_use]
    pub fn k(&self) -> usize {
        self.base_names.len()
    }

    /// The universe label `(1 << k) - 1`.
    #[inline]
    #[must_use]
    pub const fn universe(&self) -> Label {
        self.universe
    }

    /// Base-relation names in declaration order.
    #[must_use]
    pub fn base_names(&self) -> &[String] {
        &self.base_names
    }

    /// Encode a single base-relation name as a single-bit label.
    ///
    /// # Errors
    /// [`Error::UnknownRelation`] if `name` is not declared.
    pub fn encode(&self, name: &str) -> Result<Label> {
        self.name_to_bit
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownRelation(name.to_string()))
    }

    /// Encode a set of base-relation names as their union.
    ///
    /// # Errors
    /// [`Error::UnknownRelation`] if any name is not declared.
    pub fn encode_set<S: AsRef<str>>(&self, names: impl IntoIterator<Item = S>) -> Result<Label> {
        names
            .into_iter()
            .try_fold(EMPTY, |acc, name| Ok(acc | self.encode(name.as_ref())?))
    }

    /// Decode a label to its constituent base-relation names, in
    /// declaration order.
    #[must_use]
    pub fn decode(&self, label: Label) -> Vec<String> {
        bits::bases(label)
            .into_iter()
            .map(|bit| self.base_names[bit.trailing_zeros() as usize].clone())
            .collect()
    }

    /// Composition `compose(L1, L2)` (spec.md §3/§4.B).
    ///
    /// `compose(L, 0) == compose(0, L) == 0`; `compose(L, U) == U` and
    /// `compose(U, L) == U` whenever `L != 0`.
    #[must_use]
    pub fn compose(&self, l1: Label, l2: Label) -> Label {
        if l1 == EMPTY || l2 == EMPTY {
            return EMPTY;
        }
        if l1 == self.universe || l2 == self.universe {
            return self.universe;
        }
        let mut out = EMPTY;
        for b1 in bits::bases(l1) {
            let i = b1.trailing_zeros() as usize;
            for b2 in bits::bases(l2) {
                let j = b2.trailing_zeros() as usize;
                out |= self.composition_base[i][j];
            }
        }
        out
    }

    /// Converse `converse(L)` (spec.md §3/§4.B). `converse(converse(L)) ==
    /// L` and `converse(EMPTY) == EMPTY`.
    #[must_use]
    pub fn converse(&self, label: Label) -> Label {
        let mut out = EMPTY;
        for b in bits::bases(label) {
            out |= self.converse_base[b.trailing_zeros() as usize];
        }
        out
    }

    /// Complement within the universe. `complement(complement(L)) == L`,
    /// `L | complement(L) == UNIVERSE`, `L & complement(L) == 0`.
    #[inline]
    #[must_use]
    pub const fn complement(&self, label: Label) -> Label {
        self.universe & !label
    }

    /// The base relations composing `label`, as single-bit labels.
    #[must_use]
    pub fn base_relations(&self, label: Label) -> Vec<Label> {
        bits::bases(label)
    }

    /// Number of base relations in `label`.
    #[inline]
    #[must_use]
    pub fn popcount(&self, label: Label) -> u32 {
        popcount(label)
    }
}
