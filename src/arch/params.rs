use std::{fmt, mem, ops::Range};

use ndarray::{ArrayView1, ArrayView2};

use crate::{CaErr, Result};

/// The three parameter tensors an autoencoder owns. The decoder weights are not here, they are
/// the transpose of `Weights`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Weights,
    HiddenBias,
    VisibleBias,
}
use ParamKind::*;

impl ParamKind {
    /// Every kind, in the canonical flat layout order `[W | b_h | b_v]`.
    pub const ALL: [ParamKind; 3] = [Weights, HiddenBias, VisibleBias];

    /// Returns the amount of scalars this kind of parameter holds.
    pub fn len(self, n_visible: usize, n_hidden: usize) -> usize {
        match self {
            Weights => n_visible * n_hidden,
            HiddenBias => n_hidden,
            VisibleBias => n_visible,
        }
    }

    /// Returns where this kind of parameter lives inside a canonical flat buffer.
    pub fn range(self, n_visible: usize, n_hidden: usize) -> Range<usize> {
        let w = Weights.len(n_visible, n_hidden);

        match self {
            Weights => 0..w,
            HiddenBias => w..w + n_hidden,
            VisibleBias => w + n_hidden..w + n_hidden + n_visible,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Weights => "weights",
            HiddenBias => "hidden bias",
            VisibleBias => "visible bias",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Manages the parameters of an autoencoder.
///
/// The parameters are borrowed from whoever owns them, each tensor possibly from a different
/// owner. This is how several autoencoders share a weight matrix: the owner lends the same buffer
/// to each model's manager in turn. Since the manager holds `&mut` slices, two managers can't hold
/// the same buffer at the same time.
pub struct ParamManager<'p> {
    n_visible: usize,
    n_hidden: usize,
    params: [Option<&'p mut [f64]>; 3],
}

impl<'p> ParamManager<'p> {
    /// Creates a new empty `ParamManager`.
    ///
    /// # Arguments
    /// * `n_visible` - The amount of visible units.
    /// * `n_hidden` - The amount of hidden units.
    ///
    /// # Returns
    /// A new `ParamManager` instance.
    pub fn new(n_visible: usize, n_hidden: usize) -> Self {
        Self {
            n_visible,
            n_hidden,
            params: [None, None, None],
        }
    }

    /// Creates a new `ParamManager` over a single buffer laid out as `[W | b_h | b_v]`.
    ///
    /// # Arguments
    /// * `n_visible` - The amount of visible units.
    /// * `n_hidden` - The amount of hidden units.
    /// * `params` - The whole parameter buffer.
    ///
    /// # Returns
    /// A full `ParamManager` or an error if the buffer has the wrong length.
    pub fn from_flat(n_visible: usize, n_hidden: usize, params: &'p mut [f64]) -> Result<Self> {
        let expected: usize = ParamKind::ALL
            .iter()
            .map(|kind| kind.len(n_visible, n_hidden))
            .sum();

        if params.len() != expected {
            return Err(CaErr::SizeMismatch {
                what: "params",
                got: params.len(),
                expected,
            });
        }

        let mut manager = Self::new(n_visible, n_hidden);
        let mut rest = params;

        for kind in ParamKind::ALL {
            let (head, tail) = mem::take(&mut rest).split_at_mut(kind.len(n_visible, n_hidden));
            manager.add(kind, head)?;
            rest = tail;
        }

        Ok(manager)
    }

    /// Lends a parameter tensor to this manager.
    ///
    /// # Arguments
    /// * `kind` - Which tensor `params` holds.
    /// * `params` - The raw tensor, row major for the weights.
    ///
    /// # Returns
    /// An error if the length doesn't match the kind or the slot was already taken.
    pub fn add(&mut self, kind: ParamKind, params: &'p mut [f64]) -> Result<()> {
        let expected = kind.len(self.n_visible, self.n_hidden);

        if params.len() != expected {
            return Err(CaErr::SizeMismatch {
                what: kind.name(),
                got: params.len(),
                expected,
            });
        }

        let slot = &mut self.params[kind.index()];

        if slot.is_some() {
            return Err(CaErr::ParamsAlreadySet { kind });
        }

        *slot = Some(params);
        Ok(())
    }

    /// Gives a read only view of the parameters.
    ///
    /// # Returns
    /// The view, or an error if any of the tensors is missing.
    pub fn view(&self) -> Result<ParamView<'_>> {
        let shape = (self.n_visible, self.n_hidden);

        Ok(ParamView {
            w: ArrayView2::from_shape(shape, self.slot(Weights)?)?,
            b_h: ArrayView1::from_shape(self.n_hidden, self.slot(HiddenBias)?)?,
            b_v: ArrayView1::from_shape(self.n_visible, self.slot(VisibleBias)?)?,
        })
    }

    /// Gives the raw tensors for an optimizer to write to, in `ParamKind::ALL` order.
    ///
    /// # Returns
    /// The tensors, or an error if any of them is missing.
    pub fn slots_mut(&mut self) -> Result<[&mut [f64]; 3]> {
        let [w, b_h, b_v] = &mut self.params;

        Ok([
            w.as_deref_mut()
                .ok_or(CaErr::MissingParams { kind: Weights })?,
            b_h.as_deref_mut()
                .ok_or(CaErr::MissingParams { kind: HiddenBias })?,
            b_v.as_deref_mut()
                .ok_or(CaErr::MissingParams { kind: VisibleBias })?,
        ])
    }

    fn slot(&self, kind: ParamKind) -> Result<&[f64]> {
        self.params[kind.index()]
            .as_deref()
            .ok_or(CaErr::MissingParams { kind })
    }
}

/// A read only view of an autoencoder's parameters.
#[derive(Clone, Copy)]
pub struct ParamView<'a> {
    w: ArrayView2<'a, f64>,
    b_h: ArrayView1<'a, f64>,
    b_v: ArrayView1<'a, f64>,
}

impl<'a> ParamView<'a> {
    /// The encoder weights, shaped `(n_visible, n_hidden)`.
    pub fn w(&self) -> ArrayView2<'a, f64> {
        self.w
    }

    /// The decoder weights. Always the live transpose of `w`, never a copy.
    pub fn w_prime(&self) -> ArrayView2<'a, f64> {
        self.w.reversed_axes()
    }

    pub fn b_h(&self) -> ArrayView1<'a, f64> {
        self.b_h
    }

    pub fn b_v(&self) -> ArrayView1<'a, f64> {
        self.b_v
    }

    /// Copies the parameters into a new buffer laid out as `[W | b_h | b_v]`.
    pub fn to_flat(&self) -> Vec<f64> {
        self.w
            .iter()
            .chain(&self.b_h)
            .chain(&self.b_v)
            .copied()
            .collect()
    }
}
