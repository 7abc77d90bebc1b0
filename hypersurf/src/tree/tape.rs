//! Flat evaluation tapes
use super::{Axis, BinaryOpcode, Tree, TreeOp, UnaryOpcode};
use crate::eval::{EvalError, ScalarFunction};
use std::collections::HashMap;

/// Single tape instruction
///
/// Each instruction writes to the slot matching its own index in the tape, and
/// reads only from earlier slots.
#[derive(Copy, Clone, Debug, PartialEq)]
enum TapeOp {
    Input(Axis),
    Const(f64),
    Unary(UnaryOpcode, u32),
    Binary(BinaryOpcode, u32, u32),
}

/// A [`Tree`] flattened into a linear sequence of operations
///
/// Construction deduplicates shared subtrees (by pointer) and folds constant
/// subexpressions.  The last instruction is the output.
///
/// Evaluation treats any `NaN` as a domain error, e.g. `sqrt(-1)` or
/// `asin(2)`; infinities are allowed through.
#[derive(Clone, Debug)]
pub struct Tape {
    ops: Vec<TapeOp>,
}

impl Tape {
    /// Flattens a tree into a tape
    pub fn new(tree: &Tree) -> Self {
        let mut builder = TapeBuilder::default();
        let out = builder.push(tree);
        builder.slot(out);
        Self { ops: builder.ops }
    }

    /// Returns the number of instructions in the tape
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Checks whether the tape is empty (which should never be the case)
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Returns the constant value of this tape, if it doesn't depend on inputs
    pub fn as_constant(&self) -> Option<f64> {
        match self.ops.as_slice() {
            [TapeOp::Const(v)] => Some(*v),
            _ => None,
        }
    }
}

/// Value of a subtree during flattening
///
/// Constants stay symbolic until something non-constant consumes them, so
/// folded subexpressions never leave dead instructions behind.
#[derive(Copy, Clone)]
enum Operand {
    Const(f64),
    Slot(u32),
}

#[derive(Default)]
struct TapeBuilder {
    ops: Vec<TapeOp>,
    seen: HashMap<*const TreeOp, Operand>,
    consts: HashMap<u64, u32>,
    inputs: HashMap<Axis, u32>,
}

impl TapeBuilder {
    /// Pushes a tree, returning its folded value or the slot that holds it
    ///
    /// Trees built from scripts are shallow enough (Rhai caps expression
    /// depth) that recursion here is fine.
    fn push(&mut self, tree: &Tree) -> Operand {
        if let Some(v) = self.seen.get(&tree.as_ptr()) {
            return *v;
        }
        let v = match &**tree {
            TreeOp::Input(axis) => {
                let i = match self.inputs.get(axis) {
                    Some(i) => *i,
                    None => {
                        let i = self.emit(TapeOp::Input(*axis));
                        self.inputs.insert(*axis, i);
                        i
                    }
                };
                Operand::Slot(i)
            }
            TreeOp::Const(v) => Operand::Const(*v),
            TreeOp::Unary(op, a) => match self.push(a) {
                Operand::Const(a) if !op.apply(a).is_nan() => {
                    Operand::Const(op.apply(a))
                }
                a => {
                    let a = self.slot(a);
                    Operand::Slot(self.emit(TapeOp::Unary(*op, a)))
                }
            },
            TreeOp::Binary(op, a, b) => {
                match (self.push(a), self.push(b)) {
                    (Operand::Const(a), Operand::Const(b))
                        if !op.apply(a, b).is_nan() =>
                    {
                        Operand::Const(op.apply(a, b))
                    }
                    (a, b) => {
                        let a = self.slot(a);
                        let b = self.slot(b);
                        Operand::Slot(self.emit(TapeOp::Binary(*op, a, b)))
                    }
                }
            }
        };
        self.seen.insert(tree.as_ptr(), v);
        v
    }

    /// Materializes an operand into a slot
    fn slot(&mut self, v: Operand) -> u32 {
        match v {
            Operand::Slot(i) => i,
            Operand::Const(c) => match self.consts.get(&c.to_bits()) {
                Some(i) => *i,
                None => {
                    let i = self.emit(TapeOp::Const(c));
                    self.consts.insert(c.to_bits(), i);
                    i
                }
            },
        }
    }

    fn emit(&mut self, op: TapeOp) -> u32 {
        let i = self.ops.len() as u32;
        self.ops.push(op);
        i
    }
}

impl ScalarFunction for Tape {
    fn eval(&self, x: f64, y: f64, z: f64, t: f64) -> Result<f64, EvalError> {
        let mut out = [0.0];
        self.eval_slice(&[x], &[y], &[z], t, &mut out)?;
        Ok(out[0])
    }

    /// Evaluates the tape one instruction at a time across the whole slice
    fn eval_slice(
        &self,
        xs: &[f64],
        ys: &[f64],
        zs: &[f64],
        t: f64,
        out: &mut [f64],
    ) -> Result<(), EvalError> {
        let n = out.len();
        if xs.len() != n || ys.len() != n || zs.len() != n {
            return Err(EvalError::new(format!(
                "mismatched slice lengths ({}, {}, {}, {n})",
                xs.len(),
                ys.len(),
                zs.len()
            )));
        }
        if n == 0 {
            return Ok(());
        }

        let mut slots = vec![0.0; self.ops.len() * n];
        for (i, op) in self.ops.iter().enumerate() {
            let (prev, rest) = slots.split_at_mut(i * n);
            let prev: &[f64] = prev;
            let v = &mut rest[..n];
            let slot = move |j: u32| &prev[j as usize * n..][..n];
            match *op {
                TapeOp::Input(Axis::X) => v.copy_from_slice(xs),
                TapeOp::Input(Axis::Y) => v.copy_from_slice(ys),
                TapeOp::Input(Axis::Z) => v.copy_from_slice(zs),
                TapeOp::Input(Axis::T) => v.fill(t),
                TapeOp::Const(c) => v.fill(c),
                TapeOp::Unary(op, a) => {
                    for (v, a) in v.iter_mut().zip(slot(a)) {
                        *v = op.apply(*a);
                    }
                }
                TapeOp::Binary(op, a, b) => {
                    for ((v, a), b) in v.iter_mut().zip(slot(a)).zip(slot(b)) {
                        *v = op.apply(*a, *b);
                    }
                }
            }
            if let Some(k) = v.iter().position(|v| v.is_nan()) {
                let what = match op {
                    TapeOp::Unary(op, _) => format!("{op} is undefined here"),
                    TapeOp::Binary(op, _, _) => {
                        format!("{op} is undefined here")
                    }
                    TapeOp::Input(axis) => format!("input {axis} is NaN"),
                    TapeOp::Const(..) => "expression is NaN".to_owned(),
                };
                return Err(EvalError::at(what, [xs[k], ys[k], zs[k], t]));
            }
        }

        let last = slots.len() - n;
        out.copy_from_slice(&slots[last..]);
        Ok(())
    }
}
