//! Context-free math trees and the tapes they flatten into
//!
//! A [`Tree`] is built by operator overloading (usually from a script; see
//! [`hypersurf::rhai`](crate::rhai)), then flattened into a [`Tape`] for
//! evaluation.  Trees are cheap to clone and share subexpressions by pointer.
//!
//! ```
//! use hypersurf::{eval::ScalarFunction, tree::{Tape, Tree}};
//!
//! let (x, y, z, _t) = Tree::axes();
//! let sphere = x.square() + y.square() + z.square() - 4.0;
//! let tape = Tape::new(&sphere);
//! assert_eq!(tape.eval(1.0, 1.0, 1.0, 0.0)?, -1.0);
//! # Ok::<(), hypersurf::eval::EvalError>(())
//! ```
use std::sync::Arc;

mod op;
mod tape;

pub use op::{BinaryOpcode, UnaryOpcode};
pub use tape::Tape;

/// Input axis of a scalar field
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[allow(missing_docs)]
pub enum Axis {
    X,
    Y,
    Z,
    T,
}

/// Opcode type for trees
#[derive(Debug)]
#[allow(missing_docs)]
pub enum TreeOp {
    Input(Axis),
    Const(f64),
    Binary(BinaryOpcode, Tree, Tree),
    Unary(UnaryOpcode, Tree),
}

impl From<f64> for Tree {
    fn from(v: f64) -> Tree {
        Tree::constant(v)
    }
}

impl From<Axis> for Tree {
    fn from(a: Axis) -> Tree {
        Tree(Arc::new(TreeOp::Input(a)))
    }
}

/// Owned handle for a standalone math tree
#[derive(Clone, Debug)]
pub struct Tree(Arc<TreeOp>);

impl std::ops::Deref for Tree {
    type Target = TreeOp;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl PartialEq for Tree {
    /// Shallow (pointer) comparison
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}
impl Eq for Tree {}

#[allow(missing_docs)]
impl Tree {
    pub fn x() -> Self {
        Axis::X.into()
    }
    pub fn y() -> Self {
        Axis::Y.into()
    }
    pub fn z() -> Self {
        Axis::Z.into()
    }
    pub fn t() -> Self {
        Axis::T.into()
    }
    /// Returns an `(x, y, z, t)` tuple
    pub fn axes() -> (Self, Self, Self, Self) {
        (Self::x(), Self::y(), Self::z(), Self::t())
    }
    pub fn constant(f: f64) -> Self {
        Tree(Arc::new(TreeOp::Const(f)))
    }
    pub fn op_unary(a: Tree, op: UnaryOpcode) -> Self {
        Tree(Arc::new(TreeOp::Unary(op, a)))
    }
    pub fn op_binary(a: Tree, b: Tree, op: BinaryOpcode) -> Self {
        Tree(Arc::new(TreeOp::Binary(op, a, b)))
    }
    pub fn square(&self) -> Self {
        Self::op_unary(self.clone(), UnaryOpcode::Square)
    }
    pub fn sqrt(&self) -> Self {
        Self::op_unary(self.clone(), UnaryOpcode::Sqrt)
    }
    pub fn neg(&self) -> Self {
        Self::op_unary(self.clone(), UnaryOpcode::Neg)
    }
    pub fn sin(&self) -> Self {
        Self::op_unary(self.clone(), UnaryOpcode::Sin)
    }
    pub fn cos(&self) -> Self {
        Self::op_unary(self.clone(), UnaryOpcode::Cos)
    }
    pub fn ln(&self) -> Self {
        Self::op_unary(self.clone(), UnaryOpcode::Ln)
    }
    pub fn pow<T: Into<Tree>>(&self, other: T) -> Self {
        Self::op_binary(self.clone(), other.into(), BinaryOpcode::Pow)
    }
    pub fn max<T: Into<Tree>>(&self, other: T) -> Self {
        Self::op_binary(self.clone(), other.into(), BinaryOpcode::Max)
    }
    pub fn min<T: Into<Tree>>(&self, other: T) -> Self {
        Self::op_binary(self.clone(), other.into(), BinaryOpcode::Min)
    }

    /// Returns a pointer to the inner [`TreeOp`]
    ///
    /// This can be used as a strong (but not unique) identity.
    pub fn as_ptr(&self) -> *const TreeOp {
        Arc::as_ptr(&self.0)
    }
}

macro_rules! impl_binary {
    ($op:ident, $base_fn:ident) => {
        impl<A: Into<Tree>> std::ops::$op<A> for Tree {
            type Output = Self;

            fn $base_fn(self, other: A) -> Self {
                Self::op_binary(self, other.into(), BinaryOpcode::$op)
            }
        }
        impl std::ops::$op<Tree> for f64 {
            type Output = Tree;
            fn $base_fn(self, other: Tree) -> Tree {
                Tree::op_binary(self.into(), other, BinaryOpcode::$op)
            }
        }
    };
}

impl_binary!(Add, add);
impl_binary!(Sub, sub);
impl_binary!(Mul, mul);
impl_binary!(Div, div);

impl std::ops::Neg for Tree {
    type Output = Tree;
    fn neg(self) -> Tree {
        Tree::op_unary(self, UnaryOpcode::Neg)
    }
}
