//! Rhai bindings for compiling equations
//!
//! Equations are evaluated once by [Rhai](https://rhai.rs), with `x`, `y`,
//! `z`, and `t` bound to symbolic [`Tree`] handles; operator overloads build a
//! math tree, which is then flattened into a [`Tape`] for fast evaluation.
//! The script engine is never involved in per-point evaluation.
//!
//! ```
//! use hypersurf::{eval::ScalarFunction, rhai};
//!
//! let tape = rhai::compile("x^2 + y^2 + z^2 - 4")?;
//! assert_eq!(tape.eval(-4.0, -4.0, -4.0, 0.0)?, 44.0);
//! # Ok::<(), hypersurf::Error>(())
//! ```
//!
//! Input text uses conventional math notation (see [`dialect::normalize`]):
//! `^` is exponentiation, and all numbers are floating-point.  The constants
//! in [`constants::CONSTANTS`] are predefined, along with these functions:
//! `sin cos tan asin acos atan sinh cosh tanh exp ln log log10 log2 sqrt cbrt
//! abs square floor ceil round sign` (one argument) and
//! `min max atan2 pow mod` (two arguments).
//!
//! Nesting is bounded: an expression more than 64 levels deep (counting
//! function calls and parentheses) fails with [`Error::Compile`].
use std::sync::Arc;

use crate::{
    Error,
    eval::{Compiler, ScalarFunction},
    tree::{BinaryOpcode, Tape, Tree, UnaryOpcode},
};
use rhai::{Dynamic, EvalAltResult};

pub mod constants;
pub mod dialect;

/// Equation compiler backed by a Rhai engine
pub struct ScriptCompiler {
    engine: rhai::Engine,
}

impl Default for ScriptCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptCompiler {
    /// Constructs a script engine with math-tree bindings
    pub fn new() -> Self {
        let mut engine = rhai::Engine::new();
        engine.register_type_with_name::<Tree>("Tree");

        macro_rules! register_binary_ops {
            ($op:literal, $name:ident, $engine:ident) => {
                $engine.register_fn($op, $name::node_dyn);
                $engine.register_fn($op, $name::dyn_node);
            };
        }
        macro_rules! register_binary_fns {
            ($op:literal, $name:ident, $engine:ident) => {
                register_binary_ops!($op, $name, $engine);
                $engine.register_fn($op, $name::float_float);
            };
        }
        macro_rules! register_unary_fns {
            ($op:literal, $name:ident, $engine:ident) => {
                $engine.register_fn($op, $name::node);
                $engine.register_fn($op, $name::float);
            };
        }

        register_binary_ops!("+", add, engine);
        register_binary_ops!("-", sub, engine);
        register_binary_ops!("*", mul, engine);
        register_binary_ops!("/", div, engine);
        register_binary_ops!("**", pow, engine);
        register_binary_fns!("%", modulo, engine);
        register_binary_fns!("mod", modulo, engine);
        register_binary_fns!("pow", pow, engine);
        register_binary_fns!("min", min, engine);
        register_binary_fns!("max", max, engine);
        register_binary_fns!("atan2", atan2, engine);
        register_unary_fns!("abs", abs, engine);
        register_unary_fns!("sqrt", sqrt, engine);
        register_unary_fns!("cbrt", cbrt, engine);
        register_unary_fns!("square", square, engine);
        register_unary_fns!("sin", sin, engine);
        register_unary_fns!("cos", cos, engine);
        register_unary_fns!("tan", tan, engine);
        register_unary_fns!("asin", asin, engine);
        register_unary_fns!("acos", acos, engine);
        register_unary_fns!("atan", atan, engine);
        register_unary_fns!("sinh", sinh, engine);
        register_unary_fns!("cosh", cosh, engine);
        register_unary_fns!("tanh", tanh, engine);
        register_unary_fns!("exp", exp, engine);
        register_unary_fns!("ln", ln, engine);
        register_unary_fns!("log", ln, engine);
        register_unary_fns!("log10", log10, engine);
        register_unary_fns!("log2", log2, engine);
        register_unary_fns!("floor", floor, engine);
        register_unary_fns!("ceil", ceil, engine);
        register_unary_fns!("round", round, engine);
        register_unary_fns!("sign", sign, engine);
        engine.register_fn("-", neg::node);

        engine.set_fast_operators(false);
        engine.set_max_expr_depths(64, 32);

        Self { engine }
    }

    /// Evaluates a single expression, in terms of `x`, `y`, `z`, and `t`
    ///
    /// The text is normalized from math notation first.
    pub fn eval(&self, text: &str) -> Result<Tree, Error> {
        let script = dialect::normalize(text);

        let mut scope = rhai::Scope::new();
        scope.push_constant("x", Tree::x());
        scope.push_constant("y", Tree::y());
        scope.push_constant("z", Tree::z());
        scope.push_constant("t", Tree::t());
        for (name, value) in constants::CONSTANTS {
            scope.push_constant(*name, *value);
        }

        let out = self
            .engine
            .eval_expression_with_scope::<Dynamic>(&mut scope, &script)?;
        Ok(to_tree(out, "expression")?)
    }
}

impl Compiler for ScriptCompiler {
    fn compile(&mut self, text: &str) -> Result<Arc<dyn ScalarFunction>, Error> {
        let tree = self.eval(text)?;
        Ok(Arc::new(Tape::new(&tree)))
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Converts a script value into a tree, accepting numbers and trees
fn to_tree(v: Dynamic, what: &str) -> Result<Tree, Box<EvalAltResult>> {
    if let Some(t) = v.clone().try_cast::<Tree>() {
        Ok(t)
    } else if let Some(f) = v.clone().try_cast::<f64>() {
        Ok(Tree::constant(f))
    } else if let Some(i) = v.clone().try_cast::<i64>() {
        Ok(Tree::constant(i as f64))
    } else {
        let e = format!("{what} must be a number, not {}", v.type_name());
        Err(e.into())
    }
}

macro_rules! define_binary_fns {
    ($name:ident, $op:ident) => {
        mod $name {
            use super::*;
            pub fn node_dyn(
                a: Tree,
                b: Dynamic,
            ) -> Result<Tree, Box<EvalAltResult>> {
                let what = concat!("right-hand side of ", stringify!($name));
                let b = to_tree(b, what)?;
                Ok(Tree::op_binary(a, b, BinaryOpcode::$op))
            }
            pub fn dyn_node(
                a: Dynamic,
                b: Tree,
            ) -> Result<Tree, Box<EvalAltResult>> {
                let what = concat!("left-hand side of ", stringify!($name));
                let a = to_tree(a, what)?;
                Ok(Tree::op_binary(a, b, BinaryOpcode::$op))
            }
            #[allow(dead_code)]
            pub fn float_float(a: f64, b: f64) -> Tree {
                Tree::op_binary(a.into(), b.into(), BinaryOpcode::$op)
            }
        }
    };
}

macro_rules! define_unary_fns {
    ($name:ident, $op:ident) => {
        mod $name {
            use super::*;
            pub fn node(a: Tree) -> Tree {
                Tree::op_unary(a, UnaryOpcode::$op)
            }
            #[allow(dead_code)]
            pub fn float(a: f64) -> Tree {
                Tree::op_unary(a.into(), UnaryOpcode::$op)
            }
        }
    };
}

define_binary_fns!(add, Add);
define_binary_fns!(sub, Sub);
define_binary_fns!(mul, Mul);
define_binary_fns!(div, Div);
define_binary_fns!(modulo, Mod);
define_binary_fns!(pow, Pow);
define_binary_fns!(min, Min);
define_binary_fns!(max, Max);
define_binary_fns!(atan2, Atan2);
define_unary_fns!(neg, Neg);
define_unary_fns!(abs, Abs);
define_unary_fns!(sqrt, Sqrt);
define_unary_fns!(cbrt, Cbrt);
define_unary_fns!(square, Square);
define_unary_fns!(sin, Sin);
define_unary_fns!(cos, Cos);
define_unary_fns!(tan, Tan);
define_unary_fns!(asin, Asin);
define_unary_fns!(acos, Acos);
define_unary_fns!(atan, Atan);
define_unary_fns!(sinh, Sinh);
define_unary_fns!(cosh, Cosh);
define_unary_fns!(tanh, Tanh);
define_unary_fns!(exp, Exp);
define_unary_fns!(ln, Ln);
define_unary_fns!(log10, Log10);
define_unary_fns!(log2, Log2);
define_unary_fns!(floor, Floor);
define_unary_fns!(ceil, Ceil);
define_unary_fns!(round, Round);
define_unary_fns!(sign, Sign);

////////////////////////////////////////////////////////////////////////////////

/// One-shot compilation of a single expression, in terms of `x, y, z, t`
pub fn compile(s: &str) -> Result<Tape, Error> {
    let engine = ScriptCompiler::new();
    let tree = engine.eval(s)?;
    Ok(Tape::new(&tree))
}

////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn eval_at(s: &str, x: f64, y: f64, z: f64, t: f64) -> f64 {
        compile(s).unwrap().eval(x, y, z, t).unwrap()
    }

    #[test]
    fn test_sphere() {
        let tape = compile("x^2+y^2+z^2-4").unwrap();
        assert_eq!(tape.eval(-4.0, -4.0, -4.0, 0.0).unwrap(), 44.0);
        assert_eq!(tape.eval(0.0, 0.0, 0.0, 0.0).unwrap(), -4.0);
    }

    #[test]
    fn test_float_division() {
        assert_eq!(eval_at("1/2 + x", 0.0, 0.0, 0.0, 0.0), 0.5);
        assert_eq!(eval_at("x / 2", 3.0, 0.0, 0.0, 0.0), 1.5);
    }

    #[test]
    fn test_mixed_operands() {
        assert_eq!(eval_at("2 * x", 3.0, 0.0, 0.0, 0.0), 6.0);
        assert_eq!(eval_at("x * 2", 3.0, 0.0, 0.0, 0.0), 6.0);
        assert_eq!(eval_at("10 - x", 3.0, 0.0, 0.0, 0.0), 7.0);
        assert_eq!(eval_at("x - y", 3.0, 1.0, 0.0, 0.0), 2.0);
        assert_eq!(eval_at("-x", 3.0, 0.0, 0.0, 0.0), -3.0);
        assert_eq!(eval_at("pow(x, 3)", 2.0, 0.0, 0.0, 0.0), 8.0);
        assert_eq!(eval_at("min(x, y)", 2.0, 1.0, 0.0, 0.0), 1.0);
        assert_eq!(eval_at("max(2, x)", 1.0, 0.0, 0.0, 0.0), 2.0);
        assert_eq!(eval_at("x % 3", 5.0, 0.0, 0.0, 0.0), 2.0);
    }

    #[test]
    fn test_functions_of_time() {
        let t = std::f64::consts::FRAC_PI_2;
        assert_relative_eq!(eval_at("sin(t) * x", 2.0, 0.0, 0.0, t), 2.0);
        let pulse = "x^2 + y^2 + z^2 - (2 + sin(t))^2";
        assert_relative_eq!(eval_at(pulse, 3.0, 0.0, 0.0, 0.0), 5.0);
    }

    #[test]
    fn test_constants() {
        let tape = compile("2 * pi").unwrap();
        assert_eq!(tape.as_constant(), Some(std::f64::consts::TAU));
        assert_relative_eq!(eval_at("cos(pi)", 0.0, 0.0, 0.0, 0.0), -1.0);
        assert_relative_eq!(eval_at("ln(e) + x", 0.0, 0.0, 0.0, 0.0), 1.0);
    }

    #[test]
    fn test_syntax_error() {
        let err = compile("sin(x +").unwrap_err();
        assert!(matches!(err, Error::Compile { .. }), "{err}");
    }

    #[test]
    fn test_unknown_variable() {
        let err = compile("x + w").unwrap_err();
        assert!(matches!(err, Error::Compile { .. }), "{err}");
    }

    #[test]
    fn test_unknown_function() {
        let err = compile("frobnicate(x)").unwrap_err();
        assert!(matches!(err, Error::Compile { .. }), "{err}");
    }

    #[test]
    fn test_non_numeric_result() {
        let err = compile("\"hello\"").unwrap_err();
        assert!(matches!(err, Error::Compile { .. }), "{err}");
    }

    #[test]
    fn test_domain_error() {
        let tape = compile("sqrt(x)").unwrap();
        assert_eq!(tape.eval(4.0, 0.0, 0.0, 0.0).unwrap(), 2.0);
        assert!(tape.eval(-1.0, 0.0, 0.0, 0.0).is_err());
    }

    #[test]
    fn test_nesting_limit() {
        let nest = |n: usize| format!("{}x{}", "sin(".repeat(n), ")".repeat(n));
        assert!(compile(&nest(8)).is_ok());
        let err = compile(&nest(100)).unwrap_err();
        assert!(matches!(err, Error::Compile { .. }), "{err}");
    }

    #[test]
    fn test_compiler_trait() {
        let mut c = ScriptCompiler::new();
        let f = c.compile("z - 0.5*sin(x + t)*cos(y + t)").unwrap();
        assert_eq!(f.eval(0.0, 0.0, 1.0, 0.0).unwrap(), 1.0);
    }
}
