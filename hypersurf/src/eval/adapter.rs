use super::{Compiler, ScalarFunction};
use crate::Error;
use log::debug;
use std::sync::Arc;

/// Returns the left-hand side of an equation `lhs = rhs`, trimmed
///
/// Everything after the first `=` is discarded; the surface is always the zero
/// level set of the left-hand side.  Text without an `=` is returned whole.
pub fn equation_lhs(text: &str) -> &str {
    text.split('=').next().unwrap_or_default().trim()
}

/// Checks a function against the canonical test point `(0, 0, 0, 0)`
pub fn validate(f: &dyn ScalarFunction) -> Result<(), Error> {
    f.eval(0.0, 0.0, 0.0, 0.0)?;
    Ok(())
}

/// Holds the current scalar function and replaces it on successful compiles
///
/// A failed [`load`](Evaluator::load) leaves the previous function in place,
/// so the last valid surface can stay on screen.
pub struct Evaluator {
    compiler: Box<dyn Compiler>,
    current: Option<Arc<dyn ScalarFunction>>,
    source: Option<String>,
}

impl Evaluator {
    /// Builds an evaluator around the given compiler, with no function yet
    pub fn new<C: Compiler + 'static>(compiler: C) -> Self {
        Self {
            compiler: Box::new(compiler),
            current: None,
            source: None,
        }
    }

    /// Compiles the left-hand side of an equation without installing it
    pub fn compile(
        &mut self,
        equation: &str,
    ) -> Result<Arc<dyn ScalarFunction>, Error> {
        let lhs = equation_lhs(equation);
        if lhs.is_empty() {
            return Err(Error::Compile {
                message: "equation is empty".to_owned(),
            });
        }
        self.compiler.compile(lhs)
    }

    /// Compiles and validates an equation, then makes it current
    pub fn load(&mut self, equation: &str) -> Result<(), Error> {
        let f = self.compile(equation)?;
        validate(f.as_ref())?;
        debug!("loaded equation `{}`", equation_lhs(equation));
        self.current = Some(f);
        self.source = Some(equation.to_owned());
        Ok(())
    }

    /// Installs an already-built function, after validating it
    pub fn install(&mut self, f: Arc<dyn ScalarFunction>) -> Result<(), Error> {
        validate(f.as_ref())?;
        self.current = Some(f);
        self.source = None;
        Ok(())
    }

    /// Returns the current function, if any equation has loaded
    pub fn current(&self) -> Option<&Arc<dyn ScalarFunction>> {
        self.current.as_ref()
    }

    /// Returns the equation text behind the current function
    ///
    /// This is `None` before the first successful load, or if the function was
    /// installed directly.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}
