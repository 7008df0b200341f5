//! The injected evaluation capability.
//!
//! The console treats evaluation as an opaque, possibly slow, possibly failing
//! black box. Success yields any `Display` value; failure is an `anyhow::Error`
//! whose display text becomes the `Error` transcript entry.

use std::fmt;
use std::future::Future;

pub trait Evaluator {
    type Output: fmt::Display;

    /// Evaluate one submitted buffer. May suspend for an unbounded time; any
    /// timeout policy belongs to the implementor.
    fn evaluate(&self, code: &str) -> impl Future<Output = anyhow::Result<Self::Output>>;
}

impl<E: Evaluator> Evaluator for &E {
    type Output = E::Output;

    fn evaluate(&self, code: &str) -> impl Future<Output = anyhow::Result<Self::Output>> {
        (**self).evaluate(code)
    }
}

/// Adapter turning a synchronous closure into an `Evaluator`.
pub struct FnEvaluator<F>(F);

impl<F> FnEvaluator<F> {
    pub fn new<T>(f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<T>,
        T: fmt::Display,
    {
        Self(f)
    }
}

impl<F, T> Evaluator for FnEvaluator<F>
where
    F: Fn(&str) -> anyhow::Result<T>,
    T: fmt::Display,
{
    type Output = T;

    async fn evaluate(&self, code: &str) -> anyhow::Result<T> {
        (self.0)(code)
    }
}
