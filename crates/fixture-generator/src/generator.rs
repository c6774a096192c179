//! The value generator abstraction.

use rand::RngCore;
use std::marker::PhantomData;

/// A stateless source of values of type `T`.
///
/// Every invocation is independent: generators close over fixed
/// parameters captured at construction and draw all randomness from the
/// RNG they are handed, so one generator can be shared by any number of
/// callers and invoked any number of times.
///
/// Any `Fn(&mut dyn RngCore) -> T` closure is a generator.
pub trait ValueGenerator<T> {
    /// Generate a value using the given RNG.
    fn generate(&self, rng: &mut dyn RngCore) -> T;

    /// Generate a value using the thread-local RNG.
    fn one(&self) -> T {
        self.generate(&mut rand::rng())
    }
}

impl<T, F> ValueGenerator<T> for F
where
    F: Fn(&mut dyn RngCore) -> T,
{
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        self(rng)
    }
}

/// Type-erased generator.
pub struct BoxedGenerator<T> {
    inner: Box<dyn ValueGenerator<T> + Send + Sync>,
}

impl<T> BoxedGenerator<T> {
    pub fn new<G>(generator: G) -> Self
    where
        G: ValueGenerator<T> + Send + Sync + 'static,
    {
        Self {
            inner: Box::new(generator),
        }
    }
}

impl<T> ValueGenerator<T> for BoxedGenerator<T> {
    fn generate(&self, rng: &mut dyn RngCore) -> T {
        self.inner.generate(rng)
    }
}

/// Generator that transforms the output of another generator.
pub struct Mapped<G, F, T> {
    inner: G,
    f: F,
    _marker: PhantomData<fn() -> T>,
}

impl<G, F, T> Mapped<G, F, T> {
    pub fn new(inner: G, f: F) -> Self {
        Self {
            inner,
            f,
            _marker: PhantomData,
        }
    }
}

impl<G, F, T, U> ValueGenerator<U> for Mapped<G, F, T>
where
    G: ValueGenerator<T>,
    F: Fn(T) -> U,
{
    fn generate(&self, rng: &mut dyn RngCore) -> U {
        (self.f)(self.inner.generate(rng))
    }
}

/// Combinators available on every generator.
pub trait ValueGeneratorExt<T>: ValueGenerator<T> + Sized {
    /// Transform every generated value with `f`.
    fn map_values<U, F>(self, f: F) -> Mapped<Self, F, T>
    where
        F: Fn(T) -> U,
    {
        Mapped::new(self, f)
    }

    /// Erase the concrete generator type.
    fn boxed(self) -> BoxedGenerator<T>
    where
        Self: Send + Sync + 'static,
    {
        BoxedGenerator::new(self)
    }
}

impl<T, G: ValueGenerator<T>> ValueGeneratorExt<T> for G {}
