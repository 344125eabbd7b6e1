//! Attribute contract: scalar feature extractors over caller-defined items.

use std::fmt;
use std::sync::Arc;

/// A deterministic, side-effect-free mapping from an item to a real number.
///
/// Trees evaluate the same attribute on the same item many times while they
/// are built and scored, so implementations must return identical values for
/// identical inputs.
pub trait Attribute<T: ?Sized>: Send + Sync {
    /// Evaluate the attribute on an item.
    fn evaluate(&self, item: &T) -> f64;

    /// Display name used in reports.
    fn name(&self) -> &str;
}

/// Closure-backed [`Attribute`].
pub struct FnAttribute<F> {
    name: String,
    extract: F,
}

impl<F> FnAttribute<F> {
    pub fn new(name: impl Into<String>, extract: F) -> Self {
        Self {
            name: name.into(),
            extract,
        }
    }
}

impl<T, F> Attribute<T> for FnAttribute<F>
where
    T: ?Sized,
    F: Fn(&T) -> f64 + Send + Sync,
{
    fn evaluate(&self, item: &T) -> f64 {
        (self.extract)(item)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl<F> fmt::Debug for FnAttribute<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnAttribute").field("name", &self.name).finish()
    }
}

/// Ordered, shareable list of attributes.
///
/// Split nodes refer to attributes by their position in this list, so the
/// order is fixed once the set is handed to a forest. Cloning is cheap: the
/// attributes themselves are reference counted.
pub struct AttributeSet<T: ?Sized> {
    attributes: Vec<Arc<dyn Attribute<T>>>,
}

impl<T: ?Sized> AttributeSet<T> {
    /// Create an empty set.
    pub fn new() -> Self {
        Self {
            attributes: Vec::new(),
        }
    }

    /// Append a closure-backed attribute.
    pub fn with<F>(mut self, name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&T) -> f64 + Send + Sync + 'static,
        T: 'static,
    {
        self.attributes
            .push(Arc::new(FnAttribute::new(name, extract)));
        self
    }

    /// Append any attribute implementation.
    pub fn push(&mut self, attribute: Arc<dyn Attribute<T>>) {
        self.attributes.push(attribute);
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attribute at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&dyn Attribute<T>> {
        self.attributes.get(index).map(|a| a.as_ref())
    }

    /// Evaluate the attribute at `index` on `item`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds. Split nodes only store indices
    /// drawn from the set they were built with.
    pub fn evaluate(&self, index: usize, item: &T) -> f64 {
        self.attributes[index].evaluate(item)
    }

    /// Names of all attributes, in order.
    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name()).collect()
    }
}

impl<T: ?Sized> Default for AttributeSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for AttributeSet<T> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for AttributeSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
