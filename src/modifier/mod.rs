//! Modifiers: transparent wrappers that change one behaviour of a dimension
//! or filter and forward everything else.
//!
//! ```text
//! Rollup(Dimension)        definition() -> NULL, is_rollup() -> true
//! OmitFromRollup(Filter)   is_excluded_from_rollup() -> true
//! ```
//!
//! A modifier shares its wrapped value (`Rc<RefCell<_>>`). Attribute reads
//! check the modifier's own state first and then the wrapped value; writes to
//! an attribute the wrapped value owns go through to it. Modifiers are built
//! while assembling a schema, on one thread, and are read-only afterwards.
//!
//! Equality and hashing use the textual form `Kind(<wrapped debug>)`.

mod rollup;

pub use rollup::{OmitFromRollup, OmitFromRollupKind, Rollup, RollupKind};

use indexmap::IndexMap;
use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::rc::Rc;

use crate::model::{Definition, Dimension, DimensionLike, Filter, FilterLike, Interval};

/// Dynamic attribute value.
pub type AttrValue = serde_json::Value;

/// Named attribute access for wrapped values.
pub trait Attributes {
    /// Read an attribute the value owns. `None` when it has no such attribute.
    fn get_attr(&self, name: &str) -> Option<AttrValue>;

    /// Write an owned attribute. Gives the value back when the attribute is
    /// not owned or the value does not fit it.
    fn set_attr(&mut self, name: &str, value: AttrValue) -> Result<(), AttrValue>;

    fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }
}

/// Per-variant behaviour of a [`Modifier`].
pub trait ModifierKind: 'static {
    /// Name used in the textual form.
    const NAME: &'static str;

    /// Name of the slot holding the wrapped value.
    const WRAPPED_KEY: &'static str;

    /// Attribute the modifier answers itself, ahead of its own state and
    /// the wrapped value.
    fn attr_override(_name: &str) -> Option<AttrValue> {
        None
    }

    fn definition(wrapped: Definition) -> Definition {
        wrapped
    }

    fn is_rollup(wrapped: bool) -> bool {
        wrapped
    }

    fn is_excluded_from_rollup(wrapped: bool) -> bool {
        wrapped
    }
}

/// Table of values already copied during a deep copy, keyed by the address
/// of the shared original. Values reached twice are copied once and stay
/// shared in the copy.
#[derive(Default)]
pub struct DeepCopyMemo {
    copies: HashMap<usize, Rc<dyn Any>>,
}

impl DeepCopyMemo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.copies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }

    /// Copy a shared value, reusing an earlier copy of the same original.
    pub fn copy_shared<W: DeepClone + 'static>(&mut self, shared: &Rc<RefCell<W>>) -> Rc<RefCell<W>> {
        let addr = Rc::as_ptr(shared) as *const () as usize;
        if let Some(existing) = self.copies.get(&addr) {
            if let Ok(copy) = Rc::clone(existing).downcast::<RefCell<W>>() {
                return copy;
            }
        }
        let inner = shared.borrow().deep_clone_with(self);
        let copy = Rc::new(RefCell::new(inner));
        self.copies.insert(addr, Rc::clone(&copy) as Rc<dyn Any>);
        copy
    }
}

/// Recursive copy that threads a [`DeepCopyMemo`].
pub trait DeepClone: Sized {
    fn deep_clone_with(&self, memo: &mut DeepCopyMemo) -> Self;

    fn deep_clone(&self) -> Self {
        self.deep_clone_with(&mut DeepCopyMemo::new())
    }
}

impl DeepClone for Dimension {
    fn deep_clone_with(&self, _memo: &mut DeepCopyMemo) -> Self {
        self.clone()
    }
}

impl DeepClone for Filter {
    fn deep_clone_with(&self, _memo: &mut DeepCopyMemo) -> Self {
        self.clone()
    }
}

/// A wrapper over a shared dimension or filter.
pub struct Modifier<K: ModifierKind, W> {
    wrapped: Rc<RefCell<W>>,
    local: IndexMap<String, AttrValue>,
    kind: PhantomData<K>,
}

impl<K: ModifierKind, W> Modifier<K, W> {
    pub fn new(wrapped: W) -> Self {
        Self::wrapping(Rc::new(RefCell::new(wrapped)))
    }

    /// Wrap a value shared with other owners.
    pub fn wrapping(wrapped: Rc<RefCell<W>>) -> Self {
        Self {
            wrapped,
            local: IndexMap::new(),
            kind: PhantomData,
        }
    }

    pub fn wrapped(&self) -> Ref<'_, W> {
        self.wrapped.borrow()
    }

    pub fn wrapped_mut(&self) -> RefMut<'_, W> {
        self.wrapped.borrow_mut()
    }

    pub fn shared(&self) -> Rc<RefCell<W>> {
        Rc::clone(&self.wrapped)
    }

    /// Attributes set on the modifier itself.
    pub fn local_attrs(&self) -> &IndexMap<String, AttrValue> {
        &self.local
    }

    /// A copy of this modifier bound to `wrapped`. `self` is unchanged.
    pub fn for_wrapped(&self, wrapped: W) -> Self {
        Self {
            wrapped: Rc::new(RefCell::new(wrapped)),
            local: self.local.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: ModifierKind, W: Attributes> Modifier<K, W> {
    /// Read an attribute from the modifier, falling back to the wrapped value.
    pub fn get(&self, name: &str) -> Option<AttrValue> {
        if let Some(value) = K::attr_override(name) {
            return Some(value);
        }
        if let Some(value) = self.local.get(name) {
            return Some(value.clone());
        }
        self.wrapped.borrow().get_attr(name)
    }

    /// Write an attribute. Attributes owned by the wrapped value are written
    /// through to it; anything else is kept on the modifier.
    pub fn set(&mut self, name: &str, value: AttrValue) {
        let owned = self.wrapped.borrow().has_attr(name);
        if owned {
            if let Err(value) = self.wrapped.borrow_mut().set_attr(name, value) {
                self.local.insert(name.to_string(), value);
            }
            return;
        }
        self.local.insert(name.to_string(), value);
    }
}

impl<K: ModifierKind, W: fmt::Debug> Modifier<K, W> {
    /// Textual form: `Kind(<wrapped debug>)`.
    pub fn repr(&self) -> String {
        match self.wrapped.try_borrow() {
            Ok(wrapped) => format!("{}({:?})", K::NAME, &*wrapped),
            Err(_) => format!("{}(<borrowed>)", K::NAME),
        }
    }
}

// Shallow copy: own state is duplicated, the wrapped value stays shared.
impl<K: ModifierKind, W> Clone for Modifier<K, W> {
    fn clone(&self) -> Self {
        Self {
            wrapped: Rc::clone(&self.wrapped),
            local: self.local.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: ModifierKind, W: DeepClone + 'static> DeepClone for Modifier<K, W> {
    fn deep_clone_with(&self, memo: &mut DeepCopyMemo) -> Self {
        Self {
            wrapped: memo.copy_shared(&self.wrapped),
            local: self.local.clone(),
            kind: PhantomData,
        }
    }
}

impl<K: ModifierKind, W: fmt::Debug> fmt::Debug for Modifier<K, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct(K::NAME);
        match self.wrapped.try_borrow() {
            Ok(wrapped) => s.field(K::WRAPPED_KEY, &*wrapped),
            Err(_) => s.field(K::WRAPPED_KEY, &"<borrowed>"),
        };
        s.finish()
    }
}

impl<K: ModifierKind, W: fmt::Debug> fmt::Display for Modifier<K, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl<K: ModifierKind, W: fmt::Debug> PartialEq for Modifier<K, W> {
    fn eq(&self, other: &Self) -> bool {
        self.repr() == other.repr()
    }
}

impl<K: ModifierKind, W: fmt::Debug> Eq for Modifier<K, W> {}

impl<K: ModifierKind, W: fmt::Debug> Hash for Modifier<K, W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.repr().hash(state);
    }
}

impl<K: ModifierKind, W: Attributes> Attributes for Modifier<K, W> {
    fn get_attr(&self, name: &str) -> Option<AttrValue> {
        self.get(name)
    }

    fn set_attr(&mut self, name: &str, value: AttrValue) -> Result<(), AttrValue> {
        self.set(name, value);
        Ok(())
    }
}

impl<K: ModifierKind, D: DimensionLike> DimensionLike for Modifier<K, D> {
    fn key(&self) -> String {
        self.wrapped.borrow().key()
    }

    fn label(&self) -> Option<String> {
        self.wrapped.borrow().label()
    }

    fn definition(&self) -> Definition {
        K::definition(self.wrapped.borrow().definition())
    }

    fn display_field(&self) -> Option<String> {
        self.wrapped.borrow().display_field()
    }

    fn interval(&self) -> Option<Interval> {
        self.wrapped.borrow().interval()
    }

    fn display_values(&self) -> Option<IndexMap<String, String>> {
        self.wrapped.borrow().display_values()
    }

    fn is_rollup(&self) -> bool {
        K::is_rollup(self.wrapped.borrow().is_rollup())
    }
}

impl<K: ModifierKind, F: FilterLike> FilterLike for Modifier<K, F> {
    fn key(&self) -> String {
        self.wrapped.borrow().key()
    }

    fn definition(&self) -> Definition {
        K::definition(self.wrapped.borrow().definition())
    }

    fn is_excluded_from_rollup(&self) -> bool {
        K::is_excluded_from_rollup(self.wrapped.borrow().is_excluded_from_rollup())
    }
}
