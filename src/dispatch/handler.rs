//! Output Handlers - Type-checked erased value-to-action mappings.
//!
//! Children and workers deliver values whose types are private to the call
//! site that registered them, while the nodes that store the handlers are
//! kept in homogeneous collections. [`OutputHandler`] erases the input type
//! but records its `TypeId` and name, so a rebind against a different input
//! type is caught immediately (at rebind time) instead of corrupting a later
//! delivery.
//!
//! Applying a handler to a value of the wrong type is the one deliberately
//! unchecked-fatal seam in the runtime: it cannot happen through the public
//! registration surface, only through a broken orchestrator, and it panics
//! with both type names.

use std::any::{Any, TypeId};
use std::rc::Rc;

use super::action::Action;

/// An erased `value -> Action` mapping bounded by a declared input type.
pub struct OutputHandler<S: 'static, O: 'static> {
    input_type: TypeId,
    input_name: &'static str,
    apply: Rc<dyn Fn(Box<dyn Any>) -> Action<S, O>>,
}

impl<S: 'static, O: 'static> OutputHandler<S, O> {
    /// Erase a typed handler, recording its input type for rebind checks.
    pub fn new<T: 'static>(handler: impl Fn(T) -> Action<S, O> + 'static) -> Self {
        let input_name = std::any::type_name::<T>();
        Self {
            input_type: TypeId::of::<T>(),
            input_name,
            apply: Rc::new(move |value| match value.downcast::<T>() {
                Ok(value) => handler(*value),
                Err(_) => panic!(
                    "handler expected a value of type `{input_name}`, got something else"
                ),
            }),
        }
    }

    /// The declared input type.
    pub fn input_type(&self) -> TypeId {
        self.input_type
    }

    /// The declared input type's name, for diagnostics.
    pub fn input_name(&self) -> &'static str {
        self.input_name
    }

    /// True when both handlers accept the same input type.
    pub fn accepts_same_input_as(&self, other: &Self) -> bool {
        self.input_type == other.input_type
    }

    /// Map a delivered value to an action.
    ///
    /// Panics if `value` is not of the declared input type.
    pub fn apply(&self, value: Box<dyn Any>) -> Action<S, O> {
        (self.apply)(value)
    }
}

impl<S: 'static, O: 'static> Clone for OutputHandler<S, O> {
    fn clone(&self) -> Self {
        Self {
            input_type: self.input_type,
            input_name: self.input_name,
            apply: Rc::clone(&self.apply),
        }
    }
}
