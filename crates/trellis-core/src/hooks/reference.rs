use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::scope::Scope;

/// Mutable box with a stable identity across renders. Writing to it does not
/// trigger a render.
pub struct RefBox<T>(Rc<RefCell<T>>);

impl<T> RefBox<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    pub fn replace(&self, value: T) -> T {
        self.0.replace(value)
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl<T: Clone> RefBox<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T> Clone for RefBox<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T> PartialEq for RefBox<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T: fmt::Debug> fmt::Debug for RefBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefBox").field(&*self.0.borrow()).finish()
    }
}

pub fn use_ref<T: 'static>(cx: &Scope, init: impl FnOnce() -> T) -> RefBox<T> {
    let slot = cx.allocate_slot();
    if let Some(existing) = cx.slot_value::<RefBox<T>>(slot) {
        return existing;
    }
    let created = RefBox::new(init());
    cx.store_slot(slot, created.clone());
    created
}
