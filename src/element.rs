//! Caller-owned element handles
//!
//! An [`Element`] wraps a payload and remembers which node of which heap
//! currently represents it. The caller creates elements and keeps them for
//! as long as it wants to address them; the heap only ever holds clones of
//! the handle inside its full nodes.
//!
//! The back-reference from element to node is a `Weak` pointer, so there is
//! no ownership cycle: nodes own elements, elements merely point at nodes.
//! Only the engine re-targets or clears it.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::engine::{Node, NodeRef};

/// Identity of the heap a node belongs to.
///
/// Melding forwards the absorbed heap's tag to the surviving heap, so an
/// element inserted into the absorbed heap resolves to the survivor.
/// Forwarding links form a union-find forest; [`Owner::resolve`] compresses
/// paths as it walks them.
#[derive(Clone)]
pub(crate) struct Owner(Rc<RefCell<Option<Owner>>>);

impl Owner {
    pub(crate) fn new() -> Self {
        Owner(Rc::new(RefCell::new(None)))
    }

    /// Follows forwarding links to the tag of the heap that currently owns
    /// this one.
    pub(crate) fn resolve(&self) -> Owner {
        let mut root = self.clone();
        loop {
            let next = root.0.borrow().clone();
            match next {
                Some(next) => root = next,
                None => break,
            }
        }

        let mut current = self.clone();
        while !Rc::ptr_eq(&current.0, &root.0) {
            let next = current.0.borrow_mut().replace(root.clone());
            match next {
                Some(next) => current = next,
                None => break,
            }
        }

        root
    }

    /// Makes every element tagged with `self` belong to `target`'s heap.
    pub(crate) fn forward_to(&self, target: &Owner) {
        let target = target.resolve();
        if !Rc::ptr_eq(&self.0, &target.0) {
            *self.0.borrow_mut() = Some(target);
        }
    }

    pub(crate) fn same_heap(&self, other: &Owner) -> bool {
        Rc::ptr_eq(&self.resolve().0, &other.resolve().0)
    }
}

impl Drop for Owner {
    // Unlinks a forwarding chain one tag at a time. Stops at the first tag
    // something else still refers to.
    fn drop(&mut self) {
        if Rc::strong_count(&self.0) != 1 {
            return;
        }
        let mut next = self.0.borrow_mut().take();
        while let Some(owner) = next {
            if Rc::strong_count(&owner.0) != 1 {
                break;
            }
            next = owner.0.borrow_mut().take();
        }
    }
}

/// Where an element currently lives.
struct Slot<T, P> {
    node: Weak<RefCell<Node<T, P>>>,
    owner: Owner,
}

struct ElementInner<T, P> {
    payload: T,
    slot: RefCell<Option<Slot<T, P>>>,
}

/// A payload that can be inserted into a [`HollowHeap`](crate::HollowHeap)
/// and later addressed for `decrease_key` or `delete`.
///
/// Cloning an element clones the handle, not the payload: both clones refer
/// to the same heap entry.
///
/// # Example
///
/// ```rust
/// use hollow_heap::{Element, HollowHeap};
///
/// let mut heap = HollowHeap::new();
/// let e = Element::new("task");
/// assert_eq!(e.priority(), None);
///
/// heap.insert(&e, 7).unwrap();
/// assert_eq!(e.priority(), Some(7));
///
/// heap.delete(&e).unwrap();
/// assert!(!e.is_present());
/// ```
pub struct Element<T, P>(Rc<ElementInner<T, P>>);

impl<T, P> Element<T, P> {
    /// Wraps a payload. The element is not in any heap yet.
    pub fn new(payload: T) -> Self {
        Element(Rc::new(ElementInner {
            payload,
            slot: RefCell::new(None),
        }))
    }

    /// Returns the payload
    pub fn payload(&self) -> &T {
        &self.0.payload
    }

    /// Returns true if the element is currently stored in a heap
    pub fn is_present(&self) -> bool {
        self.node().is_some()
    }

    /// Returns the current priority, or `None` if the element is not in a heap
    pub fn priority(&self) -> Option<P>
    where
        P: Clone,
    {
        let node = self.node()?;
        let key = node.borrow().key().clone();
        Some(key)
    }

    /// Returns true if both handles refer to the same element
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// The node representing this element, if any.
    pub(crate) fn node(&self) -> Option<NodeRef<T, P>> {
        self.0
            .slot
            .borrow()
            .as_ref()
            .and_then(|slot| slot.node.upgrade())
    }

    /// The node representing this element together with its heap's tag.
    pub(crate) fn location(&self) -> Option<(NodeRef<T, P>, Owner)> {
        let slot = self.0.slot.borrow();
        let slot = slot.as_ref()?;
        let node = slot.node.upgrade()?;
        Some((node, slot.owner.clone()))
    }

    pub(crate) fn attach(&self, node: &NodeRef<T, P>, owner: &Owner) {
        *self.0.slot.borrow_mut() = Some(Slot {
            node: Rc::downgrade(node),
            owner: owner.clone(),
        });
    }

    /// Points the element at a replacement node in the same heap.
    pub(crate) fn retarget(&self, node: &NodeRef<T, P>) {
        if let Some(slot) = self.0.slot.borrow_mut().as_mut() {
            slot.node = Rc::downgrade(node);
        }
    }

    pub(crate) fn detach(&self) {
        self.0.slot.borrow_mut().take();
    }
}

impl<T, P> Clone for Element<T, P> {
    fn clone(&self) -> Self {
        Element(Rc::clone(&self.0))
    }
}

impl<T, P> PartialEq for Element<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T, P> Eq for Element<T, P> {}

impl<T: fmt::Debug, P> fmt::Debug for Element<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("payload", &self.0.payload)
            .field("present", &self.is_present())
            .finish()
    }
}
