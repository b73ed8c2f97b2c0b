//! Hollow Heap implementation
//!
//! A hollow heap is a simple data structure with the same amortized efficiency as
//! the classical Fibonacci heap, but with a simpler implementation.
//!
//! # Time Complexity
//!
//! | Operation      | Complexity           |
//! |----------------|----------------------|
//! | `insert`       | O(1) worst-case      |
//! | `find_min`     | O(1) worst-case      |
//! | `decrease_key` | O(1) amortized       |
//! | `delete`       | O(1) amortized unless it deletes the minimum |
//! | `delete_min`   | O(log n) amortized   |
//! | `meld`         | O(1) worst-case      |
//!
//! # Key Innovation
//!
//! Hollow heaps combine two ideas:
//!
//! 1. **Lazy deletion**: deleting an element, or moving it to a lower key, only
//!    empties the node that held it. The empty ("hollow") node stays in the
//!    structure until the minimum is deleted.
//!
//! 2. **DAG structure**: the node decrease-key hollows keeps its original parent
//!    and gains the new node as a second parent, so the forest is briefly a
//!    directed acyclic graph rather than a set of trees.
//!
//! # References
//!
//! - Hansen, T.D., Kaplan, H., Tarjan, R.E., Zwick, U. (2015). "Hollow Heaps."
//!   *ICALP 2015*. [arXiv:1510.06535](https://arxiv.org/abs/1510.06535)
//! - Hansen, T.D., Kaplan, H., Tarjan, R.E., Zwick, U. (2017). "Hollow Heaps."
//!   *ACM Transactions on Algorithms*, 13(3), 42.

use std::fmt;

use log::trace;

use crate::element::{Element, Owner};
use crate::engine::{self, NodeRef};
use crate::error::{HeapError, InvalidOperation};

/// Hollow Heap implementation
///
/// Elements are created by the caller with [`Element::new`] and stay valid
/// after they leave the heap, so membership can always be checked with
/// [`Element::is_present`] before addressing an element.
///
/// A heap is single-threaded: it is neither `Send` nor `Sync`.
///
/// # Example
///
/// ```rust
/// use hollow_heap::{Element, HollowHeap};
///
/// let mut heap = HollowHeap::new();
/// let a = Element::new("a");
/// let b = Element::new("b");
/// heap.insert(&a, 5).unwrap();
/// heap.insert(&b, 3).unwrap();
///
/// heap.decrease_key(&a, 1).unwrap();
/// assert_eq!(heap.find_min(), Some(a.clone()));
///
/// let (priority, min) = heap.delete_min().unwrap();
/// assert_eq!((priority, *min.payload()), (1, "a"));
/// assert_eq!(heap.len(), 1);
/// ```
pub struct HollowHeap<T, P> {
    /// Root of the forest (None if empty)
    root: Option<NodeRef<T, P>>,
    /// Number of live elements
    len: usize,
    owner: Owner,
}

impl<T, P: Ord + Clone> Default for HollowHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord + Clone> HollowHeap<T, P> {
    /// Creates a new empty heap
    pub fn new() -> Self {
        HollowHeap {
            root: None,
            len: 0,
            owner: Owner::new(),
        }
    }

    /// Returns the number of elements in the heap
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `element` is currently stored in this heap
    pub fn contains(&self, element: &Element<T, P>) -> bool {
        self.locate(element).is_ok()
    }

    /// Inserts `element` with the given priority.
    ///
    /// # Errors
    ///
    /// [`InvalidOperation::AlreadyInHeap`] if the element is already stored
    /// in this or any other heap.
    pub fn insert(&mut self, element: &Element<T, P>, priority: P) -> Result<(), HeapError> {
        if element.is_present() {
            return Err(InvalidOperation::AlreadyInHeap.into());
        }
        let root = self.root.take();
        self.root = Some(engine::insert(element, priority, root, &self.owner));
        self.len += 1;
        self.check();
        Ok(())
    }

    /// Wraps `payload` in a new element, inserts it, and returns the element
    pub fn push(&mut self, priority: P, payload: T) -> Element<T, P> {
        let element = Element::new(payload);
        let root = self.root.take();
        self.root = Some(engine::insert(&element, priority, root, &self.owner));
        self.len += 1;
        self.check();
        element
    }

    /// Returns the element with the minimum priority, or `None` if empty
    pub fn find_min(&self) -> Option<Element<T, P>> {
        engine::find_min(self.root.as_ref())
    }

    /// Returns the minimum priority, or `None` if empty
    pub fn min_priority(&self) -> Option<P> {
        let root = self.root.as_ref()?;
        let key = root.borrow().key().clone();
        Some(key)
    }

    /// Lowers the priority of `element` to `priority`.
    ///
    /// Setting the priority it already has is allowed and keeps the heap
    /// ordered.
    ///
    /// # Errors
    ///
    /// - [`InvalidOperation::NotInHeap`] if the element is not in this heap
    /// - [`InvalidOperation::PriorityIncreased`] if `priority` is greater than
    ///   the current priority
    pub fn decrease_key(&mut self, element: &Element<T, P>, priority: P) -> Result<(), HeapError> {
        let node = self.locate(element)?;
        if priority > *node.borrow().key() {
            return Err(InvalidOperation::PriorityIncreased.into());
        }
        let root = self
            .root
            .take()
            .ok_or(HeapError::from(InvalidOperation::NotInHeap))?;
        self.root = Some(engine::decrease_key(element, node, priority, root));
        self.check();
        Ok(())
    }

    /// Removes `element` from the heap.
    ///
    /// Unless the element is the minimum this only hollows its node; the
    /// node is reclaimed by a later `delete_min`.
    ///
    /// # Errors
    ///
    /// [`InvalidOperation::NotInHeap`] if the element is not in this heap.
    pub fn delete(&mut self, element: &Element<T, P>) -> Result<(), HeapError> {
        let node = self.locate(element)?;
        let root = self
            .root
            .take()
            .ok_or(HeapError::from(InvalidOperation::NotInHeap))?;
        self.root = engine::delete_item(&node, root);
        self.len -= 1;
        self.check();
        Ok(())
    }

    /// Removes the element with the minimum priority and returns it along
    /// with the priority it had.
    ///
    /// # Errors
    ///
    /// [`InvalidOperation::EmptyHeap`] if the heap is empty.
    pub fn delete_min(&mut self) -> Result<(P, Element<T, P>), HeapError> {
        let root = self
            .root
            .take()
            .ok_or(HeapError::from(InvalidOperation::EmptyHeap))?;
        let (priority, min) = {
            let node = root.borrow();
            (node.key().clone(), engine::find_min(Some(&root)))
        };
        let Some(min) = min else {
            // A hollow root means the forest is corrupt; leave it in place.
            self.root = Some(root);
            return Err(InvalidOperation::EmptyHeap.into());
        };

        self.root = engine::delete_min(root);
        self.len -= 1;
        self.check();
        Ok((priority, min))
    }

    /// Removes and returns the minimum, or `None` if the heap is empty
    pub fn pop(&mut self) -> Option<(P, Element<T, P>)> {
        self.delete_min().ok()
    }

    /// Merges `other` into this heap. `other` is consumed; its elements can
    /// be addressed through this heap afterwards.
    pub fn meld(&mut self, mut other: Self) {
        trace!("meld: {} + {} elements", self.len, other.len);
        other.owner.forward_to(&self.owner);
        let root = self.root.take();
        self.root = engine::meld(root, other.root.take());
        self.len += other.len;
        other.len = 0;
        self.check();
    }

    /// Removes every element. Elements held by the caller report
    /// themselves absent afterwards.
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            engine::dismantle(root);
        }
        self.len = 0;
    }

    /// Resolves `element` to its node if it belongs to this heap.
    fn locate(&self, element: &Element<T, P>) -> Result<NodeRef<T, P>, HeapError> {
        match element.location() {
            Some((node, owner)) if owner.same_heap(&self.owner) => Ok(node),
            _ => Err(InvalidOperation::NotInHeap.into()),
        }
    }

    #[cfg(any(test, feature = "debug-checks"))]
    fn check(&self) {
        if let Err(violation) = engine::check_invariants(self.root.as_ref(), self.len) {
            panic!("hollow heap invariant violated: {}", violation);
        }
    }

    #[cfg(not(any(test, feature = "debug-checks")))]
    #[inline]
    fn check(&self) {}
}

impl<T, P> Drop for HollowHeap<T, P> {
    fn drop(&mut self) {
        if let Some(root) = self.root.take() {
            engine::dismantle(root);
        }
    }
}

impl<T, P: Ord + Clone> Extend<(P, T)> for HollowHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, payload) in iter {
            self.push(priority, payload);
        }
    }
}

impl<T, P: Ord + Clone> FromIterator<(P, T)> for HollowHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = HollowHeap::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord + Clone + fmt::Debug> fmt::Debug for HollowHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HollowHeap")
            .field("len", &self.len)
            .field("min_priority", &self.min_priority())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::init_test;

    fn drain(heap: &mut HollowHeap<i32, i32>) -> Vec<i32> {
        let mut out = Vec::new();
        while let Some((_, e)) = heap.pop() {
            out.push(*e.payload());
        }
        out
    }

    #[test]
    fn test_basic_operations() {
        init_test();
        let mut heap: HollowHeap<&str, i32> = HollowHeap::new();

        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.push(3, "three");
        heap.push(1, "one");
        heap.push(2, "two");

        assert!(!heap.is_empty());
        assert_eq!(heap.len(), 3);
        assert_eq!(heap.min_priority(), Some(1));
        assert_eq!(heap.find_min().map(|e| *e.payload()), Some("one"));

        assert_eq!(heap.pop().map(|(p, e)| (p, *e.payload())), Some((1, "one")));
        assert_eq!(heap.pop().map(|(p, e)| (p, *e.payload())), Some((2, "two")));
        assert_eq!(heap.pop().map(|(p, e)| (p, *e.payload())), Some((3, "three")));
        assert!(heap.pop().is_none());
    }

    #[test]
    fn test_sorted_drain() {
        init_test();
        let mut heap = HollowHeap::new();
        for k in [14, 11, 5, 9, 0, 8, 10, 3, 6, 12, 13, 4] {
            heap.insert(&Element::new(k), k).unwrap();
        }
        assert_eq!(heap.len(), 12);
        assert_eq!(drain(&mut heap), vec![0, 3, 4, 5, 6, 8, 9, 10, 11, 12, 13, 14]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_decrease_key() {
        init_test();
        let mut heap: HollowHeap<&str, i32> = HollowHeap::new();

        let a = heap.push(10, "a");
        let b = heap.push(5, "b");
        let _c = heap.push(15, "c");

        assert_eq!(heap.find_min(), Some(b.clone()));

        heap.decrease_key(&a, 2).unwrap();
        assert_eq!(heap.find_min(), Some(a.clone()));
        assert_eq!(a.priority(), Some(2));

        heap.decrease_key(&b, 1).unwrap();
        assert_eq!(heap.find_min(), Some(b.clone()));
        assert_eq!(heap.len(), 3);

        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|(p, e)| (p, *e.payload()))
            .collect();
        assert_eq!(order, vec![(1, "b"), (2, "a"), (15, "c")]);
    }

    #[test]
    fn test_decrease_key_errors() {
        init_test();
        let mut heap: HollowHeap<&str, i32> = HollowHeap::new();
        let e = heap.push(5, "item");

        assert_eq!(
            heap.decrease_key(&e, 10),
            Err(HeapError::InvalidOperation(InvalidOperation::PriorityIncreased))
        );
        assert_eq!(e.priority(), Some(5));

        // Equal priority is allowed
        assert_eq!(heap.decrease_key(&e, 5), Ok(()));
        assert_eq!(heap.min_priority(), Some(5));

        let stranger = Element::new("stranger");
        assert_eq!(
            heap.decrease_key(&stranger, 1),
            Err(InvalidOperation::NotInHeap.into())
        );
    }

    #[test]
    fn test_decrease_key_root() {
        init_test();
        let mut heap: HollowHeap<&str, i32> = HollowHeap::new();
        let e = heap.push(5, "item");
        heap.decrease_key(&e, 2).unwrap();
        assert_eq!(heap.min_priority(), Some(2));
        assert_eq!(heap.pop().map(|(p, _)| p), Some(2));
    }

    #[test]
    fn test_multiple_decrease_key() {
        init_test();
        let mut heap: HollowHeap<&str, i32> = HollowHeap::new();
        let item = heap.push(100, "item");
        heap.push(50, "other");

        heap.decrease_key(&item, 80).unwrap();
        heap.decrease_key(&item, 60).unwrap();
        heap.decrease_key(&item, 40).unwrap();

        assert_eq!(heap.find_min(), Some(item.clone()));
        assert_eq!(heap.pop().map(|(p, e)| (p, *e.payload())), Some((40, "item")));
        assert_eq!(heap.pop().map(|(p, e)| (p, *e.payload())), Some((50, "other")));
    }

    #[test]
    fn test_delete_non_min() {
        init_test();
        let mut heap = HollowHeap::new();
        let elements: Vec<_> = (0..6).map(|k| heap.push(k, k)).collect();

        heap.delete(&elements[3]).unwrap();
        assert_eq!(heap.len(), 5);
        assert_eq!(heap.min_priority(), Some(0));
        assert!(!elements[3].is_present());
        assert!(!heap.contains(&elements[3]));

        assert_eq!(
            heap.delete(&elements[3]),
            Err(InvalidOperation::NotInHeap.into())
        );
        assert_eq!(drain(&mut heap), vec![0, 1, 2, 4, 5]);
    }

    #[test]
    fn test_delete_min_element_by_handle() {
        init_test();
        let mut heap = HollowHeap::new();
        let elements: Vec<_> = [4, 2, 8].iter().map(|&k| heap.push(k, k)).collect();
        heap.delete(&elements[1]).unwrap();
        assert_eq!(heap.min_priority(), Some(4));
        assert_eq!(drain(&mut heap), vec![4, 8]);
    }

    #[test]
    fn test_delete_min_empty() {
        init_test();
        let mut heap: HollowHeap<i32, i32> = HollowHeap::new();
        assert_eq!(
            heap.delete_min().map(|(p, _)| p),
            Err(InvalidOperation::EmptyHeap.into())
        );
        assert!(heap.find_min().is_none());
        assert_eq!(heap.len(), 0);
    }

    #[test]
    fn test_insert_twice_rejected() {
        init_test();
        let mut heap = HollowHeap::new();
        let mut other = HollowHeap::new();
        let e = Element::new(1);
        heap.insert(&e, 1).unwrap();
        assert_eq!(heap.insert(&e, 2), Err(InvalidOperation::AlreadyInHeap.into()));
        assert_eq!(other.insert(&e, 2), Err(InvalidOperation::AlreadyInHeap.into()));
        assert_eq!(heap.len(), 1);
        assert!(other.is_empty());

        heap.delete(&e).unwrap();
        other.insert(&e, 2).unwrap();
        assert!(other.contains(&e));
        assert!(!heap.contains(&e));
    }

    #[test]
    fn test_foreign_element_rejected() {
        init_test();
        let mut a = HollowHeap::new();
        let mut b = HollowHeap::new();
        let x = a.push(1, 1);
        let y = b.push(2, 2);

        assert_eq!(b.decrease_key(&x, 0), Err(InvalidOperation::NotInHeap.into()));
        assert_eq!(a.delete(&y), Err(InvalidOperation::NotInHeap.into()));
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn test_meld() {
        init_test();
        let mut heap1 = HollowHeap::new();
        let mut heap2 = HollowHeap::new();
        for k in [1, 5, 9] {
            heap1.push(k, k);
        }
        let moved: Vec<_> = [2, 4, 7].iter().map(|&k| heap2.push(k, k)).collect();

        heap1.meld(heap2);
        assert_eq!(heap1.len(), 6);

        // Elements of the absorbed heap are addressable through the survivor
        assert!(heap1.contains(&moved[2]));
        heap1.decrease_key(&moved[2], 3).unwrap();
        assert_eq!(drain(&mut heap1), vec![1, 2, 7, 4, 5, 9]);
    }

    #[test]
    fn test_meld_empty() {
        init_test();
        let mut heap1: HollowHeap<i32, i32> = HollowHeap::new();
        let mut heap2 = HollowHeap::new();
        heap2.push(3, 3);
        heap1.meld(heap2);
        assert_eq!(heap1.len(), 1);
        heap1.meld(HollowHeap::new());
        assert_eq!(heap1.len(), 1);
        assert_eq!(drain(&mut heap1), vec![3]);
    }

    #[test]
    fn test_clear_and_drop_detach_elements() {
        init_test();
        let mut heap = HollowHeap::new();
        let kept: Vec<_> = (0..10).map(|k| heap.push(k, k)).collect();
        heap.clear();
        assert!(heap.is_empty());
        assert!(kept.iter().all(|e| !e.is_present()));

        let kept: Vec<_> = (0..10).map(|k| heap.push(k, k)).collect();
        drop(heap);
        assert!(kept.iter().all(|e| e.priority().is_none()));
    }

    #[test]
    fn test_from_iterator() {
        init_test();
        let mut heap: HollowHeap<char, i32> =
            vec![(3, 'c'), (1, 'a'), (2, 'b')].into_iter().collect();
        assert_eq!(heap.len(), 3);
        let order: Vec<_> = std::iter::from_fn(|| heap.pop())
            .map(|(_, e)| *e.payload())
            .collect();
        assert_eq!(order, vec!['a', 'b', 'c']);
    }
}
