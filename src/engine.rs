//! Node graph engine
//!
//! The forest behind a [`HollowHeap`](crate::HollowHeap). Every operation
//! takes the current root and returns the new one; the heap handle only
//! stores the result and keeps count.
//!
//! Nodes are either *full* (they carry an element) or *hollow* (their element
//! was deleted or moved to a new node by decrease-key). Hollow nodes stay in
//! place until the root itself is deleted, at which point
//! [`consolidate`] sweeps them and ranked-links the full nodes below them.
//!
//! A node hollowed by decrease-key sits in two child lists at once: its
//! original parent's, and (as the tail) the list of the node that took over
//! its element. That second parent is recorded in `extra_parent` so that
//! consolidation can tell which list the node's `next` link belongs to and
//! visits it at most twice.
//!
//! None of these functions check caller preconditions; the heap handle
//! does that before calling in.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, trace};

use crate::element::{Element, Owner};
use crate::rank::{self, Rank, INITIAL_BUCKETS};

/// Reference-counted node pointer
pub(crate) type NodeRef<T, P> = Rc<RefCell<Node<T, P>>>;

/// A position in the heap's forest
pub(crate) struct Node<T, P> {
    /// The element this node represents (None if hollow)
    item: Option<Element<T, P>>,
    key: P,
    /// First child in the child list
    child: Option<NodeRef<T, P>>,
    /// Next sibling in the parent's child list
    next: Option<NodeRef<T, P>>,
    /// Second parent of a node hollowed by decrease-key
    extra_parent: Weak<RefCell<Node<T, P>>>,
    rank: Rank,
}

impl<T, P> Node<T, P> {
    fn new(item: Element<T, P>, key: P) -> Self {
        Node {
            item: Some(item),
            key,
            child: None,
            next: None,
            extra_parent: Weak::new(),
            rank: 0,
        }
    }

    pub(crate) fn key(&self) -> &P {
        &self.key
    }

    pub(crate) fn is_hollow(&self) -> bool {
        self.item.is_none()
    }
}

/// Creates a full node for `element` and points the element at it.
fn make_node<T, P>(element: &Element<T, P>, key: P, owner: &Owner) -> NodeRef<T, P> {
    let node = Rc::new(RefCell::new(Node::new(element.clone(), key)));
    element.attach(&node, owner);
    node
}

/// Prepends `child` to `parent`'s child list.
fn add_child<T, P>(child: NodeRef<T, P>, parent: &NodeRef<T, P>) {
    let mut parent = parent.borrow_mut();
    child.borrow_mut().next = parent.child.take();
    parent.child = Some(child);
}

/// Makes the node with the larger key a child of the other and returns the
/// winner. Ties go to `w`.
pub(crate) fn link<T, P: Ord>(v: NodeRef<T, P>, w: NodeRef<T, P>) -> NodeRef<T, P> {
    let v_loses = v.borrow().key >= w.borrow().key;
    if v_loses {
        add_child(v, &w);
        w
    } else {
        add_child(w, &v);
        v
    }
}

pub(crate) fn meld<T, P: Ord>(
    g: Option<NodeRef<T, P>>,
    h: Option<NodeRef<T, P>>,
) -> Option<NodeRef<T, P>> {
    match (g, h) {
        (None, h) => h,
        (g, None) => g,
        (Some(g), Some(h)) => Some(link(g, h)),
    }
}

pub(crate) fn insert<T, P: Ord>(
    element: &Element<T, P>,
    key: P,
    root: Option<NodeRef<T, P>>,
    owner: &Owner,
) -> NodeRef<T, P> {
    let node = make_node(element, key, owner);
    match root {
        None => node,
        Some(root) => link(node, root),
    }
}

pub(crate) fn find_min<T, P>(root: Option<&NodeRef<T, P>>) -> Option<Element<T, P>> {
    root.and_then(|root| root.borrow().item.clone())
}

/// Lowers the key of `element`, currently represented by `u`, to `key`.
///
/// Unless `u` is the root, this moves the element to a fresh node, leaves
/// `u` hollow beneath it, and links the fresh node against the root.
pub(crate) fn decrease_key<T, P: Ord>(
    element: &Element<T, P>,
    u: NodeRef<T, P>,
    key: P,
    root: NodeRef<T, P>,
) -> NodeRef<T, P> {
    if Rc::ptr_eq(&u, &root) {
        u.borrow_mut().key = key;
        return root;
    }

    let v = Rc::new(RefCell::new(Node::new(element.clone(), key)));
    element.retarget(&v);
    {
        let mut hollowed = u.borrow_mut();
        hollowed.item = None;
        hollowed.extra_parent = Rc::downgrade(&v);
        let mut fresh = v.borrow_mut();
        fresh.rank = rank::discounted(hollowed.rank);
        trace!(
            "decrease_key: hollowed node of rank {}, new node rank {}",
            hollowed.rank,
            fresh.rank
        );
    }
    // u keeps its sibling link, which belongs to its original parent's list,
    // and becomes the tail of v's list.
    v.borrow_mut().child = Some(u);

    link(v, root)
}

/// Hollows `u` and detaches its element. Consolidates only if `u` was the
/// root; any other deletion is left for a later sweep.
pub(crate) fn delete_item<T, P: Ord>(
    u: &NodeRef<T, P>,
    root: NodeRef<T, P>,
) -> Option<NodeRef<T, P>> {
    if let Some(element) = u.borrow_mut().item.take() {
        element.detach();
    }

    if !root.borrow().is_hollow() {
        trace!("delete_item: lazy deletion below a full root");
        return Some(root);
    }

    consolidate(root)
}

pub(crate) fn delete_min<T, P: Ord>(root: NodeRef<T, P>) -> Option<NodeRef<T, P>> {
    let min = Rc::clone(&root);
    delete_item(&min, root)
}

/// Sweeps the hollow former root and every hollow node reachable only
/// through hollow nodes, ranked-linking the full nodes found along the way,
/// then links the survivors into a single tree.
fn consolidate<T, P: Ord>(root: NodeRef<T, P>) -> Option<NodeRef<T, P>> {
    let mut buckets: Vec<Option<NodeRef<T, P>>> = Vec::with_capacity(INITIAL_BUCKETS);
    buckets.resize_with(INITIAL_BUCKETS, || None);
    let mut max_rank = 0;
    let mut swept = 0usize;
    let mut ranked_links = 0usize;

    // The worklist of hollow nodes is threaded through their `next` links.
    root.borrow_mut().next = None;
    let mut worklist = Some(root);

    while let Some(v) = worklist {
        let mut cursor = {
            let mut hollow = v.borrow_mut();
            worklist = hollow.next.take();
            hollow.child.take()
        };
        swept += 1;

        while let Some(u) = cursor {
            let mut node = u.borrow_mut();
            cursor = node.next.clone();

            if node.is_hollow() {
                match node.extra_parent.upgrade() {
                    None => {
                        node.next = worklist.take();
                        drop(node);
                        worklist = Some(u);
                    }
                    Some(parent) => {
                        if Rc::ptr_eq(&parent, &v) {
                            // Tail of v's list; `next` belongs to the other parent.
                            cursor = None;
                        } else {
                            // Second visit will come through v's list, where u is the tail.
                            node.next = None;
                        }
                        node.extra_parent = Weak::new();
                    }
                }
                continue;
            }

            node.next = None;
            let mut r = usize::from(node.rank);
            drop(node);

            let mut u = u;
            loop {
                if r >= buckets.len() {
                    buckets.resize_with(r + 1, || None);
                }
                match buckets[r].take() {
                    Some(occupant) => {
                        u = link(u, occupant);
                        let mut winner = u.borrow_mut();
                        winner.rank = rank::checked_increment(winner.rank);
                        r = usize::from(winner.rank);
                        ranked_links += 1;
                    }
                    None => break,
                }
            }
            max_rank = max_rank.max(r);
            buckets[r] = Some(u);
        }
    }

    let mut new_root = None;
    for bucket in buckets.iter_mut().take(max_rank + 1) {
        if let Some(node) = bucket.take() {
            new_root = Some(match new_root {
                None => node,
                Some(acc) => link(acc, node),
            });
        }
    }

    debug!(
        "consolidate: swept {} hollow nodes, {} ranked links, max rank {}",
        swept, ranked_links, max_rank
    );
    new_root
}

/// Tears the forest down without recursion and detaches any elements still
/// stored in it.
pub(crate) fn dismantle<T, P>(root: NodeRef<T, P>) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let mut inner = node.borrow_mut();
        if let Some(element) = inner.item.take() {
            element.detach();
        }
        stack.extend(inner.child.take());
        stack.extend(inner.next.take());
    }
}

/// Walks the forest and checks the invariants every mutating operation
/// must restore. Returns a description of the first violation found.
#[cfg(any(test, feature = "debug-checks"))]
pub(crate) fn check_invariants<T, P: Ord>(
    root: Option<&NodeRef<T, P>>,
    len: usize,
) -> Result<(), String> {
    use std::collections::HashSet;

    let Some(root) = root else {
        return if len == 0 {
            Ok(())
        } else {
            Err(format!("empty forest but len is {}", len))
        };
    };
    if root.borrow().is_hollow() {
        return Err("root is hollow".to_string());
    }
    if root.borrow().next.is_some() {
        return Err("root has a sibling".to_string());
    }

    let mut seen: HashSet<*const RefCell<Node<T, P>>> = HashSet::new();
    let mut stack = vec![Rc::clone(root)];
    let mut full = 0usize;
    while let Some(node) = stack.pop() {
        if !seen.insert(Rc::as_ptr(&node)) {
            continue;
        }
        let inner = node.borrow();
        if let Some(element) = &inner.item {
            full += 1;
            if inner.key < root.borrow().key {
                return Err("full node with key below the root".to_string());
            }
            match element.node() {
                Some(target) if Rc::ptr_eq(&target, &node) => {}
                _ => return Err("element does not point back at its full node".to_string()),
            }
        }
        stack.extend(inner.child.clone());
        stack.extend(inner.next.clone());
    }

    if full != len {
        return Err(format!("{} full nodes reachable but len is {}", full, len));
    }
    Ok(())
}
