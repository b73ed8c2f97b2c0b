//! Hollow Heap: an addressable, mergeable priority queue
//!
//! This crate implements the hollow heap of Hansen, Kaplan, Tarjan and Zwick,
//! a priority queue with the amortized bounds of a Fibonacci heap and a much
//! simpler structure:
//!
//! - **insert**, **find_min**, **meld**: O(1) worst-case
//! - **decrease_key**: O(1) amortized
//! - **delete_min**, **delete**: O(log n) amortized
//!
//! Elements are caller-owned handles. Insert an [`Element`], keep it, and use
//! it later to lower its priority or remove it; [`Element::priority`] reports
//! whether it is still in a heap.
//!
//! # Example
//!
//! ```rust
//! use hollow_heap::{Element, HollowHeap};
//!
//! let mut heap = HollowHeap::new();
//! let far = Element::new("far");
//! heap.insert(&far, 100).unwrap();
//! heap.push(10, "near");
//!
//! heap.decrease_key(&far, 1).unwrap();
//! assert_eq!(heap.find_min().map(|e| *e.payload()), Some("far"));
//! assert_eq!(far.priority(), Some(1));
//! ```

pub mod element;
mod engine;
pub mod error;
pub mod hollow;
pub mod pathfinding;
pub mod rank;

#[cfg(test)]
mod testing;

pub use element::Element;
pub use error::{HeapError, InvalidOperation};
pub use hollow::HollowHeap;
