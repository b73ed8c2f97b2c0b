//! Dijkstra's and A* search on top of [`HollowHeap`]
//!
//! Shortest-path search is the workload hollow heaps are built for: every
//! time a shorter route to a queued state turns up, its entry is lowered in
//! place with `decrease_key` instead of being pushed a second time.
//!
//! Only lightweight indices go into the heap. A fast hash map (FxHash) maps
//! each discovered state to its index in a table of per-state metadata.
//!
//! Dijkstra is A* with a zero heuristic; both share one search loop.
//!
//! # Example
//!
//! ```rust
//! use hollow_heap::pathfinding::{dijkstra, SearchNode};
//!
//! #[derive(Clone, PartialEq, Eq, Hash)]
//! struct GridPos { x: i32, y: i32, goal_x: i32, goal_y: i32 }
//!
//! impl SearchNode for GridPos {
//!     type Cost = u32;
//!
//!     fn successors(&self) -> Vec<(Self, Self::Cost)> {
//!         [(1, 0), (-1, 0), (0, 1), (0, -1)]
//!             .iter()
//!             .map(|&(dx, dy)| (GridPos { x: self.x + dx, y: self.y + dy, ..*self }, 1))
//!             .collect()
//!     }
//!
//!     fn is_goal(&self) -> bool {
//!         self.x == self.goal_x && self.y == self.goal_y
//!     }
//! }
//!
//! let start = GridPos { x: 0, y: 0, goal_x: 2, goal_y: 2 };
//! let (path, cost) = dijkstra(&start).unwrap();
//! assert_eq!(cost, 4);
//! assert_eq!(path.len(), 5);
//! ```

use std::cmp::Ordering;
use std::hash::Hash;
use std::ops::Add;

use log::debug;
use rustc_hash::FxHashMap;

use crate::element::Element;
use crate::hollow::HollowHeap;

/// Trait for types that can be used as path costs.
pub trait Cost: Ord + Copy + Add<Output = Self> + Default {}

impl<T> Cost for T where T: Ord + Copy + Add<Output = Self> + Default {}

/// A state in a search graph.
///
/// The state carries whatever context it needs to enumerate its successors
/// and to recognise a goal.
pub trait SearchNode: Clone + Eq + Hash {
    /// Edge weight type
    type Cost: Cost;

    /// Returns all neighbours along with the cost of the edge to each.
    fn successors(&self) -> Vec<(Self, Self::Cost)>;

    /// Returns true if this state ends the search.
    fn is_goal(&self) -> bool;
}

/// A state that can estimate its remaining distance to a goal.
///
/// The estimate must never exceed the true remaining cost for A* to return
/// optimal paths.
pub trait AStarNode: SearchNode {
    fn heuristic(&self) -> Self::Cost;
}

/// Heap priority for a queued state: ordered by f-score only.
#[derive(Debug, Clone, Copy)]
pub struct PriorityCost<C> {
    /// g + h (h is zero for Dijkstra)
    pub f_score: C,
    /// Cost from the start
    pub g_score: C,
}

impl<C: Ord> PartialEq for PriorityCost<C> {
    fn eq(&self, other: &Self) -> bool {
        self.f_score == other.f_score
    }
}

impl<C: Ord> Eq for PriorityCost<C> {}

impl<C: Ord> PartialOrd for PriorityCost<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord> Ord for PriorityCost<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score.cmp(&other.f_score)
    }
}

type NodeIndex = usize;

type QueueEntry<C> = Element<NodeIndex, PriorityCost<C>>;

/// Metadata for each discovered state
struct NodeEntry<N: SearchNode> {
    node: N,
    g_score: N::Cost,
    /// Heap entry while the state is queued
    queued: Option<QueueEntry<N::Cost>>,
    came_from: Option<NodeIndex>,
    closed: bool,
}

/// Open set plus the table of discovered states.
struct Search<N: SearchNode> {
    heap: HollowHeap<NodeIndex, PriorityCost<N::Cost>>,
    entries: Vec<NodeEntry<N>>,
    index_of: FxHashMap<N, NodeIndex>,
}

impl<N: SearchNode> Search<N> {
    fn new(start: &N, start_h: N::Cost) -> Self {
        let mut search = Search {
            heap: HollowHeap::new(),
            entries: Vec::new(),
            index_of: FxHashMap::default(),
        };
        let zero = N::Cost::default();
        search.discover(start.clone(), zero, start_h, None);
        search
    }

    /// Records a newly seen state and queues it.
    fn discover(&mut self, node: N, g: N::Cost, h: N::Cost, came_from: Option<NodeIndex>) {
        let index = self.entries.len();
        let queued = self.heap.push(
            PriorityCost {
                f_score: g + h,
                g_score: g,
            },
            index,
        );
        self.index_of.insert(node.clone(), index);
        self.entries.push(NodeEntry {
            node,
            g_score: g,
            queued: Some(queued),
            came_from,
            closed: false,
        });
    }

    /// Offers a route of cost `g` to `node` through `from`.
    fn relax(&mut self, node: N, g: N::Cost, h: N::Cost, from: NodeIndex) {
        let Some(&index) = self.index_of.get(&node) else {
            self.discover(node, g, h, Some(from));
            return;
        };

        let entry = &mut self.entries[index];
        if entry.closed || g >= entry.g_score {
            return;
        }
        entry.g_score = g;
        entry.came_from = Some(from);
        if let Some(queued) = &entry.queued {
            let priority = PriorityCost {
                f_score: g + h,
                g_score: g,
            };
            // h depends only on the state, so a lower g always lowers f.
            let _ = self.heap.decrease_key(queued, priority);
        }
    }

    /// Pops the next open state and closes it.
    fn next(&mut self) -> Option<(NodeIndex, N::Cost)> {
        let (priority, queued) = self.heap.pop()?;
        let index = *queued.payload();
        let entry = &mut self.entries[index];
        entry.closed = true;
        entry.queued = None;
        Some((index, priority.g_score))
    }

    fn path_to(&self, mut current: NodeIndex) -> Vec<N> {
        let mut path = vec![self.entries[current].node.clone()];
        while let Some(prev) = self.entries[current].came_from {
            path.push(self.entries[prev].node.clone());
            current = prev;
        }
        path.reverse();
        path
    }
}

/// Runs Dijkstra's algorithm from `start` until a state satisfies
/// [`SearchNode::is_goal`].
///
/// Returns the path (start and goal inclusive) and its cost, or `None` if no
/// goal is reachable.
pub fn dijkstra<N: SearchNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    search(start, |_| N::Cost::default())
}

/// Runs A* search from `start`, guided by [`AStarNode::heuristic`].
pub fn astar<N: AStarNode>(start: &N) -> Option<(Vec<N>, N::Cost)> {
    search(start, |n| n.heuristic())
}

fn search<N: SearchNode>(
    start: &N,
    heuristic: impl Fn(&N) -> N::Cost,
) -> Option<(Vec<N>, N::Cost)> {
    let mut search = Search::new(start, heuristic(start));

    while let Some((current, g)) = search.next() {
        let node = search.entries[current].node.clone();
        if node.is_goal() {
            debug!("search: goal reached after discovering {} states", search.entries.len());
            return Some((search.path_to(current), g));
        }

        for (neighbor, edge_cost) in node.successors() {
            let h = heuristic(&neighbor);
            search.relax(neighbor, g + edge_cost, h, current);
        }
    }

    debug!("search: exhausted {} states without reaching a goal", search.entries.len());
    None
}

/// Returns every state reachable from `start` at cost at most `max_cost`,
/// with its distance, in nondecreasing order of distance.
pub fn reachable_within<N: SearchNode>(start: &N, max_cost: N::Cost) -> Vec<(N, N::Cost)> {
    let mut search = Search::new(start, N::Cost::default());
    let mut result = Vec::new();

    while let Some((current, g)) = search.next() {
        if g > max_cost {
            break;
        }
        let node = search.entries[current].node.clone();
        for (neighbor, edge_cost) in node.successors() {
            let tentative = g + edge_cost;
            if tentative <= max_cost {
                search.relax(neighbor, tentative, N::Cost::default(), current);
            }
        }
        result.push((node, g));
    }

    result
}
