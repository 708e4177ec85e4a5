//! Integer-keyed binary tree filled breadth-first
//!
//! Two distinct structural notions live here and must not be conflated:
//!
//! - *complete* (the insertion discipline): a new node goes to the first node,
//!   in breadth-first left-to-right order, that lacks a left child, else to the
//!   first that lacks a right child;
//! - *full* (the [`CompleteBinaryTree::is_full`] predicate): every node has
//!   zero or two children.
//!
//! Insertion always keeps the first; the second is reported, not enforced.
//! Each node owns its subtrees through `Box`; there are no parent links.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use crate::error::DsdbError;

#[derive(Debug, Clone)]
struct TreeNode {
    key: i64,
    value: String,
    left: Option<Box<TreeNode>>,
    right: Option<Box<TreeNode>>,
}

impl TreeNode {
    fn leaf(key: i64, value: String) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
        })
    }
}

/// Traversal orders supported by [`CompleteBinaryTree::iter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// node, left, right
    PreOrder,
    /// left, node, right
    InOrder,
    /// left, right, node
    PostOrder,
    /// breadth-first, left before right
    LevelOrder,
}

impl TraversalOrder {
    /// All orders, in the order the shell lists them
    pub const ALL: [TraversalOrder; 4] = [
        TraversalOrder::InOrder,
        TraversalOrder::PreOrder,
        TraversalOrder::PostOrder,
        TraversalOrder::LevelOrder,
    ];

    /// Heading used when rendering a traversal
    pub fn label(self) -> &'static str {
        match self {
            Self::PreOrder => "PREORDER",
            Self::InOrder => "INORDER",
            Self::PostOrder => "POSTORDER",
            Self::LevelOrder => "LEVEL ORDER",
        }
    }
}

impl FromStr for TraversalOrder {
    type Err = DsdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PREORDER" | "PRE" => Ok(Self::PreOrder),
            "INORDER" | "IN" => Ok(Self::InOrder),
            "POSTORDER" | "POST" => Ok(Self::PostOrder),
            "LEVEL" | "LEVELORDER" | "BFS" => Ok(Self::LevelOrder),
            _ => Err(DsdbError::invalid_argument(format!(
                "unknown traversal order '{}', use INORDER/PREORDER/POSTORDER/LEVEL",
                s
            ))),
        }
    }
}

/// Binary tree with breadth-first insertion
///
/// Keys need not be unique; [`search`](Self::search) returns the first match
/// in pre-order.
///
/// # Examples
///
/// ```rust
/// use dsdb::{CompleteBinaryTree, TraversalOrder};
///
/// let mut tree = CompleteBinaryTree::new();
/// for key in 1..=7 {
///     tree.insert(key, format!("v{}", key));
/// }
/// let keys: Vec<i64> = tree.iter(TraversalOrder::LevelOrder).map(|(k, _)| k).collect();
/// assert_eq!(keys, vec![1, 2, 3, 4, 5, 6, 7]);
/// assert!(tree.is_full());
/// assert_eq!(tree.height(), 3);
/// ```
#[derive(Clone, Default)]
pub struct CompleteBinaryTree {
    root: Option<Box<TreeNode>>,
    len: usize,
}

impl CompleteBinaryTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the tree is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Key and value of the root
    pub fn root(&self) -> Option<(i64, &str)> {
        self.root.as_deref().map(|n| (n.key, n.value.as_str()))
    }

    /// Insert at the first free breadth-first slot
    ///
    /// Never fails; the return value is kept for symmetry with the other
    /// containers' positional operations.
    pub fn insert<S: Into<String>>(&mut self, key: i64, value: S) -> bool {
        let value = value.into();
        let Some(root) = self.root.as_deref_mut() else {
            self.root = Some(TreeNode::leaf(key, value));
            self.len = 1;
            return true;
        };

        // Heap numbering: root is 1, children of n are 2n and 2n+1. The
        // binary digits after the leading one spell the path from the root.
        let slot = Self::first_free_slot(root);
        let depth = 63 - slot.leading_zeros();
        let mut node = root;
        for bit in (1..depth).rev() {
            let child = if slot & (1 << bit) == 0 { &mut node.left } else { &mut node.right };
            node = match child.as_deref_mut() {
                Some(next) => next,
                None => unreachable!("breadth-first path crosses a missing child"),
            };
        }
        let target = if slot & 1 == 0 { &mut node.left } else { &mut node.right };
        debug_assert!(target.is_none());
        *target = Some(TreeNode::leaf(key, value));
        self.len += 1;
        true
    }

    /// Heap number of the first missing child in breadth-first order
    fn first_free_slot(root: &TreeNode) -> u64 {
        let mut queue: VecDeque<(&TreeNode, u64)> = VecDeque::new();
        queue.push_back((root, 1));
        while let Some((node, number)) = queue.pop_front() {
            match (node.left.as_deref(), node.right.as_deref()) {
                (None, _) => return number * 2,
                (Some(_), None) => return number * 2 + 1,
                (Some(left), Some(right)) => {
                    queue.push_back((left, number * 2));
                    queue.push_back((right, number * 2 + 1));
                }
            }
        }
        unreachable!("a finite tree always has a free slot")
    }

    /// Value of the first node with `key` in pre-order
    pub fn search(&self, key: i64) -> Option<&str> {
        fn walk(node: Option<&TreeNode>, key: i64) -> Option<&str> {
            let node = node?;
            if node.key == key {
                return Some(node.value.as_str());
            }
            walk(node.left.as_deref(), key).or_else(|| walk(node.right.as_deref(), key))
        }
        walk(self.root.as_deref(), key)
    }

    /// Check that every node has zero or two children
    ///
    /// Independent of the insertion discipline: a tree built only through
    /// [`insert`](Self::insert) is not full whenever its last node is a lone
    /// left child. The empty tree counts as full.
    pub fn is_full(&self) -> bool {
        fn full(node: &TreeNode) -> bool {
            match (node.left.as_deref(), node.right.as_deref()) {
                (None, None) => true,
                (Some(l), Some(r)) => full(l) && full(r),
                _ => false,
            }
        }
        self.root.as_deref().map_or(true, full)
    }

    /// Number of levels; 0 for the empty tree
    pub fn height(&self) -> usize {
        fn height(node: Option<&TreeNode>) -> usize {
            match node {
                None => 0,
                Some(n) => 1 + height(n.left.as_deref()).max(height(n.right.as_deref())),
            }
        }
        height(self.root.as_deref())
    }

    /// Remove every node
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Lazy `(key, value)` traversal in the given order
    pub fn iter(&self, order: TraversalOrder) -> Traversal<'_> {
        let frontier = match order {
            TraversalOrder::LevelOrder => Frontier::Queue(self.root.as_deref().into_iter().collect()),
            _ => Frontier::Stack(self.root.as_deref().map(|n| (n, false)).into_iter().collect()),
        };
        Traversal { order, frontier }
    }

    /// Render one traversal as a single line, `ORDER: (k: v) (k: v)`
    pub fn render(&self, order: TraversalOrder) -> String {
        let mut line = format!("{}:", order.label());
        for (key, value) in self.iter(order) {
            line.push_str(&format!(" ({}: {})", key, value));
        }
        line
    }
}

enum Frontier<'a> {
    // (node, expanded): an expanded node is emitted when popped
    Stack(Vec<(&'a TreeNode, bool)>),
    Queue(VecDeque<&'a TreeNode>),
}

/// Lazy iterator returned by [`CompleteBinaryTree::iter`]
pub struct Traversal<'a> {
    order: TraversalOrder,
    frontier: Frontier<'a>,
}

impl<'a> Iterator for Traversal<'a> {
    type Item = (i64, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.frontier {
            Frontier::Queue(queue) => {
                let node = queue.pop_front()?;
                queue.extend(node.left.as_deref());
                queue.extend(node.right.as_deref());
                Some((node.key, node.value.as_str()))
            }
            Frontier::Stack(stack) => loop {
                let (node, expanded) = stack.pop()?;
                if expanded {
                    return Some((node.key, node.value.as_str()));
                }
                let left = node.left.as_deref().map(|n| (n, false));
                let right = node.right.as_deref().map(|n| (n, false));
                // Pushed in reverse of the desired emission order.
                match self.order {
                    TraversalOrder::PreOrder => {
                        stack.extend(right);
                        stack.extend(left);
                        return Some((node.key, node.value.as_str()));
                    }
                    TraversalOrder::InOrder => {
                        stack.extend(right);
                        stack.push((node, true));
                        stack.extend(left);
                    }
                    TraversalOrder::PostOrder => {
                        stack.push((node, true));
                        stack.extend(right);
                        stack.extend(left);
                    }
                    TraversalOrder::LevelOrder => unreachable!("level order uses the queue frontier"),
                }
            },
        }
    }
}

impl fmt::Debug for CompleteBinaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompleteBinaryTree")
            .field("len", &self.len)
            .field("level_order", &self.iter(TraversalOrder::LevelOrder).collect::<Vec<_>>())
            .finish()
    }
}

/// Sideways view: right subtree above, left below, four spaces per level
impl fmt::Display for CompleteBinaryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn draw(node: Option<&TreeNode>, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let Some(node) = node else {
                return Ok(());
            };
            draw(node.right.as_deref(), level + 1, f)?;
            writeln!(f)?;
            write!(f, "{}({}: {})", "    ".repeat(level), node.key, node.value)?;
            draw(node.left.as_deref(), level + 1, f)
        }
        write!(f, "TREE:")?;
        draw(self.root.as_deref(), 0, f)
    }
}

/// Two trees are equal when their level-order emissions match, which for
/// breadth-first-built trees also means equal shape.
impl PartialEq for CompleteBinaryTree {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter(TraversalOrder::LevelOrder)
                .eq(other.iter(TraversalOrder::LevelOrder))
    }
}

impl Eq for CompleteBinaryTree {}
