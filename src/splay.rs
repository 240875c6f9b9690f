//! Self-adjusting binary search tree keyed on normalized words.
//!
//! Every access splays the touched node to the root with zig-zig / zig-zag
//! rotations (and their mirrors), finishing with a single zig when the target
//! sits one level below the current subtree root. Subtrees are owned
//! `Option<Box<Node>>` handles, so a rotation is a sequence of moves rather
//! than pointer rewiring; no node is ever reachable from two parents.
//!
//! The splay is the classic bottom-up recursion, unrolled onto an explicit
//! frame stack. Sorted input produces a degenerate tree whose depth equals the
//! number of distinct words, and native recursion over that depth would
//! exhaust the thread stack on large documents.

use std::cmp::Ordering;

use crate::record::OccurrenceRecord;

type Link = Option<Box<Node>>;

#[derive(Debug)]
struct Node {
    record: OccurrenceRecord,
    left: Link,
    right: Link,
}

impl Node {
    fn leaf(word: &str) -> Box<Self> {
        Box::new(Self {
            record: OccurrenceRecord::new(word),
            left: None,
            right: None,
        })
    }

    fn word(&self) -> &str {
        self.record.word()
    }
}

/// Promote the left child above `node` (zig). No-op without a left child.
fn rotate_right(mut node: Box<Node>) -> Box<Node> {
    match node.left.take() {
        Some(mut pivot) => {
            node.left = pivot.right.take();
            pivot.right = Some(node);
            pivot
        }
        None => node,
    }
}

/// Promote the right child above `node` (zag). No-op without a right child.
fn rotate_left(mut node: Box<Node>) -> Box<Node> {
    match node.right.take() {
        Some(mut pivot) => {
            node.right = pivot.left.take();
            pivot.left = Some(node);
            pivot
        }
        None => node,
    }
}

/// Which grandchild of `parent` the descent continued into.
#[derive(Debug, Clone, Copy)]
enum Turn {
    LeftLeft,
    LeftRight,
    RightLeft,
    RightRight,
}

/// One suspended level of the splay: `child` has been detached from `parent`
/// and the grandchild on the `turn` side has been detached from `child`.
struct Frame {
    parent: Box<Node>,
    child: Box<Node>,
    turn: Turn,
}

impl Frame {
    /// Reattach the splayed grandchild subtree and rotate it up two levels.
    fn finish(self, splayed: Link) -> Box<Node> {
        let Frame {
            mut parent,
            mut child,
            turn,
        } = self;
        match turn {
            Turn::LeftLeft => {
                child.left = splayed;
                parent.left = Some(child);
                rotate_right(rotate_right(parent))
            }
            Turn::LeftRight => {
                child.right = splayed;
                parent.left = Some(rotate_left(child));
                rotate_right(parent)
            }
            Turn::RightLeft => {
                child.left = splayed;
                parent.right = Some(rotate_right(child));
                rotate_left(parent)
            }
            Turn::RightRight => {
                child.right = splayed;
                parent.right = Some(child);
                rotate_left(rotate_left(parent))
            }
        }
    }
}

/// Splay `word` towards the root of `root`.
///
/// Returns the node holding `word` as the new root, or, when `word` is
/// absent, the last node on the search path (an in-order neighbour of the
/// position where `word` belongs).
fn splay(root: Box<Node>, word: &str) -> Box<Node> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut node = root;

    let mut splayed = loop {
        match word.cmp(node.word()) {
            Ordering::Equal => break node,
            Ordering::Less => {
                let Some(mut child) = node.left.take() else {
                    break node;
                };
                let (grandchild, turn) = match word.cmp(child.word()) {
                    Ordering::Equal => {
                        node.left = Some(child);
                        break rotate_right(node);
                    }
                    Ordering::Less => (child.left.take(), Turn::LeftLeft),
                    Ordering::Greater => (child.right.take(), Turn::LeftRight),
                };
                let frame = Frame {
                    parent: node,
                    child,
                    turn,
                };
                match grandchild {
                    Some(next) => {
                        frames.push(frame);
                        node = next;
                    }
                    None => break frame.finish(None),
                }
            }
            Ordering::Greater => {
                let Some(mut child) = node.right.take() else {
                    break node;
                };
                let (grandchild, turn) = match word.cmp(child.word()) {
                    Ordering::Equal => {
                        node.right = Some(child);
                        break rotate_left(node);
                    }
                    Ordering::Less => (child.left.take(), Turn::RightLeft),
                    Ordering::Greater => (child.right.take(), Turn::RightRight),
                };
                let frame = Frame {
                    parent: node,
                    child,
                    turn,
                };
                match grandchild {
                    Some(next) => {
                        frames.push(frame);
                        node = next;
                    }
                    None => break frame.finish(None),
                }
            }
        }
    };

    while let Some(frame) = frames.pop() {
        splayed = frame.finish(Some(splayed));
    }
    splayed
}

/// Word → [`OccurrenceRecord`] map that moves each accessed word to the root.
#[derive(Debug, Default)]
pub struct SplayTree {
    root: Link,
    len: usize,
}

impl SplayTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root_word(&self) -> Option<&str> {
        self.root.as_deref().map(Node::word)
    }

    /// Locate `word`, creating its node when absent, and leave that node at
    /// the root. The returned record is the root's record.
    ///
    /// A new node takes the splayed root as its right child when `word`
    /// sorts before it (inheriting the root's left subtree), or as its left
    /// child when `word` sorts after it (inheriting the right subtree).
    pub fn find_or_create(&mut self, word: &str) -> &mut OccurrenceRecord {
        let root = match self.root.take() {
            None => {
                self.len += 1;
                Node::leaf(word)
            }
            Some(root) => {
                let mut root = splay(root, word);
                match word.cmp(root.word()) {
                    Ordering::Equal => root,
                    Ordering::Less => {
                        let mut node = Node::leaf(word);
                        node.left = root.left.take();
                        node.right = Some(root);
                        self.len += 1;
                        node
                    }
                    Ordering::Greater => {
                        let mut node = Node::leaf(word);
                        node.right = root.right.take();
                        node.left = Some(root);
                        self.len += 1;
                        node
                    }
                }
            }
        };
        &mut self.root.insert(root).record
    }

    /// Splaying lookup. Restructures the tree even when `word` is absent.
    pub fn find(&mut self, word: &str) -> Option<&OccurrenceRecord> {
        let root = splay(self.root.take()?, word);
        let root = self.root.insert(root);
        (root.word() == word).then_some(&root.record)
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let mut max = 0;
        let mut stack: Vec<(&Node, usize)> =
            self.root.as_deref().map(|n| (n, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            max = max.max(depth);
            if let Some(left) = node.left.as_deref() {
                stack.push((left, depth + 1));
            }
            if let Some(right) = node.right.as_deref() {
                stack.push((right, depth + 1));
            }
        }
        max
    }

    /// In-order traversal: records in ascending byte order of their words.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref())
    }

    /// Consume the tree, yielding its records in ascending order.
    pub fn into_records(mut self) -> Vec<OccurrenceRecord> {
        let mut records = Vec::with_capacity(self.len);
        let mut stack: Vec<Box<Node>> = Vec::new();
        let mut link = self.root.take();
        loop {
            while let Some(mut node) = link {
                link = node.left.take();
                stack.push(node);
            }
            let Some(node) = stack.pop() else {
                break;
            };
            let Node { record, right, .. } = *node;
            records.push(record);
            link = right;
        }
        records
    }
}

impl Drop for SplayTree {
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<'a> IntoIterator for &'a SplayTree {
    type Item = &'a OccurrenceRecord;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct Iter<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iter<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.push_left(root);
        iter
    }

    fn push_left(&mut self, mut link: Option<&'a Node>) {
        while let Some(node) = link {
            self.stack.push(node);
            link = node.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a OccurrenceRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(&node.record)
    }
}
