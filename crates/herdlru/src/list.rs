//! Slab-backed doubly linked list
//!
//! Nodes live in a `Vec` and point at each other by index, so linking,
//! unlinking and moving to the front are O(1) and freed slots are reused.

/// Node in the recency list
struct Node<T> {
    item: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Recency list, front = most recently touched, back = least
pub(crate) struct List<T> {
    nodes: Vec<Option<Node<T>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> List<T> {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Link a new item at the front and return its slot
    pub(crate) fn push_front(&mut self, item: T) -> usize {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            item,
            prev: None,
            next: self.head,
        });

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }

        self.len += 1;
        idx
    }

    pub(crate) fn get(&self, idx: usize) -> Option<&T> {
        self.nodes
            .get(idx)
            .and_then(|slot| slot.as_ref())
            .map(|node| &node.item)
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.nodes
            .get_mut(idx)
            .and_then(|slot| slot.as_mut())
            .map(|node| &mut node.item)
    }

    pub(crate) fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) || self.get(idx).is_none() {
            return;
        }

        self.unlink(idx);

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = self.head;
        }

        if let Some(head_idx) = self.head {
            if let Some(head) = &mut self.nodes[head_idx] {
                head.prev = Some(idx);
            }
        }

        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }

    /// Unlink the item in `idx` and hand it back
    pub(crate) fn remove(&mut self, idx: usize) -> Option<T> {
        self.get(idx)?;
        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some(node.item)
    }

    pub(crate) fn pop_back(&mut self) -> Option<T> {
        let tail_idx = self.tail?;
        self.remove(tail_idx)
    }

    /// Iterate front (most recent) to back
    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

pub(crate) struct Iter<'a, T> {
    list: &'a List<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.list.nodes[idx].as_ref()?;
        self.cursor = node.next;
        Some(&node.item)
    }
}
