use slotmap::SlotMap;

use crate::error::{Result, SweepError};

use super::mono::MonoId;

slotmap::new_key_type! {
    /// Unique identifier for a node in the sweep status list.
    pub struct StatusId;
}

#[derive(Debug, Clone, Copy)]
struct StatusNode {
    mono: MonoId,
    below: Option<StatusId>,
    above: Option<StatusId>,
}

/// Doubly linked list of active segments stored in an arena.
#[derive(Debug, Clone, Default)]
pub struct StatusList {
    nodes: SlotMap<StatusId, StatusNode>,
    bottom: Option<StatusId>,
}

impl StatusList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node(&self, id: StatusId) -> Result<&StatusNode> {
        self.nodes.get(id).ok_or_else(|| SweepError::MissingStatus.into())
    }

    /// The segment held by a node.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingStatus`] for an unknown node.
    pub fn mono(&self, id: StatusId) -> Result<MonoId> {
        Ok(self.node(id)?.mono)
    }

    /// Replaces the segment held by a node, keeping its position.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingStatus`] for an unknown node.
    pub fn set_mono(&mut self, id: StatusId, mono: MonoId) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(SweepError::MissingStatus)?;
        node.mono = mono;
        Ok(())
    }

    /// Inserts a segment directly above `below`, or at the bottom.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingStatus`] if `below` is unknown.
    pub fn insert_above(&mut self, below: Option<StatusId>, mono: MonoId) -> Result<StatusId> {
        let above = match below {
            Some(b) => self.node(b)?.above,
            None => self.bottom,
        };
        let id = self.nodes.insert(StatusNode { mono, below, above });
        match below {
            Some(b) => {
                if let Some(n) = self.nodes.get_mut(b) {
                    n.above = Some(id);
                }
            }
            None => self.bottom = Some(id),
        }
        if let Some(a) = above {
            if let Some(n) = self.nodes.get_mut(a) {
                n.below = Some(id);
            }
        }
        Ok(id)
    }

    /// Unlinks a node and returns its former neighbors `(below, above)`.
    ///
    /// # Errors
    ///
    /// Returns [`SweepError::MissingStatus`] for an unknown node.
    pub fn remove(&mut self, id: StatusId) -> Result<(Option<StatusId>, Option<StatusId>)> {
        let node = self.nodes.remove(id).ok_or(SweepError::MissingStatus)?;
        match node.below {
            Some(b) => {
                if let Some(n) = self.nodes.get_mut(b) {
                    n.above = node.above;
                }
            }
            None => self.bottom = node.above,
        }
        if let Some(a) = node.above {
            if let Some(n) = self.nodes.get_mut(a) {
                n.below = node.below;
            }
        }
        Ok((node.below, node.above))
    }

    /// The node directly above `id`, `None` at the top or for an unknown node.
    #[must_use]
    pub fn above(&self, id: StatusId) -> Option<StatusId> {
        self.nodes.get(id).and_then(|n| n.above)
    }

    /// Nodes from bottom to top.
    #[must_use]
    pub fn iter(&self) -> StatusIter<'_> {
        StatusIter {
            list: self,
            cursor: self.bottom,
        }
    }

    /// Nodes strictly above `id`, bottom to top.
    #[must_use]
    pub fn iter_above(&self, id: StatusId) -> StatusIter<'_> {
        StatusIter {
            list: self,
            cursor: self.nodes.get(id).and_then(|n| n.above),
        }
    }
}

/// Iterator over `(node, segment)` pairs of a [`StatusList`].
pub struct StatusIter<'a> {
    list: &'a StatusList,
    cursor: Option<StatusId>,
}

impl Iterator for StatusIter<'_> {
    type Item = (StatusId, MonoId);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let node = self.list.nodes.get(id)?;
        self.cursor = node.above;
        Some((id, node.mono))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slotmap::SlotMap;

    use super::*;

    fn monos(n: usize) -> Vec<MonoId> {
        let mut arena: SlotMap<MonoId, ()> = SlotMap::with_key();
        (0..n).map(|_| arena.insert(())).collect()
    }

    fn order(list: &StatusList) -> Vec<MonoId> {
        list.iter().map(|(_, m)| m).collect()
    }

    #[test]
    fn insert_and_remove_keep_links() {
        let m = monos(4);
        let mut list = StatusList::new();
        let n0 = list.insert_above(None, m[0]).unwrap();
        let n2 = list.insert_above(Some(n0), m[2]).unwrap();
        let n1 = list.insert_above(Some(n0), m[1]).unwrap();
        let n3 = list.insert_above(None, m[3]).unwrap();
        assert_eq!(order(&list), vec![m[3], m[0], m[1], m[2]]);
        let above: Vec<MonoId> = list.iter_above(n0).map(|(_, id)| id).collect();
        assert_eq!(above, vec![m[1], m[2]]);

        assert_eq!(list.remove(n1).unwrap(), (Some(n0), Some(n2)));
        assert_eq!(list.above(n0), Some(n2));
        assert_eq!(list.above(n1), None);
        assert_eq!(order(&list), vec![m[3], m[0], m[2]]);
        assert_eq!(list.remove(n3).unwrap(), (None, Some(n0)));
        assert_eq!(list.iter().next().map(|(id, _)| id), Some(n0));
        assert_eq!(list.len(), 2);
        assert!(list.remove(n3).is_err());
    }

    #[test]
    fn iteration_above_a_node() {
        let m = monos(3);
        let mut list = StatusList::new();
        let n0 = list.insert_above(None, m[0]).unwrap();
        let n1 = list.insert_above(Some(n0), m[1]).unwrap();
        list.insert_above(Some(n1), m[2]).unwrap();
        let above: Vec<MonoId> = list.iter_above(n0).map(|(_, id)| id).collect();
        assert_eq!(above, vec![m[1], m[2]]);
        list.set_mono(n1, m[0]).unwrap();
        assert_eq!(list.mono(n1).unwrap(), m[0]);
    }
}
