use std::cmp::Ordering;

use slotmap::SecondaryMap;

use super::event::{EventId, EventKey};

#[derive(Debug, Clone)]
pub struct EventQueue {
    heap: Vec<(EventId, EventKey)>,
    index: SecondaryMap<EventId, usize>,
    point_eps: f64,
    slope_eps: f64,
}

impl EventQueue {
    #[must_use]
    pub fn new(point_eps: f64, slope_eps: f64) -> Self {
        Self {
            heap: Vec::new(),
            index: SecondaryMap::new(),
            point_eps,
            slope_eps,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// The smallest event, left in place.
    #[must_use]
    pub fn peek(&self) -> Option<EventId> {
        self.heap.first().map(|(id, _)| *id)
    }

    /// Inserts an event, or re-keys it if already queued.
    pub fn push(&mut self, id: EventId, key: EventKey) {
        if self.update(id, key) {
            return;
        }
        self.heap.push((id, key));
        let i = self.heap.len() - 1;
        self.index.insert(id, i);
        self.sift_up(i);
    }

    /// Removes and returns the smallest event.
    pub fn pop(&mut self) -> Option<EventId> {
        let id = self.peek()?;
        self.remove(id);
        Some(id)
    }

    /// Removes an event. Returns `false` if it was not queued.
    pub fn remove(&mut self, id: EventId) -> bool {
        let Some(i) = self.index.remove(id) else {
            return false;
        };
        self.heap.swap_remove(i);
        if i < self.heap.len() {
            self.index.insert(self.heap[i].0, i);
            let i = self.sift_up(i);
            self.sift_down(i);
        }
        true
    }

    /// Replaces the key of a queued event. Returns `false` if it was not
    /// queued.
    pub fn update(&mut self, id: EventId, key: EventKey) -> bool {
        let Some(&i) = self.index.get(id) else {
            return false;
        };
        self.heap[i].1 = key;
        let i = self.sift_up(i);
        self.sift_down(i);
        true
    }

    fn less(&self, i: usize, j: usize) -> bool {
        self.heap[i].1.compare(&self.heap[j].1, self.point_eps, self.slope_eps) == Ordering::Less
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.index.insert(self.heap[i].0, i);
        self.index.insert(self.heap[j].0, j);
    }

    fn sift_up(&mut self, mut i: usize) -> usize {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !self.less(i, parent) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
        i
    }

    fn sift_down(&mut self, mut i: usize) {
        loop {
            let (l, r) = (2 * i + 1, 2 * i + 2);
            let mut smallest = i;
            if l < self.heap.len() && self.less(l, smallest) {
                smallest = l;
            }
            if r < self.heap.len() && self.less(r, smallest) {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::geometry::curve::Curve;
    use crate::math::tolerance::Tolerance;
    use crate::math::Point2;
    use crate::operations::boolean::event::SlopeKey;

    fn key(x: f64, y: f64, seq: u64) -> EventKey {
        let flat = Curve::segment(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        EventKey {
            point: Point2::new(x, y),
            is_enter: true,
            slope: SlopeKey::at(&flat, 0.0, &Tolerance::default()),
            seq,
        }
    }

    fn drain(queue: &mut EventQueue) -> Vec<EventId> {
        std::iter::from_fn(|| queue.pop()).collect()
    }

    #[test]
    fn pops_in_sweep_order() {
        let mut ids: SlotMap<EventId, ()> = SlotMap::with_key();
        let mut queue = EventQueue::new(1e-9, 1e-6);
        let coords = [(3.0, 0.0), (1.0, 2.0), (1.0, -1.0), (0.0, 9.0), (2.0, 2.0)];
        let keys: Vec<EventId> = coords
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| {
                let id = ids.insert(());
                queue.push(id, key(x, y, i as u64));
                id
            })
            .collect();
        assert_eq!(queue.len(), 5);
        assert_eq!(drain(&mut queue), vec![keys[3], keys[2], keys[1], keys[4], keys[0]]);
        assert!(queue.is_empty());
    }

    #[test]
    fn updates_and_removals_keep_the_heap_ordered() {
        let mut ids: SlotMap<EventId, ()> = SlotMap::with_key();
        let mut queue = EventQueue::new(1e-9, 1e-6);
        let all: Vec<EventId> = (0..8u32)
            .map(|i| {
                let id = ids.insert(());
                queue.push(id, key(f64::from(i), 0.0, u64::from(i)));
                id
            })
            .collect();
        assert!(queue.remove(all[0]));
        assert!(!queue.remove(all[0]));
        assert!(queue.update(all[5], key(-1.0, 0.0, 5)));
        assert!(queue.remove(all[3]));
        assert_eq!(queue.peek(), Some(all[5]));
        assert_eq!(queue.len(), 6);
        assert_eq!(drain(&mut queue), vec![all[5], all[1], all[2], all[4], all[6], all[7]]);
    }

    #[test]
    fn equal_points_fall_back_to_sequence() {
        let mut ids: SlotMap<EventId, ()> = SlotMap::with_key();
        let mut queue = EventQueue::new(1e-9, 1e-6);
        let late = ids.insert(());
        let early = ids.insert(());
        queue.push(late, key(1.0, 1.0, 7));
        queue.push(early, key(1.0, 1.0 + 1e-12, 2));
        assert_eq!(queue.pop(), Some(early));
        assert_eq!(queue.pop(), Some(late));
        assert_eq!(queue.pop(), None);
    }
}
