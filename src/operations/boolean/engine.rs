use std::cmp::Ordering;
use std::collections::HashSet;

use slotmap::{Key, SecondaryMap, SlotMap};
use tracing::{debug, trace, warn};

use crate::error::{Result, SweepError};
use crate::geometry::contour::Contour;
use crate::geometry::curve::Curve;
use crate::math::tolerance::Tolerance;
use crate::math::{compare_points, Point2};
use crate::operations::intersect::{Intersector, Overlap};

use super::event::{EventId, EventKey, SlopeKey, SweepEvent};
use super::fill::{Fill, FillRule, Snapshot, Windings};
use super::mono::{decompose, CurveRef, Cut, MonoId, MonoSegment, MonoState, TrajectoryId};
use super::queue::EventQueue;
use super::select::{select_boundary, BooleanOp, BoundarySegment};
use super::status::{StatusId, StatusList};

/// A resolved piece of the input with the fill on both of its sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepSegment {
    /// The geometry, running from `enter` to `leave`.
    pub curve: Curve,
    pub enter: Point2,
    pub leave: Point2,
    pub is_primary: bool,
    pub origin: CurveRef,
    /// Winding contributions, including those of merged coincident pieces.
    pub windings: Windings,
    pub fill: Fill,
}

/// Output of [`Sweep::execute`].
#[derive(Debug, Clone, Default)]
pub struct SweepResult {
    /// Monotone segments meeting each other only at their ends.
    pub segments: Vec<SweepSegment>,
    /// Number of segment pairs whose intersection split at least one of them.
    pub resolved_intersections: usize,
}

/// Resolves two operands into non-crossing segments carrying fill flags.
#[derive(Debug, Clone)]
pub struct Sweep {
    primary: Vec<Contour>,
    secondary: Vec<Contour>,
    primary_rule: FillRule,
    secondary_rule: FillRule,
    tolerance: Tolerance,
}

impl Sweep {
    /// Creates a sweep over two operands with non-zero fill rules and the
    /// default tolerance.
    #[must_use]
    pub fn new(primary: Vec<Contour>, secondary: Vec<Contour>) -> Self {
        Self {
            primary,
            secondary,
            primary_rule: FillRule::default(),
            secondary_rule: FillRule::default(),
            tolerance: Tolerance::default(),
        }
    }

    #[must_use]
    pub fn with_fill_rules(mut self, primary: FillRule, secondary: FillRule) -> Self {
        self.primary_rule = primary;
        self.secondary_rule = secondary;
        self
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Runs the sweep.
    ///
    /// # Errors
    ///
    /// Returns a [`GeometryError`](crate::error::GeometryError) for invalid
    /// or too tiny input pieces, an
    /// [`IntersectionError`](crate::error::IntersectionError) if a pair of
    /// segments cannot be intersected, and a [`SweepError`] if the engine's
    /// bookkeeping breaks.
    pub fn execute(&self) -> Result<SweepResult> {
        let mut state = SweepState::new(&self.tolerance, self.primary_rule, self.secondary_rule);
        state.add_operand(&self.primary, true)?;
        state.add_operand(&self.secondary, false)?;
        debug!(
            segments = state.monos.len(),
            events = state.queue.len(),
            "sweep started"
        );
        state.run()?;
        let result = state.finish()?;
        debug!(
            segments = result.segments.len(),
            resolved = result.resolved_intersections,
            "sweep finished"
        );
        Ok(result)
    }
}

/// Runs a sweep and selects the boundary of `op`.
///
/// # Errors
///
/// See [`Sweep::execute`].
pub fn boolean_execute(sweep: &Sweep, op: BooleanOp) -> Result<Vec<BoundarySegment>> {
    let result = sweep.execute()?;
    let boundary = select_boundary(&result, op);
    debug!(?op, kept = boundary.len(), "boundary selected");
    Ok(boundary)
}

/// Order-independent key of a segment pair.
fn pair_key(a: MonoId, b: MonoId) -> (u64, u64) {
    let (x, y) = (a.data().as_ffi(), b.data().as_ffi());
    (x.min(y), x.max(y))
}

/// Moves `point` onto the first of `ends` within `near` of it.
fn snap(point: Point2, ends: &[Point2], near: f64) -> Point2 {
    ends.iter()
        .copied()
        .find(|e| (e - point).norm() <= near)
        .unwrap_or(point)
}

fn same_span(a: &MonoSegment, b: &MonoSegment, near: f64) -> bool {
    (a.enter - b.enter).norm() <= near && (a.leave - b.leave).norm() <= near
}

struct SweepState<'a> {
    tol: &'a Tolerance,
    primary_rule: FillRule,
    secondary_rule: FillRule,
    monos: SlotMap<MonoId, MonoSegment>,
    events: SlotMap<EventId, SweepEvent>,
    mono_events: SecondaryMap<MonoId, (EventId, EventId)>,
    queue: EventQueue,
    status: StatusList,
    visited: HashSet<(u64, u64)>,
    snapshot: Option<Snapshot>,
    /// Leave events filled at `pending_at` whose nodes are still listed.
    pending: Vec<(EventId, StatusId)>,
    pending_at: Option<Point2>,
    /// Status nodes that became neighbors and still need intersecting.
    adjacencies: Vec<(StatusId, StatusId)>,
    sweep_x: f64,
    next_seq: u64,
    next_trajectory: u32,
    resolved: usize,
}

impl<'a> SweepState<'a> {
    fn new(tol: &'a Tolerance, primary_rule: FillRule, secondary_rule: FillRule) -> Self {
        Self {
            tol,
            primary_rule,
            secondary_rule,
            monos: SlotMap::with_key(),
            events: SlotMap::with_key(),
            mono_events: SecondaryMap::new(),
            queue: EventQueue::new(tol.epsilon, tol.time_epsilon),
            status: StatusList::new(),
            visited: HashSet::new(),
            snapshot: None,
            pending: Vec::new(),
            pending_at: None,
            adjacencies: Vec::new(),
            sweep_x: f64::NEG_INFINITY,
            next_seq: 0,
            next_trajectory: 0,
            resolved: 0,
        }
    }

    fn mono(&self, id: MonoId) -> Result<MonoSegment> {
        self.monos
            .get(id)
            .copied()
            .ok_or_else(|| SweepError::MissingSegment.into())
    }

    fn mono_mut(&mut self, id: MonoId) -> Result<&mut MonoSegment> {
        self.monos
            .get_mut(id)
            .ok_or_else(|| SweepError::MissingSegment.into())
    }

    fn event(&self, id: EventId) -> Result<SweepEvent> {
        self.events
            .get(id)
            .copied()
            .ok_or_else(|| SweepError::MissingEvent.into())
    }

    fn event_mut(&mut self, id: EventId) -> Result<&mut SweepEvent> {
        self.events
            .get_mut(id)
            .ok_or_else(|| SweepError::MissingEvent.into())
    }

    /// Enter and leave event of a live segment.
    fn events_of(&self, id: MonoId) -> Result<(EventId, EventId)> {
        self.mono_events
            .get(id)
            .copied()
            .ok_or_else(|| SweepError::MissingEvent.into())
    }

    fn in_status(&self, id: MonoId) -> bool {
        self.mono_events
            .get(id)
            .and_then(|(_, leave)| self.events.get(*leave))
            .is_some_and(|e| e.status.is_some())
    }

    fn add_operand(&mut self, contours: &[Contour], is_primary: bool) -> Result<()> {
        for (c, contour) in contours.iter().enumerate() {
            for (k, curve) in contour.curves().iter().enumerate() {
                if let Curve::Point(p) = curve.reduce(self.tol).curve {
                    warn!(contour = c, curve = k, x = p.x, y = p.y, "skipping degenerate curve");
                    continue;
                }
                let trajectory = TrajectoryId(self.next_trajectory);
                self.next_trajectory += 1;
                let origin = CurveRef { contour: c, curve: k };
                for mono in decompose(curve, is_primary, origin, trajectory, self.tol)? {
                    self.spawn(mono);
                }
            }
        }
        Ok(())
    }

    fn next_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    fn key(&self, mono: &MonoSegment, is_enter: bool, seq: u64) -> EventKey {
        let (t0, t1) = mono.curve.domain();
        let (point, t) = if is_enter { (mono.enter, t0) } else { (mono.leave, t1) };
        EventKey {
            point,
            is_enter,
            slope: SlopeKey::at(&mono.curve, t, self.tol),
            seq,
        }
    }

    /// Adds a segment with a fresh pair of events.
    fn spawn(&mut self, mono: MonoSegment) -> MonoId {
        let id = self.monos.insert(mono);
        let (enter_seq, leave_seq) = (self.next_seq(), self.next_seq());
        let enter = self.events.insert(SweepEvent {
            mono: id,
            is_enter: true,
            other: EventId::null(),
            status: None,
            seq: enter_seq,
        });
        let leave = self.events.insert(SweepEvent {
            mono: id,
            is_enter: false,
            other: enter,
            status: None,
            seq: leave_seq,
        });
        if let Some(e) = self.events.get_mut(enter) {
            e.other = leave;
        }
        let (enter_key, leave_key) = (self.key(&mono, true, enter_seq), self.key(&mono, false, leave_seq));
        self.queue.push(enter, enter_key);
        self.queue.push(leave, leave_key);
        self.mono_events.insert(id, (enter, leave));
        id
    }

    /// Processes events until the queue drains. Segments leaving at the same
    /// point stay listed until all of them are filled, so each one still sees
    /// the others converging from above.
    fn run(&mut self) -> Result<()> {
        loop {
            let head = self.queue.peek();
            let next = head.map(|h| self.event_point(h)).transpose()?;
            if let Some(at) = self.pending_at {
                let same_point = next
                    .is_some_and(|(point, is_enter)| !is_enter && self.tol.points_equal(&point, &at));
                if !same_point {
                    self.flush_leaves()?;
                    continue;
                }
            }
            if let Some((lower, upper)) = self.adjacencies.pop() {
                self.resolve_adjacent(lower, upper)?;
                continue;
            }
            let (Some(head), Some((point, _))) = (head, next) else {
                break;
            };
            let event = self.event(head)?;
            self.advance_to(point.x);
            trace!(x = point.x, y = point.y, enter = event.is_enter, "event");
            if event.is_enter {
                self.enter(head, event.mono)?;
            } else {
                self.leave(head, &event, point)?;
            }
        }
        Ok(())
    }

    fn event_point(&self, id: EventId) -> Result<(Point2, bool)> {
        let event = self.event(id)?;
        let mono = self.mono(event.mono)?;
        let point = if event.is_enter { mono.enter } else { mono.leave };
        Ok((point, event.is_enter))
    }

    /// Moves the sweep line, retaking the snapshot when x changes.
    fn advance_to(&mut self, x: f64) {
        self.sweep_x = x;
        let stale = self
            .snapshot
            .as_ref()
            .map_or(true, |s| (s.x() - x).abs() > self.tol.epsilon);
        if stale {
            let members: Vec<MonoSegment> = self
                .status
                .iter()
                .filter_map(|(_, id)| self.monos.get(id).copied())
                .collect();
            self.snapshot = Some(Snapshot::new(x, members));
        }
    }

    /// Handles the head enter event. Any split or merge leaves the event in
    /// the queue so that the loop starts over from the new head.
    fn enter(&mut self, head: EventId, id: MonoId) -> Result<()> {
        let (below, above) = self.neighbors(id)?;
        for neighbor in [below, above].into_iter().flatten() {
            let other = self.status.mono(neighbor)?;
            if self.resolve(id, other)? {
                return Ok(());
            }
        }
        let node = self.status.insert_above(below, id)?;
        let (_, leave) = self.events_of(id)?;
        self.event_mut(leave)?.status = Some(node);
        self.queue.remove(head);
        Ok(())
    }

    /// Status nodes directly below and above the enter point of `id`.
    fn neighbors(&self, id: MonoId) -> Result<(Option<StatusId>, Option<StatusId>)> {
        let mono = self.mono(id)?;
        let mut below = None;
        for (node, other) in self.status.iter() {
            if self.passes_above(&self.mono(other)?, &mono) {
                return Ok((below, Some(node)));
            }
            below = Some(node);
        }
        Ok((below, None))
    }

    /// `true` if `other` runs above `mono` where `mono` enters.
    fn passes_above(&self, other: &MonoSegment, mono: &MonoSegment) -> bool {
        let x = mono.enter.x;
        let y = other.y_at(x, self.tol);
        if (y - mono.enter.y).abs() > self.tol.epsilon {
            return y > mono.enter.y;
        }
        let theirs = SlopeKey::at(&other.curve, other.param_at_x(x, self.tol), self.tol);
        let ours = SlopeKey::at(&mono.curve, mono.curve.domain().0, self.tol);
        theirs.compare(&ours, self.tol.time_epsilon) == Ordering::Greater
    }

    /// Fills the head leave event's segment from the windings above it. The
    /// node is unlinked later by [`Self::flush_leaves`].
    fn leave(&mut self, head: EventId, event: &SweepEvent, point: Point2) -> Result<()> {
        self.queue.pop();
        let id = event.mono;
        let node = event.status.ok_or(SweepError::MissingStatus)?;
        let mono = self.mono(id)?;
        let above = if mono.is_vertical {
            let mid = 0.5 * (mono.enter.y + mono.leave.y);
            self.snapshot
                .as_ref()
                .map_or_else(Windings::default, |s| s.windings_above(mid, self.tol))
        } else {
            let mut w = Windings::default();
            for (_, other) in self.status.iter_above(node) {
                w += self.mono(other)?.windings();
            }
            w
        };
        let below = above + mono.windings();
        let fill = Fill::from_windings(above, below, self.primary_rule, self.secondary_rule);
        self.mono_mut(id)?.fill = Some(fill);
        trace!(transposed = mono.transposed, ?fill, "segment filled");

        self.pending.push((head, node));
        self.pending_at = Some(point);
        Ok(())
    }

    /// Unlinks every segment that left at the pending point and queues the
    /// neighbors that meet as a result.
    fn flush_leaves(&mut self) -> Result<()> {
        for (event, node) in std::mem::take(&mut self.pending) {
            let (lower, upper) = self.status.remove(node)?;
            self.event_mut(event)?.status = None;
            if let (Some(lower), Some(upper)) = (lower, upper) {
                self.adjacencies.push((lower, upper));
            }
        }
        self.pending_at = None;
        Ok(())
    }

    /// Intersects two nodes if they are still listed next to each other, the
    /// segment that entered later first.
    fn resolve_adjacent(&mut self, lower: StatusId, upper: StatusId) -> Result<()> {
        if self.status.above(lower) != Some(upper) {
            return Ok(());
        }
        let (a, b) = (self.status.mono(lower)?, self.status.mono(upper)?);
        let later = compare_points(&self.mono(a)?.enter, &self.mono(b)?.enter, self.tol.epsilon);
        if later == Ordering::Greater {
            self.resolve(a, b)?;
        } else {
            self.resolve(b, a)?;
        }
        Ok(())
    }

    /// `true` if the pair, or a pair of their ancestors, was intersected
    /// already.
    fn resolved_before(&self, a: MonoId, b: MonoId) -> bool {
        let lineage = |id: MonoId| std::iter::successors(Some(id), |m| self.monos.get(*m).and_then(|s| s.parent));
        lineage(a).any(|x| lineage(b).any(|y| self.visited.contains(&pair_key(x, y))))
    }

    /// Intersects two segments, `a` being the newer one, and splits or merges
    /// them. Returns `true` if anything changed.
    fn resolve(&mut self, a: MonoId, b: MonoId) -> Result<bool> {
        if a == b || self.resolved_before(a, b) {
            return Ok(false);
        }
        self.visited.insert(pair_key(a, b));
        let (ma, mb) = (self.mono(a)?, self.mono(b)?);
        let ix = Intersector::new(ma.curve, mb.curve, self.tol)?;
        if ma.trajectory == mb.trajectory || ix.on_same_trajectory() {
            if ma.trajectory != mb.trajectory {
                self.mono_mut(a)?.trajectory = mb.trajectory;
            }
            return self.merge_coincident(a, b, &ix);
        }

        let near = ma.curve.point_tolerance(self.tol).max(mb.curve.point_tolerance(self.tol));
        let ends = [ma.enter, ma.leave, mb.enter, mb.leave];
        let mut cuts_a = Vec::new();
        let mut cuts_b = Vec::new();
        for r in ix.proper_intersection()? {
            if r.point.x < self.sweep_x - near {
                trace!(x = r.point.x, y = r.point.y, "ignoring intersection behind the sweep line");
                continue;
            }
            let point = snap(r.point, &ends, near);
            cuts_a.push(Cut { param: r.param_a, point });
            cuts_b.push(Cut { param: r.param_b, point });
        }
        let split_a = self.split(a, &cuts_a)?;
        let split_b = self.split(b, &cuts_b)?;
        if split_a.is_empty() && split_b.is_empty() {
            return Ok(false);
        }
        self.resolved += 1;
        debug!(
            pieces_a = split_a.len(),
            pieces_b = split_b.len(),
            "split at intersections"
        );
        Ok(true)
    }

    /// Splits both segments at the ends of their shared pieces and merges
    /// each shared piece into one.
    fn merge_coincident(&mut self, a: MonoId, b: MonoId, ix: &Intersector) -> Result<bool> {
        let (ma, mb) = (self.mono(a)?, self.mono(b)?);
        let near = ma.curve.point_tolerance(self.tol).max(mb.curve.point_tolerance(self.tol));
        let ends = [ma.enter, ma.leave, mb.enter, mb.leave];
        let mut cuts_a = Vec::new();
        let mut cuts_b = Vec::new();
        for overlap in ix.coincide()? {
            let Overlap::Segment {
                curve,
                range_a,
                range_b,
            } = overlap
            else {
                continue;
            };
            let (start, end) = (snap(curve.start(), &ends, near), snap(curve.end(), &ends, near));
            cuts_a.extend([
                Cut { param: range_a.0, point: start },
                Cut { param: range_a.1, point: end },
            ]);
            cuts_b.extend([
                Cut { param: range_b.0, point: start },
                Cut { param: range_b.1, point: end },
            ]);
        }
        if cuts_a.is_empty() {
            return Ok(false);
        }

        let pieces_a = self.pieces(a, &cuts_a)?;
        let pieces_b = self.pieces(b, &cuts_b)?;
        let mut changed = pieces_a.len() > 1 || pieces_b.len() > 1;
        for &pa in &pieces_a {
            let piece = self.mono(pa)?;
            let twin = pieces_b.iter().copied().find(|pb| {
                self.monos
                    .get(*pb)
                    .is_some_and(|m| m.state == MonoState::Live && same_span(m, &piece, near))
            });
            if let Some(pb) = twin {
                self.absorb(pa, pb)?;
                changed = true;
            }
        }
        Ok(changed)
    }

    /// Children of `id` after cutting, or `id` itself if no cut applies.
    fn pieces(&mut self, id: MonoId, cuts: &[Cut]) -> Result<Vec<MonoId>> {
        let children = self.split(id, cuts)?;
        Ok(if children.is_empty() { vec![id] } else { children })
    }

    /// Replaces a segment by its children. The first child takes over the
    /// parent's events and status node; the others get fresh events.
    fn split(&mut self, id: MonoId, cuts: &[Cut]) -> Result<Vec<MonoId>> {
        let mono = self.mono(id)?;
        let children = mono.split(cuts, self.tol);
        if children.is_empty() {
            return Ok(Vec::new());
        }
        let (enter, leave) = self.events_of(id)?;
        self.mono_mut(id)?.state = MonoState::Split;
        self.mono_events.remove(id);

        let mut ids = Vec::with_capacity(children.len());
        for (i, mut child) in children.into_iter().enumerate() {
            child.parent = Some(id);
            if i == 0 {
                let first = self.monos.insert(child);
                self.rebind(enter, first)?;
                self.rebind(leave, first)?;
                self.mono_events.insert(first, (enter, leave));
                ids.push(first);
            } else {
                ids.push(self.spawn(child));
            }
        }
        trace!(pieces = ids.len(), "segment split");
        Ok(ids)
    }

    /// Points an existing event at another segment and re-keys it.
    fn rebind(&mut self, event: EventId, mono: MonoId) -> Result<()> {
        let ev = self.event_mut(event)?;
        ev.mono = mono;
        let (is_enter, seq, status) = (ev.is_enter, ev.seq, ev.status);
        if let Some(node) = status {
            self.status.set_mono(node, mono)?;
        }
        let key = self.key(&self.mono(mono)?, is_enter, seq);
        self.queue.update(event, key);
        Ok(())
    }

    /// Merges two coincident segments. The one already in the status list
    /// survives, otherwise `dst`.
    fn absorb(&mut self, src: MonoId, dst: MonoId) -> Result<()> {
        let (src, dst) = if self.in_status(src) && !self.in_status(dst) {
            (dst, src)
        } else {
            (src, dst)
        };
        let piece = self.mono(src)?;
        self.mono_mut(dst)?.absorb(&piece);
        self.mono_mut(src)?.state = MonoState::Absorbed;
        let (enter, _) = self.events_of(src)?;
        let leave = self.event(enter)?.other;
        self.mono_events.remove(src);
        if let Some(node) = self.event(leave)?.status {
            if let (Some(lower), Some(upper)) = self.status.remove(node)? {
                self.adjacencies.push((lower, upper));
            }
        }
        for e in [enter, leave] {
            self.queue.remove(e);
            self.events.remove(e);
        }
        debug!(windings = ?self.mono(dst)?.windings(), "merged coincident segments");
        Ok(())
    }

    fn finish(self) -> Result<SweepResult> {
        if !self.status.is_empty() || !self.queue.is_empty() {
            return Err(SweepError::InvariantViolation(format!(
                "{} segments still active after the last event",
                self.status.len()
            ))
            .into());
        }
        let mut segments = Vec::new();
        for (_, m) in &self.monos {
            if m.state != MonoState::Live {
                continue;
            }
            let fill = m.fill.ok_or(SweepError::UnfilledSegment)?;
            segments.push(SweepSegment {
                curve: m.curve,
                enter: m.enter,
                leave: m.leave,
                is_primary: m.is_primary,
                origin: m.origin,
                windings: m.windings(),
                fill,
            });
        }
        Ok(SweepResult {
            segments,
            resolved_intersections: self.resolved,
        })
    }
}
