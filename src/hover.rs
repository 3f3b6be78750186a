//! Hover tracking over readable elements.
//!
//! A [`HoverTracker`] listens to pointer events from an [`EventSource`] and
//! keeps a single [`HoverState`]: either `Idle` or `Hovering` one tracked
//! element, with the document-space position and first-line height an
//! overlay needs. State is published through a `tokio::sync::watch`
//! channel so any number of consumers can observe it.
//!
//! # Leave behavior
//!
//! With [`LeaveBehavior::Sticky`] (the default) no pointer-out listener is
//! registered and the last hovered element stays active until another
//! tracked element is entered. [`LeaveBehavior::Clear`] returns to `Idle`
//! when the pointer leaves a tracked element.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::geometry::{element_bounds, LayoutView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// `mouseover`: the pointer entered the target.
    Over,
    /// `mouseout`: the pointer left the target.
    Out,
}

/// A pointer event carrying its target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent<N> {
    pub kind: PointerEventKind,
    pub target: N,
}

impl<N> PointerEvent<N> {
    pub fn over(target: N) -> Self {
        Self {
            kind: PointerEventKind::Over,
            target,
        }
    }

    pub fn out(target: N) -> Self {
        Self {
            kind: PointerEventKind::Out,
            target,
        }
    }
}

/// What happens to the hover state when the pointer leaves an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeaveBehavior {
    #[default]
    Sticky,
    Clear,
}

/// Position and first-line height of the hovered readable element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverInfo<N> {
    pub element: N,
    /// Document-space top edge.
    pub top: f64,
    /// Document-space left edge.
    pub left: f64,
    pub height_of_first_line: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverState<N> {
    Idle,
    Hovering(HoverInfo<N>),
}

impl<N> HoverState<N> {
    pub fn info(&self) -> Option<&HoverInfo<N>> {
        match self {
            Self::Idle => None,
            Self::Hovering(info) => Some(info),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Result of feeding one event to a [`HoverMachine`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition<N> {
    Enter(HoverInfo<N>),
    Leave,
    Ignore,
}

/// Pure transition logic over a fixed list of tracked elements.
#[derive(Debug, Clone)]
pub struct HoverMachine<N> {
    tracked: Rc<[N]>,
    leave: LeaveBehavior,
}

impl<N: Copy + PartialEq> HoverMachine<N> {
    pub fn new(tracked: Rc<[N]>, leave: LeaveBehavior) -> Self {
        Self { tracked, leave }
    }

    pub fn is_tracked(&self, node: N) -> bool {
        self.tracked.contains(&node)
    }

    /// Decide the transition for `event`.
    ///
    /// Entering reads geometry at event time: top/left from the element's
    /// document bounds, height from its computed `line-height` (zero when
    /// unresolvable).
    pub fn transition<L>(&self, view: &L, event: &PointerEvent<N>) -> Transition<N>
    where
        L: LayoutView<N> + ?Sized,
    {
        if !self.is_tracked(event.target) {
            return Transition::Ignore;
        }

        match event.kind {
            PointerEventKind::Over => {
                let bounds = element_bounds(view, event.target);
                let height_of_first_line = view
                    .computed_style(event.target)
                    .resolved_line_height()
                    .unwrap_or(0.0);
                Transition::Enter(HoverInfo {
                    element: event.target,
                    top: bounds.top,
                    left: bounds.left,
                    height_of_first_line,
                })
            }
            PointerEventKind::Out => match self.leave {
                LeaveBehavior::Clear => Transition::Leave,
                LeaveBehavior::Sticky => Transition::Ignore,
            },
        }
    }
}

/// Apply a transition; returns whether the published state changed.
fn apply<N: PartialEq>(state: &watch::Sender<HoverState<N>>, transition: Transition<N>) -> bool {
    state.send_if_modified(|current| {
        let next = match transition {
            Transition::Enter(info) => HoverState::Hovering(info),
            Transition::Leave => HoverState::Idle,
            Transition::Ignore => return false,
        };
        if *current == next {
            return false;
        }
        *current = next;
        true
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub type Listener<'a, N> = Box<dyn FnMut(&PointerEvent<N>) + 'a>;

/// Something pointer listeners can be attached to, like a browser window.
pub trait EventSource<'a, N> {
    fn subscribe(&mut self, kind: PointerEventKind, listener: Listener<'a, N>) -> ListenerId;

    /// Returns `false` if `id` was not attached.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;
}

/// In-process listener registry with synchronous dispatch.
pub struct PointerEvents<'a, N> {
    next_id: u64,
    listeners: Vec<(ListenerId, PointerEventKind, Listener<'a, N>)>,
}

impl<'a, N> PointerEvents<'a, N> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            listeners: Vec::new(),
        }
    }

    /// Run every listener registered for the event's kind, in
    /// registration order.
    pub fn dispatch(&mut self, event: &PointerEvent<N>) {
        for (_, kind, listener) in &mut self.listeners {
            if *kind == event.kind {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn listener_count_for(&self, kind: PointerEventKind) -> usize {
        self.listeners.iter().filter(|(_, k, _)| *k == kind).count()
    }
}

impl<N> Default for PointerEvents<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, N> EventSource<'a, N> for PointerEvents<'a, N> {
    fn subscribe(&mut self, kind: PointerEventKind, listener: Listener<'a, N>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, kind, listener));
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _, _)| *listener_id != id);
        self.listeners.len() != before
    }
}

/// Keeps hover state for a list of readable elements in sync with pointer
/// events.
///
/// Listeners are attached on construction and detached on
/// [`detach`](Self::detach) or drop. Replacing the element list with
/// [`set_elements`](Self::set_elements) re-attaches them so no listener
/// keeps a stale list.
///
/// Listeners hold only weak handles to the layout and the published state.
/// If the tracker is dropped while the event source is borrowed (from
/// inside a dispatch, say), its listeners cannot be removed; they stay
/// registered but become inert and keep neither the layout nor the state alive.
pub struct HoverTracker<'a, N, L, S>
where
    N: Copy + PartialEq + 'a,
    L: LayoutView<N> + 'a,
    S: EventSource<'a, N>,
{
    events: Rc<RefCell<S>>,
    layout: Rc<L>,
    elements: Rc<[N]>,
    leave: LeaveBehavior,
    state: Rc<watch::Sender<HoverState<N>>>,
    listeners: Vec<ListenerId>,
    _source: PhantomData<&'a ()>,
}

impl<'a, N, L, S> HoverTracker<'a, N, L, S>
where
    N: Copy + PartialEq + 'a,
    L: LayoutView<N> + 'a,
    S: EventSource<'a, N>,
{
    pub fn new(events: Rc<RefCell<S>>, layout: Rc<L>, elements: Rc<[N]>, leave: LeaveBehavior) -> Self {
        let (state, _) = watch::channel(HoverState::Idle);
        let mut tracker = Self {
            events,
            layout,
            elements,
            leave,
            state: Rc::new(state),
            listeners: Vec::new(),
            _source: PhantomData,
        };
        tracker.attach();
        tracker
    }

    /// Latest hover info, or `None` when idle.
    pub fn current(&self) -> Option<HoverInfo<N>> {
        self.state.borrow().info().copied()
    }

    pub fn state(&self) -> HoverState<N> {
        *self.state.borrow()
    }

    /// A receiver notified whenever the hover state changes.
    pub fn subscribe(&self) -> watch::Receiver<HoverState<N>> {
        self.state.subscribe()
    }

    pub fn elements(&self) -> &Rc<[N]> {
        &self.elements
    }

    pub fn leave_behavior(&self) -> LeaveBehavior {
        self.leave
    }

    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Track a new element list.
    ///
    /// A list with the same identity (`Rc::ptr_eq`) is a no-op; anything
    /// else detaches the current listeners and attaches fresh ones. The
    /// current hover state is kept.
    pub fn set_elements(&mut self, elements: Rc<[N]>) {
        if Rc::ptr_eq(&self.elements, &elements) {
            return;
        }
        self.detach();
        self.elements = elements;
        self.attach();
    }

    /// Remove every listener this tracker registered.
    pub fn detach(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let mut events = self.events.borrow_mut();
        for id in self.listeners.drain(..) {
            if !events.unsubscribe(id) {
                warn!(?id, "hover listener was already detached");
            }
        }
        debug!("hover listeners detached");
    }

    fn attach(&mut self) {
        let over = self.listener();
        let id = self.events.borrow_mut().subscribe(PointerEventKind::Over, over);
        self.listeners.push(id);

        if self.leave == LeaveBehavior::Clear {
            let out = self.listener();
            let id = self.events.borrow_mut().subscribe(PointerEventKind::Out, out);
            self.listeners.push(id);
        }

        debug!(
            elements = self.elements.len(),
            leave = ?self.leave,
            "hover listeners attached"
        );
    }

    fn listener(&self) -> Listener<'a, N> {
        let machine = HoverMachine::new(Rc::clone(&self.elements), self.leave);
        let layout = Rc::downgrade(&self.layout);
        let state = Rc::downgrade(&self.state);

        Box::new(move |event: &PointerEvent<N>| {
            let (Some(layout), Some(state)) = (layout.upgrade(), state.upgrade()) else {
                return;
            };
            let transition = machine.transition(&*layout, event);
            if apply(&state, transition) {
                trace!(kind = ?event.kind, "hover state changed");
            }
        })
    }
}

impl<'a, N, L, S> Drop for HoverTracker<'a, N, L, S>
where
    N: Copy + PartialEq + 'a,
    L: LayoutView<N> + 'a,
    S: EventSource<'a, N>,
{
    fn drop(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        // Dropping from inside a dispatch cannot reach the registry.
        match self.events.try_borrow_mut() {
            Ok(mut events) => {
                for id in self.listeners.drain(..) {
                    events.unsubscribe(id);
                }
            }
            Err(_) => warn!("event source busy; inert hover listeners left attached"),
        }
    }
}
