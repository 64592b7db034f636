// Copyright 2026 the Scenepath Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invalidation and revalidation protocol shared by every node.
//!
//! Nodes form a directed acyclic graph. A parent holds strong (`Rc`)
//! references to the nodes it depends on and registers a non-owning observer
//! entry in each of them. Mutating a node [invalidates](Invalidatable::invalidate)
//! it and, transitively, everything observing it. A later
//! [`revalidate`](Node::revalidate) pass recomputes only the invalidated part
//! of the graph.
//!
//! # Damage
//!
//! Invalidation optionally carries *damage*: the screen-space region covered
//! by the node's old and new bounds. Geometry and transform nodes have the
//! [`bubble_damage`](NodeTraits::bubble_damage) trait and forward damage to
//! their observers. The first node on the way up that either lacks the trait
//! or has no observers records it, and on the next revalidation reports its
//! old and new bounds to the [`InvalidationController`].

use alloc::rc::Weak;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use kurbo::{Affine, Rect};

use crate::effect::EffectKind;
use crate::invalidation::InvalidationController;
use crate::trace::RevalidateEvent;

/// Process-unique identity of a node.
///
/// Used to key observer registrations and to label trace events.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What sort of node produced a trace event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// A leaf [`Path`](crate::geometry::Path).
    Path,
    /// A leaf [`Matrix`](crate::transform::Matrix) transform.
    Matrix,
    /// A [`Concat`](crate::transform::Concat) of two transforms.
    Concat,
    /// A [`GeometryEffect`](crate::effect::GeometryEffect) variant.
    Effect(EffectKind),
    /// A node implemented outside this crate.
    External,
}

/// Static traits of a node, fixed at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NodeTraits {
    /// Forward damage to observers instead of recording it locally.
    pub bubble_damage: bool,
    /// Always report damage on revalidation, and hide the controller from
    /// dependencies.
    pub override_damage: bool,
}

impl NodeTraits {
    /// Traits of geometry and transform nodes.
    pub const BUBBLE_DAMAGE: Self = Self {
        bubble_damage: true,
        override_damage: false,
    };
}

#[derive(Clone, Copy, Debug, Default)]
struct NodeFlags {
    invalidated: bool,
    damage: bool,
    in_traversal: bool,
}

struct Observer {
    id: NodeId,
    node: Weak<dyn Invalidatable>,
}

/// State shared by every node: identity, flags, bounds, and observers.
pub struct NodeBase {
    id: NodeId,
    traits: NodeTraits,
    flags: Cell<NodeFlags>,
    bounds: Cell<Rect>,
    observers: RefCell<Vec<Observer>>,
}

impl fmt::Debug for NodeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeBase")
            .field("id", &self.id)
            .field("traits", &self.traits)
            .field("invalidated", &self.has_inval())
            .field("bounds", &self.bounds.get())
            .field("observers", &self.observer_count())
            .finish()
    }
}

impl NodeBase {
    /// Creates node state. New nodes start out invalidated.
    #[must_use]
    pub fn new(traits: NodeTraits) -> Self {
        Self {
            id: NodeId::next(),
            traits,
            flags: Cell::new(NodeFlags {
                invalidated: true,
                ..NodeFlags::default()
            }),
            bounds: Cell::new(Rect::ZERO),
            observers: RefCell::new(Vec::new()),
        }
    }

    /// Returns the node's identity.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the node's static traits.
    #[inline]
    #[must_use]
    pub fn traits(&self) -> NodeTraits {
        self.traits
    }

    /// Returns whether the node has a pending invalidation.
    #[inline]
    #[must_use]
    pub fn has_inval(&self) -> bool {
        self.flags.get().invalidated
    }

    /// Returns the bounds computed by the last revalidation.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Returns whether the node with the given id observes this one.
    #[must_use]
    pub fn is_observed_by(&self, id: NodeId) -> bool {
        self.observers.borrow().iter().any(|o| o.id == id)
    }

    /// Registers `node` as an invalidation observer.
    ///
    /// Registration is non-owning; the observer must call
    /// [`remove_observer`](Self::remove_observer) before it is dropped.
    pub fn add_observer(&self, id: NodeId, node: Weak<dyn Invalidatable>) {
        self.observers.borrow_mut().push(Observer { id, node });
    }

    /// Removes one registration made by the node with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not registered.
    pub fn remove_observer(&self, id: NodeId) {
        let mut observers = self.observers.borrow_mut();
        let Some(pos) = observers.iter().position(|o| o.id == id) else {
            panic!("{id:?} does not observe {:?}", self.id);
        };
        observers.remove(pos);
    }

    /// Marks this node invalid and propagates to observers.
    ///
    /// Propagation stops at nodes that are already invalid, unless new damage
    /// still has to be recorded.
    pub fn invalidate(&self, damage_bubbling: bool) {
        let mut flags = self.flags.get();
        if flags.invalidated && (!damage_bubbling || flags.damage) {
            return;
        }

        let mut damage_bubbling = damage_bubbling;
        if damage_bubbling && (!self.traits.bubble_damage || self.observer_count() == 0) {
            // Found the damage recorder.
            flags.damage = true;
            damage_bubbling = false;
        }
        flags.invalidated = true;
        self.flags.set(flags);

        // Upgrade first so no borrow is held while observers run.
        let observers: Vec<_> = self
            .observers
            .borrow()
            .iter()
            .filter_map(|o| o.node.upgrade())
            .collect();
        for observer in observers {
            observer.base().invalidate(damage_bubbling);
        }
    }

    fn update_flags(&self, f: impl FnOnce(&mut NodeFlags)) {
        let mut flags = self.flags.get();
        f(&mut flags);
        self.flags.set(flags);
    }
}

/// Clears the in-traversal flag when a revalidation unwinds.
struct TraversalGuard<'a>(&'a NodeBase);

impl<'a> TraversalGuard<'a> {
    fn enter(base: &'a NodeBase) -> Self {
        assert!(
            !base.flags.get().in_traversal,
            "revalidation cycle through {:?}",
            base.id
        );
        base.update_flags(|f| f.in_traversal = true);
        Self(base)
    }
}

impl Drop for TraversalGuard<'_> {
    fn drop(&mut self) {
        self.0.update_flags(|f| f.in_traversal = false);
    }
}

/// Capability to be observed and invalidated.
pub trait Invalidatable {
    /// Returns the node's shared state.
    fn base(&self) -> &NodeBase;

    /// Returns the node's identity.
    fn id(&self) -> NodeId {
        self.base().id()
    }

    /// Returns whether the node has a pending invalidation.
    fn has_inval(&self) -> bool {
        self.base().has_inval()
    }

    /// Marks the node and its observers invalid, with damage.
    fn invalidate(&self) {
        self.base().invalidate(true);
    }
}

/// A node that can recompute its cached state.
pub trait Node: Invalidatable {
    /// What this node is, for tracing.
    fn kind(&self) -> NodeKind {
        NodeKind::External
    }

    /// Recomputes the node's cached state and returns its new bounds.
    ///
    /// Only called by [`revalidate`](Self::revalidate) while the node is
    /// invalid. Implementations revalidate their dependencies first.
    fn on_revalidate(&self, ic: Option<&mut InvalidationController<'_>>, ctm: Affine) -> Rect;

    /// Brings the node up to date and returns its bounds.
    ///
    /// A node that is not invalid returns its cached bounds without doing any
    /// work, so a node shared by several parents is recomputed once per pass.
    ///
    /// # Panics
    ///
    /// Panics if the node is reached again while it is being revalidated.
    fn revalidate(&self, ic: Option<&mut InvalidationController<'_>>, ctm: Affine) -> Rect {
        revalidate_node(self, ic, ctm)
    }
}

fn revalidate_node<N: Node + ?Sized>(
    node: &N,
    mut ic: Option<&mut InvalidationController<'_>>,
    ctm: Affine,
) -> Rect {
    let base = node.base();
    if !base.has_inval() {
        return base.bounds();
    }

    let _guard = TraversalGuard::enter(base);
    let prev_bounds = base.bounds();
    let generate_damage = base.flags.get().damage || base.traits.override_damage;

    let forwarded = if base.traits.override_damage {
        None
    } else {
        ic.as_deref_mut()
    };
    let bounds = node.on_revalidate(forwarded, ctm);

    if let Some(ic) = ic {
        if generate_damage {
            ic.inval(prev_bounds, ctm);
            if bounds != prev_bounds {
                ic.inval(bounds, ctm);
            }
        }
        ic.tracer().revalidate(&RevalidateEvent {
            node: base.id(),
            kind: node.kind(),
            bounds,
        });
    }

    base.bounds.set(bounds);
    base.update_flags(|f| {
        f.invalidated = false;
        f.damage = false;
    });
    bounds
}

/// Stores `value` into an attribute cell, invalidating `base` if it changed.
pub(crate) fn set_attribute<T: Copy + PartialEq>(base: &NodeBase, cell: &Cell<T>, value: T) {
    if cell.get() != value {
        cell.set(value);
        base.invalidate(true);
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;

    use super::*;

    /// Minimal node that counts revalidations and reports fixed bounds.
    struct TestNode {
        base: NodeBase,
        bounds: Cell<Rect>,
        runs: Cell<u32>,
        saw_controller: Cell<bool>,
        child: Option<Rc<TestNode>>,
    }

    impl TestNode {
        fn new(traits: NodeTraits) -> Rc<Self> {
            Self::with_child(traits, None)
        }

        fn with_child(traits: NodeTraits, child: Option<Rc<Self>>) -> Rc<Self> {
            Rc::new(Self {
                base: NodeBase::new(traits),
                bounds: Cell::new(Rect::new(0.0, 0.0, 10.0, 10.0)),
                runs: Cell::new(0),
                saw_controller: Cell::new(false),
                child,
            })
        }
    }

    impl Invalidatable for TestNode {
        fn base(&self) -> &NodeBase {
            &self.base
        }
    }

    impl Node for TestNode {
        fn on_revalidate(
            &self,
            mut ic: Option<&mut InvalidationController<'_>>,
            ctm: Affine,
        ) -> Rect {
            self.runs.set(self.runs.get() + 1);
            self.saw_controller.set(ic.is_some());
            if let Some(child) = &self.child {
                child.revalidate(ic.as_deref_mut(), ctm);
            }
            self.bounds.get()
        }
    }

    fn observe(parent: &Rc<TestNode>, child: &Rc<TestNode>) {
        let weak: Weak<TestNode> = Rc::downgrade(parent);
        let weak: Weak<dyn Invalidatable> = weak;
        child.base().add_observer(parent.id(), weak);
    }

    #[test]
    fn new_nodes_start_invalid() {
        let node = TestNode::new(NodeTraits::default());
        assert!(node.has_inval());
        node.revalidate(None, Affine::IDENTITY);
        assert!(!node.has_inval());
    }

    #[test]
    fn ids_are_unique() {
        let a = NodeBase::new(NodeTraits::default());
        let b = NodeBase::new(NodeTraits::default());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn revalidate_skips_valid_nodes() {
        let node = TestNode::new(NodeTraits::default());
        node.revalidate(None, Affine::IDENTITY);
        node.revalidate(None, Affine::IDENTITY);
        assert_eq!(node.runs.get(), 1);

        node.invalidate();
        node.revalidate(None, Affine::IDENTITY);
        assert_eq!(node.runs.get(), 2);
    }

    #[test]
    fn invalidation_propagates_to_observers() {
        let child = TestNode::new(NodeTraits::BUBBLE_DAMAGE);
        let parent = TestNode::new(NodeTraits::default());
        observe(&parent, &child);

        child.revalidate(None, Affine::IDENTITY);
        parent.revalidate(None, Affine::IDENTITY);
        assert!(!parent.has_inval());

        child.invalidate();
        assert!(child.has_inval());
        assert!(parent.has_inval());

        child.base().remove_observer(parent.id());
    }

    #[test]
    fn damage_recorded_by_first_non_bubbling_observer() {
        let child = TestNode::new(NodeTraits::BUBBLE_DAMAGE);
        let parent = TestNode::new(NodeTraits::default());
        observe(&parent, &child);

        let mut ic = InvalidationController::new();
        child.revalidate(None, Affine::IDENTITY);
        parent.revalidate(Some(&mut ic), Affine::IDENTITY);
        ic.reset();

        child.invalidate();
        parent.bounds.set(Rect::new(0.0, 0.0, 20.0, 20.0));
        parent.revalidate(Some(&mut ic), Affine::IDENTITY);

        // Old and new bounds.
        assert_eq!(ic.damage().len(), 2);
        assert_eq!(ic.bounds(), Rect::new(0.0, 0.0, 20.0, 20.0));

        child.base().remove_observer(parent.id());
    }

    #[test]
    fn unchanged_bounds_are_damaged_once() {
        let node = TestNode::new(NodeTraits::default());
        let mut ic = InvalidationController::new();
        node.revalidate(Some(&mut ic), Affine::IDENTITY);
        ic.reset();

        node.invalidate();
        node.revalidate(Some(&mut ic), Affine::IDENTITY);
        assert_eq!(ic.damage(), &[Rect::new(0.0, 0.0, 10.0, 10.0)]);
    }

    #[test]
    fn override_damage_reports_every_pass() {
        let traits = NodeTraits {
            bubble_damage: false,
            override_damage: true,
        };
        let node = TestNode::new(traits);
        let plain = TestNode::new(NodeTraits::default());
        let mut ic = InvalidationController::new();
        node.revalidate(Some(&mut ic), Affine::IDENTITY);
        plain.revalidate(Some(&mut ic), Affine::IDENTITY);
        // Only the new bounds; the initial empty bounds are ignored.
        assert_eq!(ic.damage(), &[Rect::new(0.0, 0.0, 10.0, 10.0)]);
        ic.reset();

        // Invalidation without damage still damages an overriding node.
        node.base().invalidate(false);
        plain.base().invalidate(false);
        node.revalidate(Some(&mut ic), Affine::IDENTITY);
        plain.revalidate(Some(&mut ic), Affine::IDENTITY);
        assert_eq!(node.runs.get(), 2);
        assert_eq!(plain.runs.get(), 2);
        assert_eq!(ic.damage(), &[Rect::new(0.0, 0.0, 10.0, 10.0)]);
    }

    #[test]
    fn override_damage_hides_the_controller() {
        let child = TestNode::new(NodeTraits::BUBBLE_DAMAGE);
        let traits = NodeTraits {
            bubble_damage: false,
            override_damage: true,
        };
        let node = TestNode::with_child(traits, Some(child.clone()));
        let plain = TestNode::with_child(
            NodeTraits::default(),
            Some(TestNode::new(NodeTraits::default())),
        );

        let mut ic = InvalidationController::new();
        node.revalidate(Some(&mut ic), Affine::IDENTITY);
        plain.revalidate(Some(&mut ic), Affine::IDENTITY);

        assert!(!node.saw_controller.get());
        assert_eq!(child.runs.get(), 1);
        assert!(!child.saw_controller.get());
        assert!(plain.saw_controller.get());
        assert!(plain.child.as_ref().is_some_and(|c| c.saw_controller.get()));
    }

    #[test]
    fn removed_observer_is_not_notified() {
        let child = TestNode::new(NodeTraits::BUBBLE_DAMAGE);
        let parent = TestNode::new(NodeTraits::default());
        observe(&parent, &child);
        assert!(child.base().is_observed_by(parent.id()));

        child.base().remove_observer(parent.id());
        assert_eq!(child.base().observer_count(), 0);

        child.revalidate(None, Affine::IDENTITY);
        parent.revalidate(None, Affine::IDENTITY);
        child.invalidate();
        assert!(child.has_inval());
        assert!(!parent.has_inval());
    }

    #[test]
    #[should_panic(expected = "does not observe")]
    fn removing_unknown_observer_panics() {
        let node = NodeBase::new(NodeTraits::default());
        let other = NodeBase::new(NodeTraits::default());
        node.remove_observer(other.id());
    }

    #[test]
    fn set_attribute_invalidates_on_change_only() {
        let base = NodeBase::new(NodeTraits::default());
        base.update_flags(|f| f.invalidated = false);
        let cell = Cell::new(1.0_f64);

        set_attribute(&base, &cell, 1.0);
        assert!(!base.has_inval());

        set_attribute(&base, &cell, 2.0);
        assert!(base.has_inval());
        assert_eq!(cell.get(), 2.0);
    }
}
