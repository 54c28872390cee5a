//! Orchestrator - the single entry point for every notification operation
//!
//! All structures live in one [`EngineState`] behind one mutex. Every public
//! method takes the lock for its whole duration, does bounded O(log n) / O(n)
//! work, and releases it before returning, so concurrent callers are totally
//! ordered and reads see exactly the writes that completed before them.
//!
//! Routing of a notification:
//! 1. focus mode on and no bypass -> DND buffer
//! 2. a blocking category has active items -> wait set
//! 3. otherwise -> active queue (and active items of its child categories
//!    move to the wait set)
//!
//! After any change that can unblock a category, the wait set is re-scanned
//! until nothing more can be released.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{DependencyGraph, DndBuffer, FocusPolicy, PriorityQueue, UndoEntry, UndoStack, WaitSet};
use crate::error::{OrchestratorError, Result};
use crate::notification::{
    Category, LifecycleState, Notification, NotificationId, Priority, UrgencyClassifier,
};
use crate::snapshot::{
    DebugView, GlobalSummary, ModeState, NotificationView, RouteOutcome, StateSnapshot,
    SubmitReceipt,
};

const UNKNOWN_SENDER: &str = "Unknown";

/// Everything the orchestrator owns
#[derive(Debug)]
struct EngineState {
    classifier: UrgencyClassifier,
    graph: DependencyGraph,
    queue: PriorityQueue,
    waiting: WaitSet,
    buffer: DndBuffer,
    undo: UndoStack,
    focus: FocusPolicy,
}

/// Cloneable handle to one shared orchestration state
#[derive(Debug, Clone)]
pub struct Orchestrator {
    state: Arc<Mutex<EngineState>>,
}

impl Orchestrator {
    /// Empty structures configured from `config`.
    ///
    /// Fails with `CycleDetected` if the configured dependencies contain a cycle.
    pub fn new(config: &Config) -> Result<Self> {
        let graph = DependencyGraph::with_edges(config.dependencies.iter().copied())?;
        let state = EngineState {
            classifier: UrgencyClassifier::new(&config.classifier),
            graph,
            queue: PriorityQueue::new(),
            waiting: WaitSet::new(),
            buffer: DndBuffer::new(),
            undo: UndoStack::new(config.undo_capacity),
            focus: FocusPolicy::new(&config.focus),
        };

        info!(
            edges = state.graph.edge_count(),
            undo_capacity = state.undo.capacity(),
            override_threshold = %state.focus.override_threshold(),
            "Orchestrator initialized"
        );

        Ok(Self {
            state: Arc::new(Mutex::new(state)),
        })
    }

    /// Every operation leaves the state consistent before returning, so a
    /// poisoned lock still guards valid data.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Submit a new notification.
    ///
    /// `category` is the wire `app_type`. Validation happens before any id is
    /// allocated or any structure touched.
    pub fn notify(&self, sender: &str, content: &str, category: &str) -> Result<SubmitReceipt> {
        if content.trim().is_empty() {
            return Err(OrchestratorError::Validation("content must not be empty".to_string()));
        }
        if category.trim().is_empty() {
            return Err(OrchestratorError::Validation("app_type must not be empty".to_string()));
        }
        let category: Category = category
            .parse()
            .map_err(|e: crate::notification::UnknownCategory| {
                OrchestratorError::Validation(e.to_string())
            })?;

        let sender = match sender.trim() {
            "" => UNKNOWN_SENDER,
            s => s,
        };

        let mut state = self.lock();
        let mut notification = Notification::new(sender, content, category);
        notification.priority = state.classify(&notification);

        let id = notification.id;
        let priority = notification.priority;
        let status = state.route(notification);
        state.settle();

        info!(id = %id, category = %category, priority = %priority, status = ?status, "Notification submitted");
        Ok(SubmitReceipt { id, status, priority })
    }

    /// Remove a notification from the active queue or the DND buffer and
    /// record it for undo.
    pub fn dismiss(&self, id: NotificationId) -> Result<NotificationView> {
        let mut guard = self.lock();
        let state = &mut *guard;

        let removed = state
            .queue
            .remove_by_id(id)
            .or_else(|| state.buffer.remove_by_id(id))
            .ok_or(OrchestratorError::NotFound(id))?;

        let entry = UndoEntry::new(&removed);
        if let Some(evicted) = state.undo.push(entry) {
            debug!(id = %evicted.id(), "Undo entry evicted (capacity reached)");
        }
        state.settle();

        let mut view = NotificationView::from(&removed);
        view.status = LifecycleState::Dismissed;
        info!(
            id = %id,
            category = %removed.category,
            undo_depth = state.undo.len(),
            "Notification dismissed"
        );
        Ok(view)
    }

    /// Reverse the most recent dismissal.
    ///
    /// The restored item keeps its id, creation time and priority and goes
    /// through normal routing without being re-scored.
    pub fn undo(&self) -> Result<NotificationView> {
        let mut state = self.lock();
        let entry = state.undo.pop().ok_or(OrchestratorError::EmptyStack)?;

        let restored = entry.restore();
        let id = restored.id;
        let outcome = state.route(restored);
        state.settle();

        let view = state
            .find(id)
            .map(NotificationView::from)
            .unwrap_or_else(|| NotificationView::from(entry.snapshot()));
        info!(id = %id, from = ?entry.previous_state(), status = ?outcome, "Dismissal undone");
        Ok(view)
    }

    /// Turn focus mode on or off.
    ///
    /// Turning it on leaves active items alone. Turning it off drains the
    /// buffer in arrival order through classification and admission.
    pub fn set_mode(&self, active: bool, mode_name: Option<&str>) -> ModeState {
        let mut state = self.lock();
        let was_active = state.focus.is_active();
        state.focus.set(active, mode_name);

        if was_active && !active {
            let drained = state.buffer.drain_all();
            let count = drained.len();
            for mut notification in drained {
                notification.priority = state.classify(&notification);
                state.route(notification);
            }
            state.settle();
            info!(flushed = count, "Focus mode off, buffer flushed");
        } else if active {
            info!(mode = %state.focus.mode(), "Focus mode on");
        }

        state.mode_state()
    }

    /// Deliver the top active notification. Delivered items are gone for good.
    pub fn deliver_next(&self) -> Option<NotificationView> {
        let mut state = self.lock();
        let mut delivered = state.queue.extract_top()?;
        delivered.state = LifecycleState::Delivered;
        state.settle();

        debug!(id = %delivered.id, priority = %delivered.priority, "Notification delivered");
        Some(NotificationView::from(&delivered))
    }

    /// Short text summary of a notification that is still held
    pub fn summarize(&self, id: NotificationId) -> Result<String> {
        let state = self.lock();
        state
            .find(id)
            .map(Notification::summary)
            .ok_or(OrchestratorError::NotFound(id))
    }

    /// Add a blocking rule at runtime. Returns `false` if it already existed.
    pub fn add_dependency(&self, parent: Category, child: Category) -> Result<bool> {
        let mut state = self.lock();
        let added = state.graph.add_edge(parent, child).map_err(|e| {
            warn!(parent = %parent, child = %child, "Dependency rejected: would create a cycle");
            e
        })?;

        if added {
            state.demote_children(parent);
            state.settle();
            info!(parent = %parent, child = %child, "Dependency added");
        }
        Ok(added)
    }

    /// Drop a blocking rule. Returns whether it existed.
    pub fn remove_dependency(&self, parent: Category, child: Category) -> bool {
        let mut state = self.lock();
        let removed = state.graph.remove_edge(parent, child);
        if removed {
            state.settle();
            info!(parent = %parent, child = %child, "Dependency removed");
        }
        removed
    }

    /// Whether `a` blocks `b`, directly or transitively
    pub fn dominates(&self, a: Category, b: Category) -> bool {
        self.lock().graph.dominates(a, b)
    }

    /// Score without submitting
    pub fn classify(&self, sender: &str, content: &str, category: Category) -> Priority {
        self.lock().classifier.classify(sender, content, category)
    }

    pub fn mode(&self) -> ModeState {
        self.lock().mode_state()
    }

    /// Point-in-time copy of the dashboard state
    pub fn list(&self) -> StateSnapshot {
        let state = self.lock();
        let mode = state.mode_state();
        let global_summary = GlobalSummary::new(
            &mode,
            state.queue.category_counts(),
            state.buffer.category_counts(),
            state.waiting.len(),
        );

        StateSnapshot {
            active_queue: state.queue.as_level_order().iter().map(NotificationView::from).collect(),
            dnd_buffer: state.buffer.iter().map(NotificationView::from).collect(),
            waiting: state.waiting.to_vec().iter().map(NotificationView::from).collect(),
            is_dnd: mode.is_dnd,
            mode: mode.mode,
            global_summary,
        }
    }

    /// Raw structure dump for the debug panel
    pub fn visualize(&self) -> DebugView {
        let state = self.lock();
        DebugView {
            heap: state.queue.as_level_order().iter().map(NotificationView::from).collect(),
            graph: state.graph.adjacency(),
            stack: state.undo.iter_top_first().map(|e| e.content().to_string()).collect(),
        }
    }

    /// Check every structural invariant; returns a description of each violation
    pub fn consistency_violations(&self) -> Vec<String> {
        self.lock().violations()
    }
}

impl EngineState {
    fn classify(&self, notification: &Notification) -> Priority {
        self.classifier
            .classify(&notification.sender, &notification.content, notification.category)
    }

    fn mode_state(&self) -> ModeState {
        ModeState {
            is_dnd: self.focus.is_active(),
            mode: self.focus.mode().to_string(),
        }
    }

    /// Look in the queue, the buffer and the wait set
    fn find(&self, id: NotificationId) -> Option<&Notification> {
        self.queue
            .get(id)
            .or_else(|| self.buffer.get(id))
            .or_else(|| self.waiting.get(id))
    }

    fn route(&mut self, mut notification: Notification) -> RouteOutcome {
        if self.focus.should_buffer(&notification) {
            debug!(id = %notification.id, priority = %notification.priority, "Buffered (focus mode)");
            notification.state = LifecycleState::Buffered;
            self.buffer.enqueue(notification);
            return RouteOutcome::Buffered;
        }
        self.admit(notification)
    }

    /// Dependency check, then queue insertion
    fn admit(&mut self, mut notification: Notification) -> RouteOutcome {
        let category = notification.category;
        if !self.graph.is_admissible(category, &self.queue.category_counts()) {
            debug!(id = %notification.id, category = %category, "Waiting on blocking category");
            notification.state = LifecycleState::Pending;
            self.waiting.insert(notification);
            return RouteOutcome::Waiting;
        }

        notification.state = LifecycleState::Active;
        self.queue.insert(notification);
        self.demote_children(category);
        RouteOutcome::Active
    }

    /// Move active items blocked by `category` back to the wait set
    fn demote_children(&mut self, category: Category) {
        if self.queue.count(category) == 0 {
            return;
        }
        let children: Vec<Category> = self.graph.children(category).collect();
        for child in children {
            for mut notification in self.queue.drain_category(child) {
                debug!(id = %notification.id, category = %child, blocker = %category, "Demoted to wait set");
                notification.state = LifecycleState::Pending;
                self.waiting.insert(notification);
            }
        }
    }

    /// Release waiting items whose blockers are gone, until nothing changes.
    ///
    /// Each round settles at least one more level of the dependency DAG, so
    /// `Category::COUNT + 1` rounds always reach the fixed point.
    fn settle(&mut self) {
        for _ in 0..=Category::COUNT {
            let counts = self.queue.category_counts();
            let ready: Vec<Category> = self
                .waiting
                .waiting_categories()
                .into_iter()
                .filter(|&c| self.graph.is_admissible(c, &counts))
                .collect();
            if ready.is_empty() {
                return;
            }

            let mut released: Vec<Notification> =
                ready.into_iter().flat_map(|c| self.waiting.take(c)).collect();
            released.sort_by(|a, b| a.creation_cmp(b));

            for mut notification in released {
                notification.priority = self.classify(&notification);
                debug!(id = %notification.id, category = %notification.category, "Released from wait set");
                self.route(notification);
            }
        }
        warn!(waiting = self.waiting.len(), "Wait set did not settle");
    }

    fn violations(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if !self.queue.is_consistent() {
            problems.push("heap order or position index broken".to_string());
        }
        if self.graph.has_cycle() {
            problems.push("dependency graph has a cycle".to_string());
        }

        let counts = self.queue.category_counts();
        for (parent, child) in self.graph.edges() {
            if counts[parent.index()] > 0 && counts[child.index()] > 0 {
                problems.push(format!("{} active while blocker {} is active", child, parent));
            }
        }

        let mut owners: HashMap<NotificationId, usize> = HashMap::new();
        let waiting = self.waiting.to_vec();
        let held = self
            .queue
            .as_level_order()
            .iter()
            .chain(self.buffer.iter())
            .chain(waiting.iter())
            .map(|n| n.id)
            .chain(self.undo.iter_top_first().map(UndoEntry::id));
        for id in held {
            *owners.entry(id).or_default() += 1;
        }
        for (id, count) in owners {
            if count > 1 {
                problems.push(format!("notification {} held by {} structures", id, count));
            }
        }

        problems
    }
}
