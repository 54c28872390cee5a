//! Notification orchestration engine
//!
//! Scores incoming notifications, orders them in a priority heap, gates
//! categories behind blocking categories, parks non-critical items while
//! focus mode is on, and lets the last dismissals be undone.

pub mod config;
pub mod engine;
pub mod error;
pub mod notification;
pub mod rpc;
pub mod service;
pub mod snapshot;

pub use config::{ClassifierConfig, Config, FocusConfig};
pub use engine::{DependencyGraph, DndBuffer, FocusPolicy, PriorityQueue, UndoEntry, UndoStack, WaitSet};
pub use error::{OrchestratorError, Result};
pub use notification::{
    Category, LifecycleState, Notification, NotificationId, Priority, Urgency, UrgencyClassifier,
};
pub use rpc::{RpcRequest, RpcResponse, RpcServer};
pub use service::Orchestrator;
pub use snapshot::{
    DebugView, GlobalSummary, ModeState, NotificationView, RouteOutcome, StateSnapshot,
    SubmitReceipt,
};
