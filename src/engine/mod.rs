//! Orchestration data structures
//!
//! Each structure is single-threaded and knows nothing about the others;
//! `service::Orchestrator` composes them under one lock.

pub mod dnd;
pub mod graph;
pub mod queue;
pub mod undo;
pub mod wait_set;

pub use dnd::{DndBuffer, FocusPolicy};
pub use graph::DependencyGraph;
pub use queue::PriorityQueue;
pub use undo::{UndoEntry, UndoStack};
pub use wait_set::WaitSet;
