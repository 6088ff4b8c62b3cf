//! Task module - task records, lifecycle status and the in-memory store.
//!
//! - `status`: closed status enum and its string contract
//! - `task`: task record, create payload, partial update, due date rules
//! - `store`: filtering, sorting, lookup and mutations over the collection

pub mod status;
pub mod store;
pub mod task;

pub use status::{ParseTaskStatusError, TaskStatus};
pub use store::{ListQuery, SharedTaskStore, SortDirection, SortField, TaskStore};
pub use task::{validate_due_date, NewTask, Task, TaskError, TaskId, TaskPatch};
