//! In-memory task store.
//!
//! The store owns an insertion-ordered collection and exposes the query and
//! mutation operations the API is built on. Every mutation validates its
//! input before touching the collection, so a failed call never leaves a
//! partial write behind.

use std::cmp::Ordering;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::status::TaskStatus;
use super::task::{NewTask, Task, TaskError, TaskId, TaskPatch};

/// Field used to order `list` results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    Name,
    Category,
    DueDate,
    /// Orders by due date, not by status value. Kept for compatibility with
    /// existing clients.
    Status,
}

impl SortField {
    /// Map a `sortBy` value. Unknown or missing names fall back to `id`.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("id") => Self::Id,
            Some("name") => Self::Name,
            Some("category") => Self::Category,
            Some("dueDate") => Self::DueDate,
            Some("status") => Self::Status,
            _ => Self::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Category => "category",
            Self::DueDate => "dueDate",
            Self::Status => "status",
        }
    }

    fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Category => a.category.cmp(&b.category),
            Self::DueDate | Self::Status => a.due_date.cmp(&b.due_date),
        }
    }
}

/// Direction of `list` ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` in any case selects descending, everything else is ascending.
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(dir) if dir.eq_ignore_ascii_case("desc") => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter and ordering for [`TaskStore::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    /// Exact, case-sensitive category match. Empty means no filter.
    pub category: Option<String>,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl ListQuery {
    pub fn from_params(
        category: Option<&str>,
        sort_by: Option<&str>,
        sort_dir: Option<&str>,
    ) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()).map(str::to_string),
            sort_field: SortField::from_param(sort_by),
            direction: SortDirection::from_param(sort_dir),
        }
    }

    fn matches(&self, task: &Task) -> bool {
        match &self.category {
            Some(category) if !category.is_empty() => task.category == *category,
            _ => true,
        }
    }
}

/// Owned, insertion-ordered task collection.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

/// Store shared between request handlers. Mutations take the write lock, so
/// at most one is in progress at a time.
pub type SharedTaskStore = Arc<RwLock<TaskStore>>;

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// Store preloaded with the initial task set. Ids 3 are deliberately
    /// duplicated; lookups resolve to the first one.
    pub fn seeded() -> Self {
        Self::with_tasks(vec![
            Task::new(1, "Task 1", "Category 1", "2023-01-01", TaskStatus::Todo),
            Task::new(2, "Task 2", "Category 2", "2023-03-15", TaskStatus::Doing),
            Task::new(3, "Task 3A", "Category 3", "2023-06-30", TaskStatus::Doing),
            Task::new(3, "Task 3B", "Category 3", "2024-01-31", TaskStatus::Done),
        ])
    }

    pub fn into_shared(self) -> SharedTaskStore {
        Arc::new(RwLock::new(self))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Filtered, sorted copy of the collection.
    ///
    /// The sort is stable in both directions: descending reverses the
    /// comparison rather than the output, so equal keys keep collection
    /// order.
    pub fn list(&self, query: &ListQuery) -> Vec<Task> {
        tracing::debug!(
            sort_by = query.sort_field.as_str(),
            sort_dir = query.direction.as_str(),
            category = query.category.as_deref().unwrap_or(""),
            "Listing tasks"
        );

        let mut tasks: Vec<Task> = self
            .tasks
            .iter()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();

        tasks.sort_by(|a, b| {
            let ordering = query.sort_field.compare(a, b);
            match query.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });

        tasks
    }

    /// First task with `id` in collection order.
    pub fn get(&self, id: TaskId) -> Result<&Task, TaskError> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    /// Validate and append a new task.
    ///
    /// The id is `len + 1`, not `max + 1`, so after a deletion it can
    /// collide with an existing id.
    pub fn create(&mut self, new: NewTask) -> Result<Task, TaskError> {
        new.validate()?;

        let id = self.tasks.len() as TaskId + 1;
        let task = new.into_task(id);
        self.tasks.push(task.clone());

        tracing::info!(id = task.id, name = %task.name, "Created task");
        Ok(task)
    }

    /// Apply `patch` to the first task with `id`.
    pub fn update(&mut self, id: TaskId, patch: TaskPatch) -> Result<Task, TaskError> {
        patch.validate()?;

        let task = self
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))?;
        patch.apply_to(task);

        tracing::info!(id, name = %task.name, "Updated task");
        Ok(task.clone())
    }

    /// Remove the first task with `id`, keeping the rest in order.
    pub fn delete(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))?;
        let removed = self.tasks.remove(index);

        tracing::info!(id, name = %removed.name, "Deleted task");
        Ok(removed)
    }
}
