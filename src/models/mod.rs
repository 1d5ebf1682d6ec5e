pub mod task;
pub mod user;

pub use task::{CreateTaskRequest, NewTask, RemoveTaskRequest, Task, UpdateTaskRequest, UserRef};
pub use user::{CreateUserRequest, NewUser, RemoveUserRequest, UpdateUserRequest, User};

/// Mapping metadata kept next to each persisted struct.
///
/// The store builds its generic queries from these constants; they are fixed
/// identifiers, never user input.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// Fields supplied on creation, before the store assigns an id.
    type Draft: Send + 'static;

    /// Human readable name used in error messages.
    const LABEL: &'static str;
    const TABLE: &'static str;
    /// Columns selected for every read, primary key first.
    const COLUMNS: &'static [&'static str];
    /// Column matched exactly by `findByName`.
    const NAME_COLUMN: &'static str;

    fn id(&self) -> i32;

    /// Value of `NAME_COLUMN` for this row.
    fn name(&self) -> &str;

    /// Builds the persisted row from its draft once the id is known.
    fn from_draft(id: i32, draft: Self::Draft) -> Self;
}
