pub mod category;
pub mod todo;
pub mod user;

pub use category::{Category, CategoryInput, CategorySummary};
pub use todo::{CategoryRef, Priority, Todo, TodoChanges, TodoInput, TodoRow, ToggleInput};
pub use user::{PublicUser, User};
