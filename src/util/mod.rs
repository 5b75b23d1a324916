pub mod context;
pub mod routine;
pub mod r#type;
pub mod version;

pub use context::{Context, ContextError};
pub use routine::{invoke, invoke_task, join_with_context};
pub use r#type::{AsyncReadWrite, Conn, StringMap};
pub use version::PROGRAM_VERSION_NAME;
