//! Client-side state.
//!
//! DESIGN
//! ======
//! The admin session is the only shared mutable state in the console. It is
//! owned by `SessionStore`; everything else holds a cloned handle and goes
//! through its narrow interface (`current`, `set_auth`, `logout`).

pub mod session;
pub mod storage;

pub use session::{Credentials, Session, SessionError, SessionStatus, SessionStore};
pub use storage::{FileStorage, MemoryStorage, SessionStorage, StorageError};
