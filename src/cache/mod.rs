//! Cache
//!
//! Este módulo contiene el almacenamiento de la sesión del administrador.

pub mod session_store;

pub use session_store::{
    FileSessionStore, MemorySessionStore, SessionHandle, SessionState, SessionStorage, SESSION_KEY,
};
