//! Persistence for a live editor's command log.
//!
//! A circuit is saved as the ordered list of top-level commands that built
//! it, framed with a magic byte and a version byte so a future reader can
//! tell a foreign or stale file from a genuine one before trusting its
//! contents. See [`frame`] for the wire format and [`record::PersistedCommand`]
//! for the per-command payload.

pub mod error;
pub mod frame;
pub mod io;
pub mod record;
pub mod version;

pub use error::{PersistenceError, Result};
pub use frame::{read_frame, write_frame};
pub use io::{circuit_path, list_circuit_files, load, save, FILE_EXTENSION};
pub use record::PersistedCommand;
pub use version::PROTOCOL_VERSION;
