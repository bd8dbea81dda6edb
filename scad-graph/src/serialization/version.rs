//! Frame versioning for the persisted circuit format.

/// The current on-disk protocol version. Any change to command shape must
/// bump this; readers refuse a mismatched version rather than guess (see
/// [`super::error::PersistenceError::IncompatibleFile`]).
pub const PROTOCOL_VERSION: u8 = 1;
