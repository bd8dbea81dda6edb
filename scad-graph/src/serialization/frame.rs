//! The binary frame: `START_BYTE`, `PROTOCOL_VERSION`, command count, N
//! length-prefixed JSON command payloads, `END_BYTE`.

use std::io::{Read, Write};

use super::error::{PersistenceError, Result};
use super::record::PersistedCommand;
use super::version::PROTOCOL_VERSION;

const START_BYTE: u8 = 10;
const END_BYTE: u8 = 42;

fn corrupted(reason: impl Into<String>) -> PersistenceError {
    PersistenceError::FileCorrupted { reason: reason.into() }
}

/// Write the frame to `writer`. The writer is scoped-acquisition: callers
/// open it, pass it here, and let it close on their own return path (via
/// `Drop`), the same `?`-propagating pattern the rest of this crate uses.
pub fn write_frame(writer: &mut impl Write, commands: &[PersistedCommand]) -> Result<()> {
    writer.write_all(&[START_BYTE, PROTOCOL_VERSION])?;
    writer.write_all(&(commands.len() as u32).to_be_bytes())?;
    for command in commands {
        let payload = serde_json::to_vec(command)?;
        writer.write_all(&(payload.len() as u32).to_be_bytes())?;
        writer.write_all(&payload)?;
    }
    writer.write_all(&[END_BYTE])?;
    Ok(())
}

/// Read and validate the frame from `reader`, returning its command list.
pub fn read_frame(reader: &mut impl Read) -> Result<Vec<PersistedCommand>> {
    let mut header = [0u8; 2];
    reader.read_exact(&mut header).map_err(|_| corrupted("truncated header"))?;
    if header[0] != START_BYTE {
        return Err(corrupted(format!("bad start byte {:#x}", header[0])));
    }
    if header[1] != PROTOCOL_VERSION {
        return Err(PersistenceError::IncompatibleFile { found: header[1], expected: PROTOCOL_VERSION });
    }

    let mut count_bytes = [0u8; 4];
    reader.read_exact(&mut count_bytes).map_err(|_| corrupted("truncated command count"))?;
    let count = u32::from_be_bytes(count_bytes);

    let mut commands = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut len_bytes = [0u8; 4];
        reader.read_exact(&mut len_bytes).map_err(|_| corrupted("truncated payload length"))?;
        let len = u32::from_be_bytes(len_bytes) as usize;

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload).map_err(|_| corrupted("truncated payload"))?;
        commands.push(serde_json::from_slice(&payload)?);
    }

    let mut end = [0u8; 1];
    reader.read_exact(&mut end).map_err(|_| corrupted("truncated end byte"))?;
    if end[0] != END_BYTE {
        return Err(corrupted(format!("bad end byte {:#x}", end[0])));
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CreateRequest;
    use scad_components::GateKind;
    use std::io::Cursor;

    fn sample_commands() -> Vec<PersistedCommand> {
        vec![
            PersistedCommand::Create(CreateRequest::InputPin),
            PersistedCommand::Create(CreateRequest::PrimitiveGate(GateKind::And)),
            PersistedCommand::Delete(scad_core::Id::new("G0")),
        ]
    }

    #[test]
    fn round_trips_through_an_in_memory_buffer() {
        let commands = sample_commands();
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &commands).unwrap();

        let restored = read_frame(&mut Cursor::new(buffer)).unwrap();
        assert_eq!(restored, commands);
    }

    #[test]
    fn rejects_bad_start_byte_as_corrupted() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &sample_commands()).unwrap();
        buffer[0] = 99;

        let err = read_frame(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(err, PersistenceError::FileCorrupted { .. }));
    }

    #[test]
    fn rejects_mismatched_version_s6() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &sample_commands()).unwrap();
        buffer[1] = 2;

        let err = read_frame(&mut Cursor::new(buffer)).unwrap_err();
        assert_eq!(err.to_string(), PersistenceError::IncompatibleFile { found: 2, expected: 1 }.to_string());
    }

    #[test]
    fn rejects_truncated_buffer_as_corrupted() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &sample_commands()).unwrap();
        buffer.truncate(buffer.len() - 3);

        let err = read_frame(&mut Cursor::new(buffer)).unwrap_err();
        assert!(matches!(err, PersistenceError::FileCorrupted { .. }));
    }

    #[test]
    fn empty_command_list_round_trips() {
        let mut buffer = Vec::new();
        write_frame(&mut buffer, &[]).unwrap();
        let restored = read_frame(&mut Cursor::new(buffer)).unwrap();
        assert!(restored.is_empty());
    }
}
