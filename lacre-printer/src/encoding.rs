//! Text handling for ZPL payloads
//!
//! ZPL is a plain-text command language with two sharp edges:
//! - `^` and `~` start commands anywhere in the stream, so they must
//!   never appear inside operator-supplied field data
//! - printers consume single-byte text, so the finished program is
//!   encoded to Windows-1252 before it touches a wire

/// Strip characters that would break out of a `^FD` field
///
/// Removes the ZPL command prefixes (`^`, `~`) and any control
/// characters. Everything else passes through unchanged.
pub fn sanitize_field(data: &str) -> String {
    data.chars()
        .filter(|c| *c != '^' && *c != '~' && !c.is_control())
        .collect()
}

/// Encode a finished ZPL program for the wire
///
/// Windows-1252 is an exact superset of printable ASCII, so command
/// characters are single-byte-clean; accented label text maps to the
/// printer's single-byte code page. Unmappable characters are replaced
/// by the encoder.
pub fn encode_wire(zpl: &str) -> Vec<u8> {
    let (bytes, _, _) = encoding_rs::WINDOWS_1252.encode(zpl);
    bytes.into_owned()
}
