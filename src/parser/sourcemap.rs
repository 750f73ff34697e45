//! Locates the `sourceMappingURL` reference embedded in bundle chunks.

use crate::types::Chunk;

const SOURCE_MAPPING_MARKER: &str = "sourceMappingURL=";

/// Return the source map reference from the last chunk that carries one, or an
/// empty string when none does.
///
/// Both chunk forms are scanned, but only raw string chunks can supply the
/// returned reference; a wrapped chunk holding the marker is ignored. Within a
/// chunk the reference is the text between the first marker and the next one
/// (or the end of the chunk).
pub fn find_source_map(children: &[Chunk]) -> String {
    children.iter().fold(String::new(), |found, chunk| {
        let mut partials = chunk.payload().split(SOURCE_MAPPING_MARKER);
        let reference = partials.nth(1);

        match (chunk, reference) {
            (Chunk::Raw(_), Some(reference)) => reference.to_string(),
            _ => found,
        }
    })
}
