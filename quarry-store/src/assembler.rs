//! Merging ranked hits into a prompt-ready context.
//!
//! The assembled context is the hit contents joined with single spaces in
//! rank order, with no separators and no ranking markers. Nearer chunks are not
//! visually prioritized in the joined string; that's a deliberate
//! simplicity trade-off, since the downstream prompt treats the context as
//! one undifferentiated knowledge blob.

use crate::vector_store::SearchHit;
use quarry_context::Provenance;
use serde::Serialize;

/// The output handed to a conversational responder: one context string plus
/// the distinct provenance of everything it contains.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedContext {
    pub context: String,
    pub provenance: Vec<Provenance>,
}

/// Join hit contents in rank order and de-duplicate their provenance.
///
/// Provenance comparison is canonical structural equality (not serialized
/// string comparison), in first-occurrence order: a document whose chunks
/// fill several ranked slots is reported once.
pub fn assemble(hits: &[SearchHit]) -> RetrievedContext {
    let context = hits
        .iter()
        .map(|hit| hit.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let mut provenance: Vec<Provenance> = Vec::new();
    for hit in hits {
        if !provenance.contains(&hit.provenance) {
            provenance.push(hit.provenance.clone());
        }
    }

    RetrievedContext {
        context,
        provenance,
    }
}
