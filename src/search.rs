//! Handle matching and the cross-source earliest-message search.

use crate::normalize::normalize;
use crate::source::{MessageRecord, MessageSource};
use tracing::{debug, warn};

/// A message paired with the source it was found in.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub source_label: String,
    pub message: MessageRecord,
}

/// Handles in `source` whose digits-only form contains the digits-only form
/// of `target`.
///
/// Only target-in-handle is tested, so a fragment like "5550100" matches
/// both "+1-555-0100" and "555.0100". A target with no digits at all
/// matches every handle; that mirrors the substring rule literally and is
/// kept on purpose, but callers should not lean on it.
///
/// A failed handle listing is logged against the source and treated as an
/// empty set, so the remaining sources still get searched.
pub fn matching_handles(source: &dyn MessageSource, target: &str) -> Vec<String> {
    let target_norm = normalize(target);

    let handles = match source.distinct_handles() {
        Ok(handles) => handles,
        Err(e) => {
            warn!("skipping source: {}", e);
            return Vec::new();
        }
    };

    handles
        .into_iter()
        .filter(|h| normalize(h).contains(&target_norm))
        .collect()
}

/// Find the globally earliest message for `target` across `sources`.
///
/// Sources are scanned in configuration order, handles in each source's
/// enumeration order. The strict `<` comparison means ties on equal raw
/// timestamps go to the first candidate seen in that scan order. Returns
/// `None` when no reachable source holds a matching handle with messages.
pub fn first_message_for_target(
    sources: &[Box<dyn MessageSource>],
    target: &str,
) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;

    for source in sources {
        if !source.is_reachable() {
            debug!("source {} not present, skipping", source.label());
            continue;
        }

        for handle in matching_handles(source.as_ref(), target) {
            let message = match source.earliest_message(&handle) {
                Ok(Some(message)) => message,
                Ok(None) => continue,
                Err(e) => {
                    warn!("skipping handle {:?}: {}", handle, e);
                    continue;
                }
            };

            let is_earlier = best
                .as_ref()
                .map(|b| message.raw_timestamp < b.message.raw_timestamp)
                .unwrap_or(true);
            if is_earlier {
                best = Some(Candidate {
                    source_label: source.label().to_string(),
                    message,
                });
            }
        }
    }

    best
}
