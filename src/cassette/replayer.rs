//! Replays recorded interactions from a cassette.

use std::collections::HashMap;

use super::format::{Cassette, Interaction};
use super::CassetteError;

/// Key for indexing interactions by port and method.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct PortMethodKey {
    port: String,
    method: String,
}

/// Position within one port/method queue.
#[derive(Debug, Default)]
struct Cursor {
    index: usize,
    /// Calls already served from the entry at `index`.
    served: u64,
}

/// Replays interactions from a loaded cassette, serving them sequentially
/// per port/method pair. An entry with `repeat: n` is served `n` times.
#[derive(Debug)]
pub struct CassetteReplayer {
    /// Per port+method queue of interactions (in order).
    queues: HashMap<PortMethodKey, Vec<Interaction>>,
    /// Per port+method cursor tracking position.
    cursors: HashMap<PortMethodKey, Cursor>,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut queues: HashMap<PortMethodKey, Vec<Interaction>> = HashMap::new();
        for interaction in &cassette.interactions {
            let key = PortMethodKey {
                port: interaction.port.clone(),
                method: interaction.method.clone(),
            };
            queues.entry(key).or_default().push(interaction.clone());
        }
        Self { queues, cursors: HashMap::new() }
    }

    /// Return the next interaction for the given port and method.
    ///
    /// # Errors
    ///
    /// Returns [`CassetteError::Exhausted`] if the cassette has no (more)
    /// interactions for the pair.
    pub fn next_interaction(
        &mut self,
        port: &str,
        method: &str,
    ) -> Result<&Interaction, CassetteError> {
        let key = PortMethodKey { port: port.to_string(), method: method.to_string() };
        let exhausted = |recorded| CassetteError::Exhausted {
            port: port.to_string(),
            method: method.to_string(),
            recorded,
        };

        let Some(queue) = self.queues.get(&key) else {
            return Err(exhausted(0));
        };
        let cursor = self.cursors.entry(key).or_default();
        let interaction = queue.get(cursor.index).ok_or_else(|| exhausted(queue.len()))?;
        cursor.served += 1;
        if cursor.served >= interaction.repeat {
            cursor.index += 1;
            cursor.served = 0;
        }
        Ok(interaction)
    }
}
