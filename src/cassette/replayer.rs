//! Replays recorded exchanges from a cassette.

use std::collections::VecDeque;

use super::format::{Cassette, Interaction};

/// Serves a cassette's interactions in recorded order.
#[derive(Debug)]
pub struct CassetteReplayer {
    pending: VecDeque<Interaction>,
    served: usize,
}

impl CassetteReplayer {
    /// Create a new replayer from a loaded cassette.
    #[must_use]
    pub fn new(cassette: &Cassette) -> Self {
        let mut pending: Vec<Interaction> = cassette.interactions.clone();
        pending.sort_by_key(|i| i.seq);
        Self { pending: pending.into(), served: 0 }
    }

    /// Return the next interaction.
    ///
    /// # Errors
    ///
    /// Returns an error once every recorded interaction has been served.
    pub fn next_interaction(&mut self) -> Result<Interaction, String> {
        let interaction = self.pending.pop_front().ok_or_else(|| {
            format!("cassette exhausted: all {} interactions have been consumed", self.served)
        })?;
        self.served += 1;
        Ok(interaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cassette::format::Outcome;
    use chrono::Utc;

    fn interaction(seq: u64, url: &str) -> Interaction {
        Interaction { seq, url: url.into(), outcome: Outcome::Err(format!("#{seq}")) }
    }

    fn make_cassette(interactions: Vec<Interaction>) -> Cassette {
        Cassette { name: "test".into(), recorded_at: Utc::now(), interactions }
    }

    #[test]
    fn replay_in_seq_order() {
        let cassette = make_cassette(vec![interaction(1, "second"), interaction(0, "first")]);
        let mut replayer = CassetteReplayer::new(&cassette);

        assert_eq!(replayer.next_interaction().unwrap().url, "first");
        assert_eq!(replayer.next_interaction().unwrap().url, "second");
    }

    #[test]
    fn exhausted_replayer_errors() {
        let cassette = make_cassette(vec![interaction(0, "only")]);
        let mut replayer = CassetteReplayer::new(&cassette);

        replayer.next_interaction().unwrap();
        let err = replayer.next_interaction().unwrap_err();
        assert!(err.contains("cassette exhausted"), "got: {err}");
        assert!(err.contains("all 1 interactions"), "got: {err}");
    }

    #[test]
    fn empty_cassette_errors_immediately() {
        let mut replayer = CassetteReplayer::new(&make_cassette(vec![]));
        assert!(replayer.next_interaction().is_err());
    }
}
