use crate::models::{MatchWeights, ProfileField, UserProfile};

/// How the collector picks the next open field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldOrder {
    /// Walk the canonical question sequence.
    #[default]
    Sequence,
    /// Ask the open field with the highest configured weight first.
    WeightPrioritized,
}

impl FieldOrder {
    pub fn parse(name: &str) -> Option<FieldOrder> {
        match name.trim().to_lowercase().as_str() {
            "sequence" => Some(FieldOrder::Sequence),
            "weighted" | "weight-prioritized" => Some(FieldOrder::WeightPrioritized),
            _ => None,
        }
    }
}

/// Outcome of submitting one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceResult {
    /// The answer was stored; `next` is the field to ask now, if any.
    Advanced {
        field: ProfileField,
        next: Option<ProfileField>,
    },
    /// The answer was not usable; the same field is re-asked and no
    /// state changed.
    Rejected { field: ProfileField },
    /// Every field is already locked; nothing was stored.
    AlreadyComplete,
}

/// Drives the question sequence: one answer per turn, never re-asking a
/// locked field.
///
/// States are `Collecting(next_field)` and `Complete`. Completion is
/// reached when the locked-field count meets the configured threshold;
/// the primary flow stops asking there, but answers past the threshold
/// still lock normally. An explicit unlock re-opens exactly that field
/// as the next target while leaving every other lock intact.
#[derive(Debug, Clone)]
pub struct ProfileCollector {
    profile: UserProfile,
    order: FieldOrder,
    threshold: usize,
    weights: MatchWeights,
    /// Field re-opened by an unlock request; asked before anything else.
    reopened: Option<ProfileField>,
}

impl ProfileCollector {
    /// `threshold` is clamped into `1..=ProfileField::ALL.len()`.
    pub fn new(order: FieldOrder, threshold: usize, weights: MatchWeights) -> Self {
        Self {
            profile: UserProfile::new(),
            order,
            threshold: threshold.clamp(1, ProfileField::ALL.len()),
            weights,
            reopened: None,
        }
    }

    /// Collector that asks every field in sequence.
    pub fn full_sequence() -> Self {
        Self::new(
            FieldOrder::Sequence,
            ProfileField::ALL.len(),
            MatchWeights::default(),
        )
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Lock count vs. threshold, nothing else.
    pub fn is_complete(&self) -> bool {
        self.profile.locked_count() >= self.threshold
    }

    /// The field the next submitted answer binds to, or `None` when every
    /// field is locked.
    ///
    /// Does not stop at the completion threshold: answers offered past it
    /// still have a target, so over-collection locks normally.
    pub fn current_field(&self) -> Option<ProfileField> {
        if let Some(field) = self.reopened {
            if !self.profile.is_locked(field) {
                return Some(field);
            }
        }
        self.next_open_field()
    }

    /// The question the primary flow should ask now, or `None` once the
    /// completion threshold is met.
    ///
    /// A field re-opened by `request_unlock` takes priority even when the
    /// lock count still meets the threshold.
    pub fn pending_question(&self) -> Option<ProfileField> {
        if let Some(field) = self.reopened {
            if !self.profile.is_locked(field) {
                return Some(field);
            }
        }
        if self.is_complete() {
            return None;
        }
        self.next_open_field()
    }

    /// Store one answer against the current field.
    ///
    /// Empty or whitespace-only input is rejected without consuming the
    /// turn or touching lock state. Submitting once every field is locked
    /// is a no-op status, never an error.
    pub fn submit_answer(&mut self, raw_text: &str) -> AdvanceResult {
        let Some(field) = self.current_field() else {
            return AdvanceResult::AlreadyComplete;
        };

        let answer = raw_text.trim();
        if answer.is_empty() {
            return AdvanceResult::Rejected { field };
        }

        self.profile.set(field, answer);
        if self.reopened == Some(field) {
            self.reopened = None;
        }

        AdvanceResult::Advanced {
            field,
            next: self.pending_question(),
        }
    }

    /// Clear the lock and stored value for exactly one field.
    ///
    /// Returns whether anything changed; an unanswered field is a no-op.
    /// Never unlocks more than the named field.
    pub fn request_unlock(&mut self, field: ProfileField) -> bool {
        if self.profile.unlock(field) {
            self.reopened = Some(field);
            true
        } else {
            false
        }
    }

    /// Forget every answer and start over.
    pub fn restart(&mut self) {
        self.profile.clear();
        self.reopened = None;
    }

    fn next_open_field(&self) -> Option<ProfileField> {
        match self.order {
            FieldOrder::Sequence => ProfileField::ALL
                .iter()
                .copied()
                .find(|f| !self.profile.is_locked(*f)),
            FieldOrder::WeightPrioritized => {
                let mut best: Option<(ProfileField, f64)> = None;
                for field in ProfileField::ALL {
                    if self.profile.is_locked(field) {
                        continue;
                    }
                    let weight = self.weights.get(field).unwrap_or(0.0);
                    let better = match best {
                        Some((_, best_weight)) => weight > best_weight,
                        None => true,
                    };
                    if better {
                        best = Some((field, weight));
                    }
                }
                best.map(|(field, _)| field)
            }
        }
    }
}
