use crate::core::input::Hand;

/// Per-hand input channel state.
#[derive(Clone, Copy, Debug, Default)]
pub struct HandState {
    /// Continuous hold reported by the most recent press/held event.
    pub hold_secs: f32,
    /// Engine-clock timestamp of the most recent release. 0 = never
    /// released; the engine clock itself never reports 0.
    pub last_release_ms: u64,
    /// Set while this hand is held and the other hand was also observed
    /// held; cleared by this hand's release.
    pub dual_held: bool,
    /// Button currently treated as a block modifier, not an attack trigger.
    pub alt_behavior: bool,
    /// Pre-attack cue already fired for the current hold cycle.
    pub attack_indicated: bool,
}

/// Everything a release decision needs, captured before the tracker
/// mutates itself.
#[derive(Clone, Copy, Debug)]
pub struct ReleaseOutcome {
    pub hand: Hand,
    /// The other hand was idle when this release arrived.
    pub other_hand_idle: bool,
    /// Distance between the two hands' last releases, after this one.
    pub time_diff_ms: u64,
    /// Larger of the two captured hold durations.
    pub max_hold_secs: f32,
    /// Captured pairing flag for the releasing hand.
    pub dual_held: bool,
}

impl ReleaseOutcome {
    /// Exactly-once rule: a release resolves when the other hand was idle,
    /// or on the left hand when both releases land in the same millisecond.
    /// The second release of a simultaneous pair sees the other hand
    /// already back at zero hold and is suppressed by the left-only
    /// tie-break.
    #[inline(always)]
    pub const fn should_resolve(&self) -> bool {
        self.other_hand_idle || (self.time_diff_ms == 0 && self.hand.is_left())
    }
}

/// Both hands' tracked state. Owned by the listener and only touched from
/// the event-delivery thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatInputState {
    hands: [HandState; 2],
}

impl CombatInputState {
    #[inline(always)]
    pub fn hand(&self, hand: Hand) -> &HandState {
        &self.hands[hand.index()]
    }

    #[inline(always)]
    fn hand_mut(&mut self, hand: Hand) -> &mut HandState {
        &mut self.hands[hand.index()]
    }

    /// Press-or-held update for `hand` with the event's reported duration.
    /// While `hand` is active, the other hand is flagged dual-held as soon
    /// as it shows any hold of its own, so either hand's eventual release
    /// can recognize the pairing.
    pub fn note_press(&mut self, hand: Hand, held_secs: f32) {
        let other_holding = self.hand(hand.other()).hold_secs > 0.0;
        let h = self.hand_mut(hand);
        h.hold_secs = held_secs;
        h.alt_behavior = false;
        let o = self.hand_mut(hand.other());
        o.dual_held = o.dual_held || other_holding;
    }

    /// Release update at engine time `now_ms`. Captures the pre-release
    /// view the classifier needs before zeroing this hand.
    pub fn note_release(&mut self, hand: Hand, now_ms: u64) -> ReleaseOutcome {
        let held = self.hand(hand).hold_secs;
        let other = *self.hand(hand.other());

        let h = self.hand_mut(hand);
        h.hold_secs = 0.0;
        h.last_release_ms = now_ms;
        self.hand_mut(hand.other()).dual_held = false;

        let time_diff_ms = self
            .hand(Hand::Left)
            .last_release_ms
            .abs_diff(self.hand(Hand::Right).last_release_ms);

        ReleaseOutcome {
            hand,
            other_hand_idle: other.hold_secs == 0.0,
            time_diff_ms,
            max_hold_secs: held.max(other.hold_secs),
            dual_held: other.dual_held,
        }
    }

    #[inline(always)]
    pub fn alt_behavior(&self, hand: Hand) -> bool {
        self.hand(hand).alt_behavior
    }

    pub fn set_alt_behavior(&mut self, hand: Hand, value: bool) {
        self.hand_mut(hand).alt_behavior = value;
    }

    #[inline(always)]
    pub fn any_indicated(&self) -> bool {
        self.hands[0].attack_indicated || self.hands[1].attack_indicated
    }

    /// Marks `hand` as indicated unless either hand already is. Returning
    /// false keeps the cue from re-firing within a hold cycle and keeps the
    /// two hands from ever showing overlapping cues.
    pub fn try_indicate(&mut self, hand: Hand) -> bool {
        if self.any_indicated() {
            return false;
        }
        self.hand_mut(hand).attack_indicated = true;
        true
    }

    pub fn clear_indicated(&mut self, hand: Hand) {
        self.hand_mut(hand).attack_indicated = false;
    }
}
