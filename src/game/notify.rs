use crate::config::Settings;
use crate::core::input::Hand;
use crate::game::classify::is_power_attack;
use crate::game::state::CombatInputState;
use crate::host::{FeedbackSink, WorldQuery};

/// Haptic pulse length for the pre-attack cue.
const CUE_VIBRATION_SECS: f32 = 0.24;

/// Evaluates the pre-attack cue for `hand` after a press/held update, using
/// the live hold duration. The cue fires at most once per hold cycle and
/// never while the other hand's cue is showing; a hold that stops reading
/// as a power attack drops its indication again.
pub fn try_indicate(
    state: &mut CombatInputState,
    hand: Hand,
    settings: &Settings,
    world: &dyn WorldQuery,
    feedback: &dyn FeedbackSink,
) {
    let modifier_override = state.alt_behavior(hand.other()) && !world.is_blocking();
    let likely_power = is_power_attack(
        state.hand(hand).hold_secs,
        settings.min_power_hold_secs,
        world.stamina(),
        modifier_override,
    );

    if likely_power && !world.is_attacking() {
        if !state.try_indicate(hand) {
            return;
        }
        if settings.sound {
            feedback.play_power_cue();
        }
        if settings.vibration {
            feedback.vibrate(settings.vibration_strength, CUE_VIBRATION_SECS);
        }
    } else {
        state.clear_indicated(hand);
    }
}
