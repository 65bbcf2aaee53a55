use crate::config::Settings;
use crate::core::input::{
    ButtonEvent, Hand, InputDevice, MOUSE_PRIMARY, MOUSE_SECONDARY, dx_gamepad_code,
};
use crate::host::WorldQuery;

/// Which hand a raw event drives, honoring mouse reversal and button
/// overrides. `None` when the event is not an attack button at all.
pub fn event_hand(event: &ButtonEvent, settings: &Settings) -> Option<Hand> {
    match event.device {
        InputDevice::Pointer => {
            // Stock layout: primary mouse button swings the right hand,
            // secondary the left.
            let (left_code, right_code) = if settings.reverse_mouse_buttons {
                (MOUSE_PRIMARY, MOUSE_SECONDARY)
            } else {
                (MOUSE_SECONDARY, MOUSE_PRIMARY)
            };
            if event.code == left_code {
                Some(Hand::Left)
            } else if event.code == right_code {
                Some(Hand::Right)
            } else {
                None
            }
        }
        InputDevice::Controller => {
            let dx = dx_gamepad_code(event.code)?;
            if dx == settings.left_button {
                Some(Hand::Left)
            } else if dx == settings.right_button {
                Some(Hand::Right)
            } else {
                None
            }
        }
    }
}

/// Device/button relevance only, ignoring game and actor state. Used to
/// keep tracking the block-modifier hold while a full attack is barred.
#[inline(always)]
pub fn is_relevant_button(event: &ButtonEvent, settings: &Settings) -> bool {
    settings.enabled && event_hand(event, settings).is_some()
}

/// The full gate: every condition that must hold before any tracker state
/// moves for this event.
pub fn accepts(event: &ButtonEvent, settings: &Settings, world: &dyn WorldQuery) -> bool {
    if !settings.enabled {
        return false;
    }
    let Some(hand) = event_hand(event, settings) else {
        return false;
    };
    if world.is_paused() || world.player().is_none() || world.is_in_cinematic() {
        return false;
    }
    if !world.is_weapon_drawn()
        || !world.is_sit_sleep_normal()
        || !world.is_knock_normal()
        || !world.is_fly_none()
    {
        return false;
    }
    world
        .equipped_weapon(hand)
        .is_some_and(|w| w.is_valid_melee(hand))
}

/// Both hands hold independently valid one-handed melee weapons.
pub fn is_dual_wielding(world: &dyn WorldQuery) -> bool {
    let valid = |hand: Hand| {
        world
            .equipped_weapon(hand)
            .is_some_and(|w| w.is_valid_melee(hand))
    };
    valid(Hand::Left) && valid(Hand::Right)
}
