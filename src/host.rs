use crate::core::input::Hand;

/// Opaque handle to the actor the host resolves actions against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub u32);

/// The host actions this crate can request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionId {
    LeftAttack,
    RightAttack,
    DualAttack,
    LeftPowerAttack,
    RightPowerAttack,
    DualPowerAttack,
    /// Disengage: lets go of an active block when a normal right-hand
    /// attack fires out of it.
    RightRelease,
}

impl ActionId {
    #[inline(always)]
    pub const fn is_power(self) -> bool {
        matches!(
            self,
            Self::LeftPowerAttack | Self::RightPowerAttack | Self::DualPowerAttack
        )
    }
}

/// Introspection flags for an equipped item, as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WeaponProfile {
    pub is_weapon: bool,
    pub is_bow: bool,
    pub is_crossbow: bool,
    pub is_staff: bool,
    pub is_two_handed_axe: bool,
    pub is_two_handed_sword: bool,
}

impl WeaponProfile {
    /// Melee weapons only. The left (off) hand additionally rejects
    /// two-handers, which can only ever occupy the right slot.
    #[inline(always)]
    pub const fn is_valid_melee(&self, hand: Hand) -> bool {
        if !self.is_weapon || self.is_bow || self.is_crossbow || self.is_staff {
            return false;
        }
        if hand.is_left() && (self.is_two_handed_axe || self.is_two_handed_sword) {
            return false;
        }
        true
    }
}

/// Read-only world and actor queries supplied by the host. All of these are
/// answered from the event-delivery thread.
pub trait WorldQuery {
    fn is_paused(&self) -> bool;
    fn player(&self) -> Option<ActorHandle>;
    /// Non-interruptible cinematic (kill-move style) state.
    fn is_in_cinematic(&self) -> bool;
    fn is_weapon_drawn(&self) -> bool;
    fn is_sit_sleep_normal(&self) -> bool;
    fn is_knock_normal(&self) -> bool;
    fn is_fly_none(&self) -> bool;
    fn equipped_weapon(&self, hand: Hand) -> Option<WeaponProfile>;
    fn stamina(&self) -> f32;
    /// Current value of the blocking graph variable.
    fn is_blocking(&self) -> bool;
    /// True while the actor is mid attack animation.
    fn is_attacking(&self) -> bool;
}

/// Synchronous action-execution primitive. May fail transiently; the
/// dispatcher retries power-classified actions on a bounded schedule.
/// Called from the dispatcher's worker thread.
pub trait ActionRunner: Send + Sync {
    fn execute(&self, action: ActionId, actor: ActorHandle) -> bool;
}

/// Audio and haptic outputs for the pre-attack cue.
pub trait FeedbackSink {
    fn play_power_cue(&self);
    /// One pulse on both motors; `strength` is 0.0..=2.0.
    fn vibrate(&self, strength: f32, secs: f32);
}
