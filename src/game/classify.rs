use crate::core::input::Hand;
use crate::host::ActionId;

/// Releases closer together than this pair up into a dual attack.
pub const DUAL_ATTACK_WINDOW_MS: u64 = 110;

/// Stamina at or below this never power-attacks, whatever the hold.
pub const POWER_ATTACK_MIN_STAMINA: f32 = 1.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentKind {
    Normal,
    Power,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentSide {
    Left,
    Right,
    Dual,
}

/// One concrete attack to request from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackIntent {
    pub side: IntentSide,
    pub kind: IntentKind,
}

impl AttackIntent {
    #[inline(always)]
    pub const fn action(self) -> ActionId {
        match (self.side, self.kind) {
            (IntentSide::Left, IntentKind::Normal) => ActionId::LeftAttack,
            (IntentSide::Right, IntentKind::Normal) => ActionId::RightAttack,
            (IntentSide::Dual, IntentKind::Normal) => ActionId::DualAttack,
            (IntentSide::Left, IntentKind::Power) => ActionId::LeftPowerAttack,
            (IntentSide::Right, IntentKind::Power) => ActionId::RightPowerAttack,
            (IntentSide::Dual, IntentKind::Power) => ActionId::DualPowerAttack,
        }
    }
}

/// Behavior toggles that historically shipped as parallel copies of this
/// logic.
#[derive(Clone, Copy, Debug)]
pub struct VariantPolicy {
    /// Emit the disengage action when the right hand releases while
    /// blocking and no power attack triggers.
    pub disengage_on_block_release: bool,
}

impl Default for VariantPolicy {
    fn default() -> Self {
        Self {
            disengage_on_block_release: true,
        }
    }
}

/// Snapshot of everything one release resolution depends on.
#[derive(Clone, Copy, Debug)]
pub struct ClassifyInput {
    pub hand: Hand,
    pub time_diff_ms: u64,
    pub max_hold_secs: f32,
    /// Captured pairing flag for the releasing hand.
    pub dual_held: bool,
    /// Both equipped items are valid one-handed melee weapons.
    pub dual_wielding: bool,
    /// The other hand is held as a block modifier and the actor is not
    /// currently blocking.
    pub modifier_override: bool,
    pub stamina: f32,
    pub blocking: bool,
    pub attacking: bool,
}

/// Up to two attack intents plus an optional disengage, in dispatch order.
/// `primary` is always the normal variant; `power_followup` upgrades the
/// same side grouping in the same resolution.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub primary: Option<AttackIntent>,
    pub disengage: bool,
    pub power_followup: Option<AttackIntent>,
}

impl Resolution {
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.primary.is_none() && !self.disengage && self.power_followup.is_none()
    }
}

/// A hold past the threshold reads as a power attack unless the other hand
/// is acting as a modifier or stamina is exhausted.
#[inline(always)]
pub fn is_power_attack(
    max_hold_secs: f32,
    min_hold_secs: f32,
    stamina: f32,
    modifier_override: bool,
) -> bool {
    if stamina <= POWER_ATTACK_MIN_STAMINA {
        return false;
    }
    max_hold_secs > min_hold_secs && !modifier_override
}

/// Dual attacks need both weapons valid, an observed overlap, and the two
/// releases inside the pairing window.
#[inline(always)]
pub const fn attack_side(
    hand: Hand,
    time_diff_ms: u64,
    dual_wielding: bool,
    dual_held: bool,
) -> IntentSide {
    if dual_wielding && dual_held && time_diff_ms < DUAL_ATTACK_WINDOW_MS {
        IntentSide::Dual
    } else if hand.is_left() {
        IntentSide::Left
    } else {
        IntentSide::Right
    }
}

/// Maps a qualifying release onto the actions to dispatch.
///
/// A power-classified release that lands mid attack animation emits
/// nothing: the normal variant is withheld so the swing in flight is not
/// restarted, and the power variant cannot interrupt it either.
pub fn classify(input: &ClassifyInput, min_hold_secs: f32, policy: &VariantPolicy) -> Resolution {
    let power = is_power_attack(
        input.max_hold_secs,
        min_hold_secs,
        input.stamina,
        input.modifier_override,
    );
    let side = attack_side(
        input.hand,
        input.time_diff_ms,
        input.dual_wielding,
        input.dual_held,
    );

    let mut out = Resolution::default();

    if !power || !input.attacking {
        out.primary = Some(AttackIntent {
            side,
            kind: IntentKind::Normal,
        });
        out.disengage = policy.disengage_on_block_release
            && !input.hand.is_left()
            && !power
            && input.blocking;
    }

    if power && !input.attacking && !input.blocking {
        out.power_followup = Some(AttackIntent {
            side,
            kind: IntentKind::Power,
        });
    }

    out
}
