use crate::config::{self, Settings};
use crate::core::clock;
use crate::core::dispatch::Dispatcher;
use crate::core::input::{ButtonEvent, Hand};
use crate::game::classify::{self, ClassifyInput, Resolution, VariantPolicy};
use crate::game::gate;
use crate::game::notify;
use crate::game::state::CombatInputState;
use crate::host::{ActionId, ActionRunner, ActorHandle, FeedbackSink, WorldQuery};

use log::info;
use std::sync::Arc;

/// The input hook the host registers. The host calls `on_button_event`
/// before its own handling of the attack/block button; a `true` return
/// means the event was fully consumed by the attack pipeline.
///
/// Everything here runs on the host's event-delivery thread; only the
/// dispatcher crosses threads.
pub struct Listener {
    settings: Settings,
    policy: VariantPolicy,
    state: CombatInputState,
    dispatcher: Dispatcher,
    world: Arc<dyn WorldQuery>,
    feedback: Arc<dyn FeedbackSink>,
}

impl Listener {
    /// Builds a listener around the process-wide settings (see
    /// `config::load`).
    pub fn new(
        world: Arc<dyn WorldQuery>,
        runner: Arc<dyn ActionRunner>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self::with_settings(config::get(), world, runner, feedback)
    }

    pub fn with_settings(
        settings: Settings,
        world: Arc<dyn WorldQuery>,
        runner: Arc<dyn ActionRunner>,
        feedback: Arc<dyn FeedbackSink>,
    ) -> Self {
        Self {
            settings,
            policy: VariantPolicy::default(),
            state: CombatInputState::default(),
            dispatcher: Dispatcher::new(runner),
            world,
            feedback,
        }
    }

    pub fn set_policy(&mut self, policy: VariantPolicy) {
        self.policy = policy;
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    #[inline(always)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn on_button_event(&mut self, event: &ButtonEvent) -> bool {
        if gate::accepts(event, &self.settings, self.world.as_ref()) {
            if let Some(hand) = gate::event_hand(event, &self.settings) {
                self.process(event, hand);
            }
            return true;
        }

        // The full gate said no, but the button is still ours: the hold is
        // acting as a block modifier, and a live modifier cancels any
        // pending power cue on that hand.
        if gate::is_relevant_button(event, &self.settings)
            && let Some(hand) = gate::event_hand(event, &self.settings)
        {
            let held = event.is_held();
            self.state.set_alt_behavior(hand, held);
            if held {
                self.state.clear_indicated(hand);
            }
        }

        false
    }

    fn process(&mut self, event: &ButtonEvent, hand: Hand) {
        if event.is_pressed() {
            self.state.note_press(hand, event.held_secs);
            notify::try_indicate(
                &mut self.state,
                hand,
                &self.settings,
                self.world.as_ref(),
                self.feedback.as_ref(),
            );
        }
        if event.is_up() {
            self.handle_release(hand, clock::now_ms());
        }
    }

    fn handle_release(&mut self, hand: Hand, now_ms: u64) {
        let outcome = self.state.note_release(hand, now_ms);
        if !outcome.should_resolve() {
            return;
        }
        if outcome.time_diff_ms == 0 {
            info!("Clean simultaneous release.");
        }

        self.state.clear_indicated(hand);

        let Some(actor) = self.world.player() else {
            return;
        };

        let blocking = self.world.is_blocking();
        let input = ClassifyInput {
            hand,
            time_diff_ms: outcome.time_diff_ms,
            max_hold_secs: outcome.max_hold_secs,
            dual_held: outcome.dual_held,
            dual_wielding: gate::is_dual_wielding(self.world.as_ref()),
            modifier_override: self.state.alt_behavior(hand.other()) && !blocking,
            stamina: self.world.stamina(),
            blocking,
            attacking: self.world.is_attacking(),
        };

        let resolution = classify::classify(&input, self.settings.min_power_hold_secs, &self.policy);
        self.dispatch_resolution(&resolution, actor);
    }

    fn dispatch_resolution(&self, resolution: &Resolution, actor: ActorHandle) {
        if let Some(intent) = resolution.primary {
            info!("Normal attack ({:?}).", intent.side);
            self.dispatcher.dispatch(intent.action(), actor, false);
        }
        if resolution.disengage {
            self.dispatcher.dispatch(ActionId::RightRelease, actor, false);
        }
        if let Some(intent) = resolution.power_followup {
            info!("Power attack ({:?}).", intent.side);
            self.dispatcher.dispatch(intent.action(), actor, true);
        }
    }
}
