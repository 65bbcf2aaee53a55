//! Hold-to-power-attack input engine: watches per-hand button events,
//! classifies the intended attack (normal, power, dual-wield), and
//! dispatches the matching host action with bounded retry.

pub mod app;
pub mod config;
pub mod core;
pub mod game;
pub mod host;

pub use crate::app::Listener;
pub use crate::config::Settings;
pub use crate::core::input::{ButtonEvent, ButtonPhase, Hand, InputDevice};
pub use crate::game::classify::VariantPolicy;
pub use crate::host::{
    ActionId, ActionRunner, ActorHandle, FeedbackSink, WeaponProfile, WorldQuery,
};
