#![forbid(unsafe_code)]

//! Sizer Runtime
//!
//! The runtime ties input, state, and rendering together in the Elm style.
//!
//! # Key Components
//!
//! - [`Model`] - Trait for application state and behavior
//! - [`Cmd`] - Commands for side effects
//! - [`Program`] - Terminal loop driving a model
//! - [`Subscription`] - Trait for continuous event sources
//! - [`Every`] - Built-in recurring timer
//! - [`ProgramSimulator`] - Deterministic, terminal-free driver with a virtual clock
//! - [`Context`] - Provider stack with nearest-enclosing lookup
//!
//! # Timer lifecycle
//!
//! Models never hold timer handles. They *declare* the timers they want from
//! their current state in [`Model::subscriptions`], and the runtime reconciles
//! the declaration after every update: new timers are started, undeclared
//! ones are stopped before the update is considered complete. A message that
//! a stopped timer already queued is discarded together with its channel.

pub mod context;
pub mod program;
pub mod simulator;
pub mod subscription;

pub use context::Context;
pub use program::{
    Cmd, CrosstermEventSource, EventSource, Model, Program, ProgramConfig, ScriptedEventSource,
};
pub use simulator::{CmdRecord, ProgramSimulator};
pub use subscription::{Every, StopSignal, SubId, Subscription, SubscriptionManager};
