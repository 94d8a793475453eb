//! Headless testing support: Pilot and collaborator fakes.
//!
//! Use the [`Pilot`] to drive an [`App`](crate::app::App) without a host UI,
//! and the [`fakes`] to run an [`UpdateGate`](crate::update::UpdateGate)
//! against scripted version checks, updaters, and devices.

pub mod fakes;
pub mod pilot;

pub use fakes::{FakeDevice, FakeUpdater, FakeVersionCheck};
pub use pilot::{Pilot, PilotError};
