//! `ratatui-combobox-core` is the headless engine behind the dropdown widgets in
//! `ratatui-combobox`.
//!
//! Nothing in this crate draws. It owns option catalogs, filtering, selection state, the
//! controlled/uncontrolled value contract, above/below placement and dismissal, and reports
//! what happened through [`controller::DropdownAction`]. Rendering lives in the facade crate.
//!
//! ## Design goals
//!
//! - Event-loop agnostic: you drive input, frames and deferred work from your app.
//! - No async runtime: "next frame" and "after this event" work is queued in
//!   [`schedule::TaskQueue`] and drained by [`controller::DropdownController::on_frame`] and
//!   [`controller::DropdownController::run_deferred`].
//! - Session scoped: listeners and deferred tasks belong to one open/close cycle and are
//!   released or ignored once it ends.
//!
//! ## Getting started
//!
//! Most users should depend on the facade crate `ratatui-combobox`. Use this crate directly if
//! you draw the panel yourself.
//!
//! Useful entry points:
//! - [`controller::DropdownController`]: the open/close state machine.
//! - [`option::OptionCatalog`]: validated, immutable option lists.
//! - [`placement::decide_placement`]: the above/below rule on its own.
//! - [`filter::filter`]: case-insensitive label search.
pub mod a11y;
pub mod binding;
pub mod controller;
pub mod error;
pub mod filter;
pub mod form;
pub mod option;
pub mod selection;

#[cfg(feature = "crossterm")]
pub mod crossterm_input;

pub mod dismissal;
pub mod input;
pub mod keymap;
pub mod layout;
pub mod listener;
pub mod navigator;
pub mod placement;
pub mod schedule;
pub mod scroll;
