//! # ECG Tutor Telegram Bot
//!
//! A menu-driven Telegram bot that teaches ECG interpretation: an
//! introductory lesson, a browsable catalog of clinical cases and a
//! multiple-choice quiz for each case.

pub mod bot;
pub mod catalog;
pub mod config;
pub mod context;
pub mod errors;
pub mod localization;
pub mod media;
pub mod screen;
