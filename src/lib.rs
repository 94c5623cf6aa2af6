//! Family Recipes - conversational recipe recording over LINE
//!
//! A family member cooks while chatting with the bot: they pick a dish, log
//! seasonings and tastings, choose servings, tick the seasonings they used in
//! a mini-app, and send photos of the bottles. Each finished session becomes a
//! recipe the rest of the family can read and ask questions about.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
