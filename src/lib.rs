//! # vCard Telegram Bot
//!
//! A Telegram bot that generates `.vcf` (vCard 3.0) contact files from lists
//! of phone numbers and, inversely, extracts phone numbers from `.vcf` files
//! into plain text. Access is gated by an owner-managed whitelist.

pub mod archive;
pub mod bot;
pub mod chunker;
pub mod config;
pub mod db;
pub mod dialogue;
pub mod errors;
pub mod phone;
pub mod pipeline;
pub mod plan;
pub mod vcard;
