//! Dialogue Manager module for handling dialogue state transitions
//!
//! Each handler validates one step of the conversational form, replies, and
//! either advances the dialogue or keeps it in place so the user can retry.

use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use tracing::{error, info, warn};

// Import configuration
use crate::config::BotConfig;

// Import pipeline types
use crate::archive::Delivery;
use crate::errors::PipelineError;
use crate::phone::Strictness;
use crate::pipeline::{self, GenerateRequest};
use crate::plan::ContactPlan;

// Import dialogue types
use crate::dialogue::{
    parse_chunk_size, parse_start_index, validate_filename, VcfDialogue, VcfDialogueState,
};

// Import UI builder functions
use super::ui_builder::{create_input_method_keyboard, format_generation_summary};

/// Handle the base filename input during the forward form
pub async fn handle_filename_input(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    filename_input: &str,
) -> Result<()> {
    match validate_filename(filename_input) {
        Ok(base_name) => {
            bot.send_message(
                msg.chat.id,
                "📛 Now send the contact name.\n\n\
                 One word for a single running name (e.g. `Client`), or \
                 name/count pairs for groups (e.g. `Alice 100 Bob 50`).",
            )
            .await?;
            dialogue
                .update(VcfDialogueState::WaitingForContactName { base_name })
                .await?;
        }
        Err("too_long") => {
            bot.send_message(msg.chat.id, "⚠️ That filename is too long, try a shorter one.")
                .await?;
            // Keep dialogue active, user can try again
        }
        Err("bad_chars") => {
            bot.send_message(
                msg.chat.id,
                "⚠️ Filenames cannot contain /, \\ or :. Try again.",
            )
            .await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "⚠️ Send a non-empty filename for the .vcf files.")
                .await?;
        }
    }

    Ok(())
}

/// Handle the contact-naming plan input during the forward form
pub async fn handle_contact_name_input(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    plan_input: &str,
    base_name: String,
) -> Result<()> {
    match ContactPlan::parse(plan_input) {
        Ok(plan) => {
            bot.send_message(
                msg.chat.id,
                "🔢 How many contacts per .vcf file? (e.g. `100`)",
            )
            .await?;
            dialogue
                .update(VcfDialogueState::WaitingForChunkSize { base_name, plan })
                .await?;
        }
        Err(PipelineError::MalformedPlan(fragment)) => {
            warn!(user_id = %msg.chat.id, fragment = %fragment, "Rejected malformed contact plan");
            bot.send_message(
                msg.chat.id,
                format!(
                    "⚠️ I couldn't read the plan near `{fragment}`.\n\
                     Use a single name, or name/count pairs like `Alice 100 Bob 50`."
                ),
            )
            .await?;
            // Keep dialogue active, user can try again
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "⚠️ The contact name must not be empty.")
                .await?;
        }
    }

    Ok(())
}

/// Handle the chunk size input during the forward form
pub async fn handle_chunk_size_input(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    config: &BotConfig,
    size_input: &str,
    base_name: String,
    plan: ContactPlan,
) -> Result<()> {
    match parse_chunk_size(size_input, config.max_chunk_size) {
        Ok(chunk_size) => {
            bot.send_message(
                msg.chat.id,
                "🔢 What number should the first file start at? (e.g. `1`)",
            )
            .await?;
            dialogue
                .update(VcfDialogueState::WaitingForStartNumber {
                    base_name,
                    plan,
                    chunk_size,
                })
                .await?;
        }
        Err("zero") => {
            bot.send_message(msg.chat.id, "⚠️ The chunk size must be at least 1.")
                .await?;
        }
        Err("too_large") => {
            bot.send_message(
                msg.chat.id,
                format!(
                    "⚠️ That's too many contacts per file (max {}).",
                    config.max_chunk_size
                ),
            )
            .await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "⚠️ Send the chunk size as a plain number.")
                .await?;
        }
    }

    Ok(())
}

/// Handle the start number input during the forward form
pub async fn handle_start_number_input(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    start_input: &str,
    base_name: String,
    plan: ContactPlan,
    chunk_size: usize,
) -> Result<()> {
    match parse_start_index(start_input) {
        Ok(start_index) => {
            bot.send_message(msg.chat.id, "📥 How do you want to send the numbers?")
                .reply_markup(create_input_method_keyboard())
                .await?;
            dialogue
                .update(VcfDialogueState::WaitingForInputMethod {
                    base_name,
                    plan,
                    chunk_size,
                    start_index,
                })
                .await?;
        }
        Err("negative") => {
            bot.send_message(msg.chat.id, "⚠️ The start number cannot be negative.")
                .await?;
            // Keep dialogue active, user can try again
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "⚠️ Send the start number as a plain number.")
                .await?;
        }
    }

    Ok(())
}

/// Handle the raw numbers (typed or from an uploaded .txt) and run the pipeline
#[allow(clippy::too_many_arguments)]
pub async fn handle_numbers_input(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    config: Arc<BotConfig>,
    raw_numbers: &str,
    base_name: String,
    plan: ContactPlan,
    chunk_size: usize,
    start_index: usize,
) -> Result<()> {
    if raw_numbers.lines().count() > config.max_numbers_per_request {
        bot.send_message(
            msg.chat.id,
            format!(
                "⚠️ Too many lines (max {}). Split the input and try again.",
                config.max_numbers_per_request
            ),
        )
        .await?;
        return Ok(());
    }

    let request = GenerateRequest {
        base_name,
        plan,
        chunk_size,
        start_index,
        raw_numbers: raw_numbers.to_string(),
        strictness: Strictness::from_flag(config.strict_validation),
        archive_threshold: config.archive_threshold,
    };

    match pipeline::generate(&request) {
        Ok(outcome) => {
            info!(
                user_id = %msg.chat.id,
                contacts = outcome.contact_count,
                documents = outcome.document_count,
                "Generation completed, delivering"
            );
            let summary = format_generation_summary(&outcome);
            deliver(bot, msg.chat.id, outcome.delivery, &config).await?;
            bot.send_message(msg.chat.id, summary).await?;
            dialogue.exit().await?;
        }
        Err(PipelineError::EmptyResult) => {
            bot.send_message(
                msg.chat.id,
                "❌ No valid phone numbers found. Send the numbers again, one per line.",
            )
            .await?;
            // Keep dialogue active, user can try again
        }
        Err(e) => {
            error!(user_id = %msg.chat.id, error = %e, "Generation pipeline failed");
            bot.send_message(msg.chat.id, format!("❌ {e}")).await?;
            dialogue.exit().await?;
        }
    }

    Ok(())
}

/// Handle an uploaded .vcf body and reply with the extracted text file
pub async fn handle_vcf_text_input(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    vcard_text: &str,
    include_name: bool,
) -> Result<()> {
    match pipeline::extract_to_text(vcard_text, include_name) {
        Ok(joined) => {
            let document = InputFile::memory(joined.into_bytes()).file_name("converted.txt");
            bot.send_document(msg.chat.id, document).await?;
            bot.send_message(msg.chat.id, "✅ File converted!").await?;
            dialogue.exit().await?;
        }
        Err(PipelineError::EmptyResult) => {
            bot.send_message(
                msg.chat.id,
                "❌ No contact data found in that file. Send another .vcf or /cancel.",
            )
            .await?;
            // Keep dialogue active, user can try again
        }
        Err(e) => {
            error!(user_id = %msg.chat.id, error = %e, "vCard extraction failed");
            bot.send_message(msg.chat.id, format!("❌ {e}")).await?;
            dialogue.exit().await?;
        }
    }

    Ok(())
}

/// Send the generated output, pacing successive document sends to respect
/// the platform rate limit.
pub async fn deliver(
    bot: &Bot,
    chat_id: ChatId,
    delivery: Delivery,
    config: &BotConfig,
) -> Result<()> {
    match delivery {
        Delivery::Files(documents) => {
            let last = documents.len().saturating_sub(1);
            for (i, document) in documents.into_iter().enumerate() {
                let file = InputFile::memory(document.body.into_bytes())
                    .file_name(document.filename);
                bot.send_document(chat_id, file).await?;
                if i < last {
                    tokio::time::sleep(std::time::Duration::from_millis(config.send_delay_ms))
                        .await;
                }
            }
        }
        Delivery::Archive { filename, bytes } => {
            let file = InputFile::memory(bytes).file_name(filename);
            bot.send_document(chat_id, file).await?;
        }
    }
    Ok(())
}
