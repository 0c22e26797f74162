//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use teloxide::prelude::*;
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

// Import configuration
use crate::config::BotConfig;

// Import the whitelist store capability
use crate::db::AuthorizationStore;

// Import dialogue types
use crate::dialogue::{VcfDialogue, VcfDialogueState};

// Import dialogue manager functions
use super::dialogue_manager::{
    handle_chunk_size_input, handle_contact_name_input, handle_filename_input,
    handle_numbers_input, handle_start_number_input, handle_vcf_text_input,
};

// Import UI builder functions
use super::ui_builder::create_vcf_option_keyboard;

const WELCOME_MESSAGE: &str = "👋 **vCard Bot**\n\n\
    I turn lists of phone numbers into .vcf contact files, and .vcf files back into plain text.\n\n\
    Commands:\n\
    /txttovcf — build .vcf files from phone numbers\n\
    /vcftotxt — extract numbers from a .vcf file\n\
    /checkuser — show your access status\n\
    /cancel — abort the current operation\n\
    /help — detailed instructions";

const HELP_MESSAGE: &str = "📖 **How it works**\n\n\
    /txttovcf walks you through a short form:\n\
    1. The base filename for the .vcf files\n\
    2. The contact name — one word (`Client`), or name/count pairs (`Alice 100 Bob 50`)\n\
    3. How many contacts per file\n\
    4. The number the first file starts at\n\
    5. The numbers themselves — typed, or uploaded as a .txt file (one per line)\n\n\
    Invalid numbers are skipped; very large batches arrive as a single .zip.\n\n\
    /vcftotxt asks for an output format, then a .vcf upload, and replies with a .txt.\n\n\
    Access is whitelist-gated; ask the owner to /adduser you.";

pub async fn download_file(bot: &Bot, file_id: teloxide::types::FileId) -> Result<String> {
    let file = bot.get_file(file_id).await?;
    let file_path = file.path;
    let url = format!(
        "https://api.telegram.org/file/bot{}/{}",
        bot.token(),
        file_path
    );

    let response = reqwest::get(&url).await?;
    let bytes = response.bytes().await?;

    let mut temp_file = NamedTempFile::new()?;
    temp_file.as_file_mut().write_all(&bytes)?;
    let path = temp_file.path().to_string_lossy().to_string();

    // Instead of keeping the file, we return the path and let the caller handle cleanup
    // The NamedTempFile will be dropped here, but the file will remain until explicitly deleted
    std::mem::forget(temp_file);

    Ok(path)
}

/// Download a document and return its contents as text, cleaning up the
/// staging file afterwards.
async fn download_text(bot: &Bot, file_id: teloxide::types::FileId) -> Result<String> {
    let temp_path = download_file(bot, file_id).await?;
    let content = std::fs::read_to_string(&temp_path);

    if let Err(cleanup_err) = std::fs::remove_file(&temp_path) {
        error!(temp_path = %temp_path, error = %cleanup_err, "Failed to clean up temporary file");
    } else {
        debug!(temp_path = %temp_path, "Temporary file cleaned up successfully");
    }

    Ok(content?)
}

fn sender_id(msg: &Message) -> i64 {
    msg.from.as_ref().map(|user| user.id.0 as i64).unwrap_or(msg.chat.id.0)
}

async fn is_allowed(
    user_id: i64,
    store: &Arc<dyn AuthorizationStore>,
    config: &BotConfig,
) -> Result<bool> {
    Ok(user_id == config.owner_id || store.is_authorized(user_id).await?)
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    store: Arc<dyn AuthorizationStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let user_id = sender_id(msg);
    debug!(user_id, message_length = text.len(), "Received text message from user");

    // Cancel works from every state
    if text == "/cancel" {
        bot.send_message(msg.chat.id, "❌ Operation cancelled.").await?;
        dialogue.exit().await?;
        return Ok(());
    }

    // Check dialogue state first
    let dialogue_state = dialogue.get().await?;
    match dialogue_state {
        Some(VcfDialogueState::WaitingForFilename) => {
            return handle_filename_input(bot, msg, dialogue, text).await;
        }
        Some(VcfDialogueState::WaitingForContactName { base_name }) => {
            return handle_contact_name_input(bot, msg, dialogue, text, base_name).await;
        }
        Some(VcfDialogueState::WaitingForChunkSize { base_name, plan }) => {
            return handle_chunk_size_input(bot, msg, dialogue, &config, text, base_name, plan)
                .await;
        }
        Some(VcfDialogueState::WaitingForStartNumber {
            base_name,
            plan,
            chunk_size,
        }) => {
            return handle_start_number_input(
                bot, msg, dialogue, text, base_name, plan, chunk_size,
            )
            .await;
        }
        Some(VcfDialogueState::WaitingForInputMethod { .. }) => {
            bot.send_message(msg.chat.id, "☝️ Tap one of the buttons above, or /cancel.")
                .await?;
            return Ok(());
        }
        Some(VcfDialogueState::WaitingForNumbers {
            base_name,
            plan,
            chunk_size,
            start_index,
            from_file,
        }) => {
            if from_file {
                bot.send_message(
                    msg.chat.id,
                    "📄 Upload the numbers as a .txt document, or /cancel.",
                )
                .await?;
                return Ok(());
            }
            return handle_numbers_input(
                bot,
                msg,
                dialogue,
                config,
                text,
                base_name,
                plan,
                chunk_size,
                start_index,
            )
            .await;
        }
        Some(VcfDialogueState::WaitingForVcfOption) => {
            bot.send_message(msg.chat.id, "☝️ Tap one of the format buttons above, or /cancel.")
                .await?;
            return Ok(());
        }
        Some(VcfDialogueState::WaitingForVcfFile { .. }) => {
            bot.send_message(msg.chat.id, "📤 Send the .vcf file you want converted, or /cancel.")
                .await?;
            return Ok(());
        }
        Some(VcfDialogueState::Start) | None => {
            // Continue with normal command handling
        }
    }

    // Handle /start command
    if text == "/start" {
        bot.send_message(msg.chat.id, WELCOME_MESSAGE).await?;
    }
    // Handle /help command
    else if text == "/help" {
        bot.send_message(msg.chat.id, HELP_MESSAGE).await?;
    }
    // Start the forward form
    else if text == "/txttovcf" {
        if !is_allowed(user_id, &store, &config).await? {
            warn!(user_id, "Unauthorized /txttovcf attempt");
            bot.send_message(msg.chat.id, "❌ You are not allowed to use this feature.")
                .await?;
            return Ok(());
        }
        bot.send_message(
            msg.chat.id,
            "📁 What should the .vcf files be called? (base name, without extension)",
        )
        .await?;
        dialogue.update(VcfDialogueState::WaitingForFilename).await?;
    }
    // Start the reverse form
    else if text == "/vcftotxt" {
        if !is_allowed(user_id, &store, &config).await? {
            warn!(user_id, "Unauthorized /vcftotxt attempt");
            bot.send_message(msg.chat.id, "❌ You are not allowed to use this feature.")
                .await?;
            return Ok(());
        }
        bot.send_message(msg.chat.id, "Choose the TXT output format:")
            .reply_markup(create_vcf_option_keyboard())
            .await?;
        dialogue.update(VcfDialogueState::WaitingForVcfOption).await?;
    }
    // Owner whitelist management
    else if let Some(arg) = text.strip_prefix("/adduser") {
        handle_add_user(bot, msg, user_id, arg, &store, &config).await?;
    } else if let Some(arg) = text.strip_prefix("/removeuser") {
        handle_remove_user(bot, msg, user_id, arg, &store, &config).await?;
    } else if text == "/checkuser" {
        let whitelisted = is_allowed(user_id, &store, &config).await?;
        let status = format!(
            "🆔 Your ID: {user_id}\n👑 Owner: {}\n✅ Whitelisted: {}",
            if user_id == config.owner_id { "yes" } else { "no" },
            if whitelisted { "yes" } else { "no" }
        );
        bot.send_message(msg.chat.id, status).await?;
    }
    // Handle regular text messages
    else {
        bot.send_message(
            msg.chat.id,
            "🤖 Use /txttovcf to build contact files, /vcftotxt to extract numbers, or /help.",
        )
        .await?;
    }

    Ok(())
}

async fn handle_add_user(
    bot: &Bot,
    msg: &Message,
    user_id: i64,
    arg: &str,
    store: &Arc<dyn AuthorizationStore>,
    config: &BotConfig,
) -> Result<()> {
    if user_id != config.owner_id {
        bot.send_message(msg.chat.id, "❌ Only the owner can manage the whitelist.")
            .await?;
        return Ok(());
    }
    match arg.trim().parse::<i64>() {
        Ok(new_user_id) => {
            let added = store.add(new_user_id).await?;
            info!(user_id = new_user_id, added, "Whitelist add requested");
            let reply = if added {
                format!("✅ User ID {new_user_id} added to the whitelist.")
            } else {
                format!("ℹ️ User ID {new_user_id} is already whitelisted.")
            };
            bot.send_message(msg.chat.id, reply).await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "⚠️ Usage: /adduser <telegram_id>")
                .await?;
        }
    }
    Ok(())
}

async fn handle_remove_user(
    bot: &Bot,
    msg: &Message,
    user_id: i64,
    arg: &str,
    store: &Arc<dyn AuthorizationStore>,
    config: &BotConfig,
) -> Result<()> {
    if user_id != config.owner_id {
        bot.send_message(msg.chat.id, "❌ Only the owner can manage the whitelist.")
            .await?;
        return Ok(());
    }
    match arg.trim().parse::<i64>() {
        Ok(old_user_id) => {
            let removed = store.remove(old_user_id).await?;
            info!(user_id = old_user_id, removed, "Whitelist remove requested");
            let reply = if removed {
                format!("✅ User ID {old_user_id} removed from the whitelist.")
            } else {
                format!("ℹ️ User ID {old_user_id} was not whitelisted.")
            };
            bot.send_message(msg.chat.id, reply).await?;
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "⚠️ Usage: /removeuser <telegram_id>")
                .await?;
        }
    }
    Ok(())
}

async fn handle_document_message(
    bot: &Bot,
    msg: &Message,
    dialogue: VcfDialogue,
    config: Arc<BotConfig>,
) -> Result<()> {
    let Some(doc) = msg.document() else {
        return Ok(());
    };
    let file_name = doc.file_name.clone().unwrap_or_default();
    debug!(user_id = %msg.chat.id, file_name = %file_name, "Received document from user");

    match dialogue.get().await? {
        Some(VcfDialogueState::WaitingForNumbers {
            base_name,
            plan,
            chunk_size,
            start_index,
            from_file: true,
        }) => {
            if !file_name.ends_with(".txt") {
                bot.send_message(msg.chat.id, "⚠️ That's not a .txt file. Send the numbers as .txt.")
                    .await?;
                return Ok(());
            }
            let raw_numbers = match download_text(bot, doc.file.id.clone()).await {
                Ok(content) => content,
                Err(e) => {
                    error!(user_id = %msg.chat.id, error = %e, "Failed to download numbers file");
                    bot.send_message(msg.chat.id, "❌ Couldn't download that file, try again.")
                        .await?;
                    return Ok(());
                }
            };
            handle_numbers_input(
                bot,
                msg,
                dialogue,
                config,
                &raw_numbers,
                base_name,
                plan,
                chunk_size,
                start_index,
            )
            .await
        }
        Some(VcfDialogueState::WaitingForVcfFile { include_name }) => {
            if !file_name.ends_with(".vcf") {
                bot.send_message(msg.chat.id, "⚠️ That's not a .vcf file.").await?;
                return Ok(());
            }
            let vcard_text = match download_text(bot, doc.file.id.clone()).await {
                Ok(content) => content,
                Err(e) => {
                    error!(user_id = %msg.chat.id, error = %e, "Failed to download vcf file");
                    bot.send_message(msg.chat.id, "❌ Couldn't download that file, try again.")
                        .await?;
                    return Ok(());
                }
            };
            handle_vcf_text_input(bot, msg, dialogue, &vcard_text, include_name).await
        }
        _ => {
            bot.send_message(
                msg.chat.id,
                "🤖 I only take files inside a running form. Start with /txttovcf or /vcftotxt.",
            )
            .await?;
            Ok(())
        }
    }
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");
    bot.send_message(
        msg.chat.id,
        "🤖 I handle text and documents only. Try /help for what I can do.",
    )
    .await?;
    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    dialogue: VcfDialogue,
    store: Arc<dyn AuthorizationStore>,
    config: Arc<BotConfig>,
) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, dialogue, store, config).await?;
    } else if msg.document().is_some() {
        handle_document_message(&bot, &msg, dialogue, config).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
