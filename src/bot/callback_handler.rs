//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use teloxide::prelude::*;
use tracing::debug;

// Import dialogue types
use crate::dialogue::{VcfDialogue, VcfDialogueState};

// Import UI builder callback data
use super::ui_builder::{
    CALLBACK_INPUT_FILE, CALLBACK_INPUT_TEXT, CALLBACK_NUMBER_ONLY, CALLBACK_WITH_NAME,
};

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    dialogue: VcfDialogue,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    let dialogue_state = dialogue.get().await?;
    let data = q.data.as_deref().unwrap_or("");

    match dialogue_state {
        Some(VcfDialogueState::WaitingForInputMethod {
            base_name,
            plan,
            chunk_size,
            start_index,
        }) => {
            if let Some(msg) = &q.message {
                let from_file = match data {
                    CALLBACK_INPUT_FILE => true,
                    CALLBACK_INPUT_TEXT => false,
                    _ => {
                        bot.answer_callback_query(q.id).await?;
                        return Ok(());
                    }
                };

                let prompt = if from_file {
                    "📄 Upload a .txt file with the phone numbers, one per line."
                } else {
                    "✍️ Send the phone numbers, one per line."
                };
                bot.edit_message_text(msg.chat().id, msg.id(), prompt).await?;

                dialogue
                    .update(VcfDialogueState::WaitingForNumbers {
                        base_name,
                        plan,
                        chunk_size,
                        start_index,
                        from_file,
                    })
                    .await?;
            }
        }
        Some(VcfDialogueState::WaitingForVcfOption) => {
            if let Some(msg) = &q.message {
                let include_name = match data {
                    CALLBACK_WITH_NAME => true,
                    CALLBACK_NUMBER_ONLY => false,
                    _ => {
                        bot.answer_callback_query(q.id).await?;
                        return Ok(());
                    }
                };

                bot.edit_message_text(
                    msg.chat().id,
                    msg.id(),
                    "📤 Now send the .vcf file you want converted.",
                )
                .await?;

                dialogue
                    .update(VcfDialogueState::WaitingForVcfFile { include_name })
                    .await?;
            }
        }
        _ => {
            // Ignore callbacks for other states
        }
    }

    // Answer the callback query to remove the loading state
    bot.answer_callback_query(q.id).await?;

    Ok(())
}
