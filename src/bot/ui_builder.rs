//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::archive::Delivery;
use crate::pipeline::GenerateOutcome;

// Callback data for the input-method choice
pub const CALLBACK_INPUT_TEXT: &str = "input_text";
pub const CALLBACK_INPUT_FILE: &str = "input_file";

// Callback data for the vcf-to-txt output format choice
pub const CALLBACK_WITH_NAME: &str = "with_name";
pub const CALLBACK_NUMBER_ONLY: &str = "number_only";

/// Create the inline keyboard for choosing how numbers are supplied
pub fn create_input_method_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "✍️ Type the numbers",
            CALLBACK_INPUT_TEXT.to_string(),
        )],
        vec![InlineKeyboardButton::callback(
            "📄 Upload a .txt file",
            CALLBACK_INPUT_FILE.to_string(),
        )],
    ])
}

/// Create the inline keyboard for choosing the vcf-to-txt output format
pub fn create_vcf_option_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            "📛 Name & number",
            CALLBACK_WITH_NAME.to_string(),
        )],
        vec![InlineKeyboardButton::callback(
            "📱 Number only",
            CALLBACK_NUMBER_ONLY.to_string(),
        )],
    ])
}

/// Format the summary sent after a generation run completes
pub fn format_generation_summary(outcome: &GenerateOutcome) -> String {
    match &outcome.delivery {
        Delivery::Files(_) => format!(
            "✅ Done! {} contacts across {} file(s).",
            outcome.contact_count, outcome.document_count
        ),
        Delivery::Archive { filename, .. } => format!(
            "✅ Done! {} contacts across {} files, bundled into {}.",
            outcome.contact_count, outcome.document_count, filename
        ),
    }
}
