//! Reply keyboards
//!
//! Renders the engine's keyboard hints as Telegram reply keyboards.

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};
use crate::models::EntryType;
use crate::state::{KeyboardHint, BACK_LABEL, CANCEL_LABEL};

/// Build the reply markup for a keyboard hint
pub fn reply_markup(hint: KeyboardHint) -> ReplyMarkup {
    match hint {
        KeyboardHint::None => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
        KeyboardHint::Cancel { back } => ReplyMarkup::Keyboard(cancel_keyboard(back)),
        KeyboardHint::TypeChoice { back } => ReplyMarkup::Keyboard(type_keyboard(back)),
    }
}

/// Single row with cancel, and back in front of it when enabled
pub fn cancel_keyboard(back: bool) -> KeyboardMarkup {
    KeyboardMarkup::new(vec![control_row(back)]).resize_keyboard()
}

/// Income/expense buttons above the control row
pub fn type_keyboard(back: bool) -> KeyboardMarkup {
    let types = EntryType::ALL
        .iter()
        .map(|t| KeyboardButton::new(t.button_label()))
        .collect();

    KeyboardMarkup::new(vec![types, control_row(back)]).resize_keyboard()
}

fn control_row(back: bool) -> Vec<KeyboardButton> {
    let mut row = Vec::with_capacity(2);
    if back {
        row.push(KeyboardButton::new(BACK_LABEL));
    }
    row.push(KeyboardButton::new(CANCEL_LABEL));
    row
}
