// SPDX-License-Identifier: MIT

//! Auto-advance policy
//!
//! A page moves on by itself when its single answer is a one-shot pick, so
//! the user never has to press the continue button.

use crate::flow::document::{Block, BlockKind};

/// Whether answering the visible blocks should advance without a click
pub fn should_auto_advance(visible: &[Block]) -> bool {
    let answerable = visible.iter().filter(|b| b.kind.is_answerable()).count();
    if answerable > 1 {
        return false;
    }
    visible.iter().any(advances_itself)
}

fn advances_itself(block: &Block) -> bool {
    match block.kind {
        BlockKind::Loader | BlockKind::Dropdown => true,
        BlockKind::MultipleChoice | BlockKind::PictureChoice => !block.is_multiple(),
        _ => false,
    }
}
