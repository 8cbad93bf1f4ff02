//! Thread-safe command queue.
//!
//! Producers (the gesture loop, the voice stream) push commands through
//! cloneable [`CommandSender`]s. The owner of the [`Editor`] drains them once
//! per frame with [`CommandQueue::pump`], so every command is applied on the
//! editing thread in the order it was sent.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::command::EditCommand;
use crate::editor::{Editor, Outcome};
use crate::error::EditError;
use crate::settings::Settings;

type Shared = Arc<Mutex<VecDeque<EditCommand>>>;

#[derive(Debug, Default)]
pub struct CommandQueue {
    inner: Shared,
}

/// Producer handle for a [`CommandQueue`].
#[derive(Debug, Clone)]
pub struct CommandSender {
    inner: Shared,
}

impl CommandSender {
    pub fn send(&self, command: EditCommand) {
        self.inner.lock().push_back(command);
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn push(&self, command: EditCommand) {
        self.inner.lock().push_back(command);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Apply every queued command in FIFO order.
    ///
    /// The lock is released before any command runs, so producers are never
    /// blocked by an edit. Commands sent while pumping wait for the next call.
    pub fn pump(&self, editor: &mut Editor, settings: &Settings) -> Vec<Result<Outcome, EditError>> {
        let pending = std::mem::take(&mut *self.inner.lock());

        pending
            .into_iter()
            .map(|command| {
                let result = editor.apply(command.clone(), settings);
                if let Err(e) = &result {
                    log::warn!("Rejected {:?}: {}", command, e);
                }
                result
            })
            .collect()
    }
}
