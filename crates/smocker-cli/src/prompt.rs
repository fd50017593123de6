use std::io::{self, Write};

use smocker_core::Confirm;
use tracing::warn;

use crate::workspace::NewObjectPolicy;

/// Blocking `(Y/n)` question on the console. Only `y` or `yes` accepts;
/// anything else, including end of input, declines.
pub struct ConsolePrompt;

impl Confirm for ConsolePrompt {
    fn confirm(&mut self, prompt: &str) -> bool {
        match ask(prompt) {
            Ok(answer) => answer,
            Err(err) => {
                warn!(event = "prompt_failed", error = %err);
                false
            }
        }
    }
}

fn ask(prompt: &str) -> io::Result<bool> {
    let mut stdout = io::stdout();
    write!(stdout, "{prompt} (Y/n): ")?;
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

/// Answers from the workspace policy, falling back to `inner` when the
/// policy says to ask.
pub struct PolicyConfirm<C> {
    policy: NewObjectPolicy,
    inner: C,
}

impl<C: Confirm> PolicyConfirm<C> {
    pub fn new(policy: NewObjectPolicy, inner: C) -> Self {
        Self { policy, inner }
    }
}

impl<C: Confirm> Confirm for PolicyConfirm<C> {
    fn confirm(&mut self, prompt: &str) -> bool {
        match self.policy {
            NewObjectPolicy::AskEachTime => self.inner.confirm(prompt),
            NewObjectPolicy::AlwaysAdd => true,
            NewObjectPolicy::NeverAdd => false,
        }
    }
}
