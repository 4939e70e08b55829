//! Interactive text entry
//!
//! A few editing commands ask for more than one line of input. The world
//! never touches stdin itself; it goes through a [`Console`] instead.

use std::collections::VecDeque;

pub trait Console {
    /// Show a prompt to the user
    fn prompt(&mut self, text: &str);

    /// Next line of input without its terminator, or `None` once input ends
    fn read_line(&mut self) -> Option<String>;

    /// Read lines until a blank one (or end of input), each kept with a
    /// trailing newline
    fn read_block(&mut self) -> String {
        let mut block = String::new();
        while let Some(line) = self.read_line() {
            if line.is_empty() {
                break;
            }
            block.push_str(&line);
            block.push('\n');
        }
        block
    }
}

/// Console fed from a fixed list of lines, recording every prompt
#[derive(Debug, Default, Clone)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Prompts shown so far, oldest first
    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    /// Lines not consumed yet
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn prompt(&mut self, text: &str) {
        self.prompts.push(text.to_string());
    }

    fn read_line(&mut self) -> Option<String> {
        self.input.pop_front()
    }
}
