// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Interactive adapter choice on a console.

use lumen_core::renderer::{AdapterInfo, AdapterSelector};
use std::io::{self, BufRead, Write};

/// Lists the adapters on `output` and reads the chosen index from `input`.
///
/// A line that does not parse as an integer counts as no choice.
pub struct PromptAdapterSelector<R, W> {
    input: R,
    output: W,
}

impl PromptAdapterSelector<io::StdinLock<'static>, io::Stdout> {
    /// Prompts on the process console.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptAdapterSelector<R, W> {
    /// Prompts on the given streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn prompt(&mut self, adapters: &[AdapterInfo]) -> io::Result<Option<i64>> {
        for (i, info) in adapters.iter().enumerate() {
            writeln!(self.output, "Adapter[{i}]: {}", info.description)?;
        }
        write!(self.output, "Please choose which adapter to use: ")?;
        self.output.flush()?;

        let mut line = String::new();
        self.input.read_line(&mut line)?;
        let choice = parse_choice(&line);
        if let Some(index) = choice {
            writeln!(self.output, "\nYou have chosen adapter[{index}]")?;
        }
        Ok(choice)
    }
}

impl<R: BufRead, W: Write> AdapterSelector for PromptAdapterSelector<R, W> {
    fn select(&mut self, adapters: &[AdapterInfo]) -> Option<i64> {
        match self.prompt(adapters) {
            Ok(choice) => choice,
            Err(e) => {
                log::warn!("Adapter prompt failed: {e}");
                None
            }
        }
    }
}

fn parse_choice(line: &str) -> Option<i64> {
    line.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn adapters() -> Vec<AdapterInfo> {
        ["First GPU", "Second GPU"]
            .into_iter()
            .map(|name| AdapterInfo {
                description: name.to_string(),
                dedicated_video_memory: 0,
                dedicated_system_memory: 0,
                shared_system_memory: 0,
                is_software: false,
            })
            .collect()
    }

    #[test]
    fn lists_adapters_and_reads_the_index() {
        let mut output = Vec::new();
        let choice = PromptAdapterSelector::new(Cursor::new("1\n"), &mut output)
            .select(&adapters());
        assert_eq!(choice, Some(1));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Adapter[0]: First GPU"));
        assert!(text.contains("Adapter[1]: Second GPU"));
        assert!(text.contains("You have chosen adapter[1]"));
    }

    #[test]
    fn out_of_range_numbers_are_passed_through() {
        let choice = PromptAdapterSelector::new(Cursor::new("  -3 \n"), Vec::new())
            .select(&adapters());
        assert_eq!(choice, Some(-3));
    }

    #[test]
    fn non_numeric_or_missing_input_is_no_choice() {
        let garbage = PromptAdapterSelector::new(Cursor::new("gpu\n"), Vec::new())
            .select(&adapters());
        assert_eq!(garbage, None);

        let eof = PromptAdapterSelector::new(Cursor::new(""), Vec::new()).select(&adapters());
        assert_eq!(eof, None);
    }
}
