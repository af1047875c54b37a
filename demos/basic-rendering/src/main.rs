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

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_infra::{load_render_config, CsoShaderSource};
use std::path::PathBuf;
use std::process::ExitCode;

/// Draws a rotating colored quad through an explicit graphics API.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// RON configuration file. Defaults to `lumen.ron` in the working directory.
    config: Option<PathBuf>,

    /// Adapter to use, skipping the interactive prompt.
    #[arg(short, long)]
    adapter: Option<usize>,

    /// Render this many frames on the headless backend instead of opening a window.
    #[arg(long, value_name = "FRAMES")]
    headless: Option<u64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = load_render_config(args.config.as_deref())
        .context("failed to load the render configuration")?;
    if args.adapter.is_some() {
        config.adapter_index = args.adapter;
    }
    let shaders = CsoShaderSource::from_config(&config);

    match args.headless {
        Some(frames) => app::run_headless(&config, &shaders, frames),
        None => app::run_windowed(config, shaders),
    }
}
