mod app;
mod input;
mod render;

use anyhow::Result;
use clap::Parser;
use yurupet::config::Args;

fn main() -> Result<()> {
    app::run(Args::parse())
}
