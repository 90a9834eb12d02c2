use clap::CommandFactory;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

// Mock crate root modules that src/cli/args.rs depends on
#[allow(dead_code)]
mod config {
    pub struct Config {
        pub output: OutputConfig,
        pub resolve: ResolveConfig,
    }

    pub struct OutputConfig {
        pub format: Option<String>,
        pub context: Option<bool>,
    }

    pub struct ResolveConfig {
        pub only_file: Option<String>,
    }
}

#[allow(dead_code)]
#[path = "src/cli/args.rs"]
mod args;

use args::Cli;

/// Render `smap-resolve.1` plus one page per subcommand into `$OUT_DIR/man1`.
fn main() -> io::Result<()> {
    println!("cargo:rerun-if-changed=src/cli/args.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let out_dir = std::env::var_os("OUT_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("target"));
    let man_dir = out_dir.join("man1");
    fs::create_dir_all(&man_dir)?;

    let cli = Cli::command();
    write_man_page(&cli, &man_dir, cli.get_name())?;
    for sub in cli.get_subcommands().filter(|sub| !sub.is_hide_set()) {
        let name = format!("{}-{}", cli.get_name(), sub.get_name());
        write_man_page(sub, &man_dir, &name)?;
    }

    Ok(())
}

fn write_man_page(cmd: &clap::Command, dir: &Path, name: &str) -> io::Result<()> {
    let mut page = Vec::new();
    clap_mangen::Man::new(cmd.clone()).render(&mut page)?;
    fs::write(dir.join(format!("{}.1", name)), page)
}
