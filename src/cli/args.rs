//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

use crate::config::Style;

/// Render and inspect trees read from indented outline files
#[derive(Parser, Debug)]
#[command(name = "simpletree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output on stderr: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .simpletree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Rendering overrides shared by commands that print labels
#[derive(clap::Args, Debug, Default)]
pub struct LabelArgs {
    /// Label key: display, position, level or a node field (name, line)
    #[arg(short, long)]
    pub key: Option<String>,

    /// Spaces per level in the outline file
    #[arg(long)]
    pub indent: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every tree of an outline file
    Show {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        labels: LabelArgs,
        /// Horizontal characters between hook and label
        #[arg(short, long)]
        width: Option<usize>,
        /// Rendering style
        #[arg(short, long, value_enum)]
        style: Option<Style>,
    },

    /// Print the leaves of every tree, nested by branch
    Leaves {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        #[command(flatten)]
        labels: LabelArgs,
    },

    /// Print all nodes on one layer of every tree
    Layer {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Layer number, the root is layer 0
        level: usize,
        #[command(flatten)]
        labels: LabelArgs,
    },

    /// Show size, depth and farthest leaf of every tree
    Info {
        /// Outline file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Spaces per level in the outline file
        #[arg(long)]
        indent: Option<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show config file locations
    Path,
    /// Print a commented config template
    Template,
}
