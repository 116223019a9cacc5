//! Command dispatch: every command reads an outline, queries its trees and
//! prints the result.

use std::io;
use std::path::Path;

use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, LabelArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings, Style};
use crate::errors::TreeResult;
use crate::outline::{Label, Outline, OutlineBuilder};
use crate::query::format_leaves;
use crate::render::{Key, TreeRepresentation};
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Show {
            file,
            labels,
            width,
            style,
        }) => show(cli, file, labels, *width, *style),
        Some(Commands::Leaves { file, labels }) => leaves(cli, file, labels),
        Some(Commands::Layer {
            file,
            level,
            labels,
        }) => layer(cli, file, *level, labels),
        Some(Commands::Info { file, indent }) => info(cli, file, *indent),
        Some(Commands::Config { command }) => config(cli, command),
        Some(Commands::Completion { shell }) => {
            completion(*shell);
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let cwd = std::env::current_dir().ok();
    let dir = cli.config_dir.as_deref().or(cwd.as_deref());
    Ok(Settings::load(dir)?)
}

#[instrument(level = "debug")]
fn read_outline(file: &Path, indent: usize) -> CliResult<Outline> {
    let outline = OutlineBuilder::new()
        .with_indent(indent)?
        .build_from_file(file)?;
    if outline.roots.is_empty() {
        output::warning(&format!("no nodes found in {}", file.display()));
    }
    Ok(outline)
}

/// Key named on the command line, else the configured one.
fn label_key(labels: &LabelArgs, settings: &Settings) -> Key<'static, Label> {
    Key::from_name(labels.key.as_deref().unwrap_or(&settings.key))
}

#[instrument(level = "debug", skip(cli))]
fn show(
    cli: &Cli,
    file: &Path,
    labels: &LabelArgs,
    width: Option<usize>,
    style: Option<Style>,
) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let outline = read_outline(file, labels.indent.unwrap_or(settings.indent))?;
    let style = style.unwrap_or(settings.style);
    let representation = TreeRepresentation::new()
        .with_key(label_key(labels, &settings))
        .with_width(width.unwrap_or(settings.width))?;
    debug!(key = ?representation.key(), width = representation.width(), ?style, "rendering");

    for &root in &outline.roots {
        let node = outline.tree.node(root)?;
        let rendered = match style {
            Style::Box => representation.render(node)?,
            Style::Termtree => node.to_keyed_tree(representation.key())?.to_string(),
        };
        output::info(rendered.trim_end());
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn leaves(cli: &Cli, file: &Path, labels: &LabelArgs) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let outline = read_outline(file, labels.indent.unwrap_or(settings.indent))?;
    let key = label_key(labels, &settings);

    for &root in &outline.roots {
        let nested = outline
            .tree
            .node(root)?
            .leaves()
            .into_iter()
            .map(|item| item.try_map(&mut |node| node.label(&key)))
            .collect::<TreeResult<Vec<_>>>()?;
        output::info(&format_leaves(&nested));
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn layer(cli: &Cli, file: &Path, level: usize, labels: &LabelArgs) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let outline = read_outline(file, labels.indent.unwrap_or(settings.indent))?;
    let key = label_key(labels, &settings);

    for &root in &outline.roots {
        let names = outline
            .tree
            .node(root)?
            .layer_by(level, |node| node.label(&key))
            .into_iter()
            .collect::<TreeResult<Vec<_>>>()?;
        if names.is_empty() {
            output::warning(&format!("layer {level} is empty"));
        } else {
            output::info(&names.iter().join(", "));
        }
    }
    Ok(())
}

#[instrument(level = "debug", skip(cli))]
fn info(cli: &Cli, file: &Path, indent: Option<usize>) -> CliResult<()> {
    let settings = load_settings(cli)?;
    let outline = read_outline(file, indent.unwrap_or(settings.indent))?;

    output::action("trees", &outline.roots.len());
    for &root in &outline.roots {
        let node = outline.tree.node(root)?;
        let farthest = node.farthest_leaf();
        output::header(&node);
        output::stat("nodes", &node.traverse().len());
        output::stat("leaves", &node.iterate_leaves().len());
        output::stat("layers", &node.number_of_layers());
        output::stat(
            "farthest leaf",
            &format!("{} ({})", farthest, farthest.position_in_tree()),
        );
    }
    Ok(())
}

fn config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no config directory on this platform"),
            }
            let dir = match &cli.config_dir {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()
                    .map_err(|e| CliError::InvalidArgs(format!("current directory: {e}")))?,
            };
            output::action("local", &local_config_path(&dir).display());
        }
        ConfigCommands::Template => output::info(Settings::template().trim_end()),
    }
    Ok(())
}

fn completion(shell: clap_complete::Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut io::stdout());
}
