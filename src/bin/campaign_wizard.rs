use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use ppcbuilder::chat::{BuildArtifact, CampaignChat};
use ppcbuilder::config::{config_file_path, load_from_path, load_or_default, save, save_to_path};
use ppcbuilder::wizard::StagePrompt;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = CliArgs::parse()?;
    let mut config = match &args.config {
        Some(path) => load_from_path(path)?,
        None => load_or_default()?,
    };
    if let Some(dir) = args.sources.clone() {
        config.knowledge.sources_dir = Some(dir);
    }
    if args.write_config {
        let target = match &args.config {
            Some(path) => {
                save_to_path(&config, path)?;
                path.clone()
            }
            None => {
                save(&config)?;
                config_file_path()?
            }
        };
        println!("Configuration written to {}", target.display());
        return Ok(());
    }
    let mut chat = CampaignChat::from_config(&config)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut prompt = chat.prompt()?;
    loop {
        show_prompt(&prompt)?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("Failed to read from stdin")?;
        let input = line.trim();
        let outcome = match input {
            "quit" | "exit" => return Ok(()),
            "back" => chat.back(),
            "restart" => chat.restart(),
            "generate" if prompt.is_final => {
                let artifact = chat.generate()?;
                show_ads(&artifact);
                if let BuildArtifact::Campaign { .. } = artifact {
                    edit_groups(&mut chat, &mut lines)?;
                }
                return report(&chat, &args);
            }
            "" => match prompt.prefill.clone() {
                Some(previous) => chat.respond(&previous),
                None => continue,
            },
            answer => chat.respond(answer),
        };
        match outcome {
            Ok(next) => prompt = next,
            Err(err) => println!("! {err}"),
        }
    }
}

fn show_prompt(prompt: &StagePrompt) -> Result<()> {
    println!();
    println!("{}", prompt.message);
    if let Some(options) = &prompt.options {
        for option in options {
            println!("  - {option}");
        }
    }
    if prompt.is_final {
        println!("(type 'generate', 'back', 'restart' or 'quit')");
    } else if let Some(previous) = &prompt.prefill {
        println!("(press enter to keep '{previous}')");
    }
    print!("> ");
    io::stdout().flush()?;
    Ok(())
}

fn show_ads(artifact: &BuildArtifact) {
    let ads = &artifact.ads().variant;
    println!("Headlines:");
    for headline in &ads.headlines {
        println!("  {headline}");
    }
    println!("Descriptions:");
    for description in &ads.descriptions {
        println!("  {description}");
    }
}

/// Lets the user name each ad group and attach keywords until `done`.
fn edit_groups(
    chat: &mut CampaignChat,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    loop {
        if let Some(BuildArtifact::Campaign { structure, .. }) = chat.artifact() {
            println!();
            for (index, group) in structure.ad_groups.iter().enumerate() {
                let name = if group.name.is_empty() {
                    "(unnamed)"
                } else {
                    group.name.as_str()
                };
                let keywords: Vec<&str> = group.keywords.iter().map(String::as_str).collect();
                println!("  {}. {name} [{}]", index + 1, keywords.join("; "));
            }
        }
        println!("(type 'group <n> <name>: <keyword>, <keyword>' or 'done')");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line.context("Failed to read from stdin")?;
        let input = line.trim();
        if matches!(input, "done" | "quit" | "exit" | "") {
            return Ok(());
        }
        let outcome = parse_group_edit(input).and_then(|edit| {
            let keywords: Vec<&str> = edit.keywords.iter().map(String::as_str).collect();
            chat.edit_group(edit.index, &edit.name, &keywords)
        });
        if let Err(err) = outcome {
            println!("! {err}");
        }
    }
}

struct GroupEdit {
    index: usize,
    name: String,
    keywords: Vec<String>,
}

fn parse_group_edit(input: &str) -> Result<GroupEdit> {
    let rest = input
        .strip_prefix("group ")
        .ok_or_else(|| anyhow!("Expected 'group <n> <name>: <keywords>' or 'done'"))?;
    let (number, rest) = rest.trim_start().split_once(' ').unwrap_or((rest.trim(), ""));
    let position: usize = number
        .parse()
        .with_context(|| format!("'{number}' is not a group number"))?;
    if position == 0 {
        return Err(anyhow!("Group numbers start at 1"));
    }
    let (name, keywords) = rest.split_once(':').unwrap_or((rest, ""));
    Ok(GroupEdit {
        index: position - 1,
        name: name.trim().to_string(),
        keywords: keywords
            .split(',')
            .map(str::trim)
            .filter(|keyword| !keyword.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

fn report(chat: &CampaignChat, args: &CliArgs) -> Result<()> {
    let artifact = chat
        .artifact()
        .context("Nothing was generated")?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(artifact)?);
    } else if let BuildArtifact::Campaign { structure, .. } = artifact {
        println!("Ad groups: {}", structure.ad_groups.len());
    }

    if let Some(path) = &args.export {
        for written in chat.export(path)? {
            println!("Exported to {}", written.display());
        }
    }
    Ok(())
}

struct CliArgs {
    config: Option<PathBuf>,
    sources: Option<PathBuf>,
    export: Option<PathBuf>,
    json: bool,
    write_config: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = CliArgs {
            config: None,
            sources: None,
            export: None,
            json: false,
            write_config: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let value = args.next().context("Expected a file after --config")?;
                    parsed.config = Some(PathBuf::from(value));
                }
                "--sources" => {
                    let value = args.next().context("Expected a directory after --sources")?;
                    parsed.sources = Some(PathBuf::from(value));
                }
                "--export" => {
                    let value = args.next().context("Expected a file after --export")?;
                    parsed.export = Some(PathBuf::from(value));
                }
                "--json" => parsed.json = true,
                "--write-config" => parsed.write_config = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(parsed)
    }
}

fn print_usage() {
    println!("PPC Campaign Builder (terminal wizard)");
    println!("Walks through the questionnaire and prints the generated ads.");
    println!("Usage: cargo run --bin campaign_wizard -- [options]");
    println!("Options:");
    println!("  --config <file>    Read configuration from this TOML file");
    println!("  --sources <dir>    Knowledge table directory (overrides knowledge.sources_dir)");
    println!("  --export <file>    Write the result as CSV");
    println!("  --json             Print the result as JSON");
    println!("  --write-config     Save the effective configuration and exit");
}
