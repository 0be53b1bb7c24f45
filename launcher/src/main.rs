#[cfg(not(target_os = "windows"))]
mod compat;
mod launch;

use std::io::Read;
use std::path::Path;

use clap::{Arg, ArgAction, Command};
use log::{info, warn};
use shared::apply::{apply_flags, ApplyReport};
use shared::channel::Channel;
use shared::flags::{merge, FlagSet, FlagStore, FlagValue};
use shared::install::InstallFinder;
use shared::{logs::setup_logger, BoxResult};

const LOGS_FILENAME: &str = "korone-strap.log";

fn parse_channel(v: &str) -> Result<Channel, String> {
    v.parse()
}

fn main() -> BoxResult<()> {
    setup_logger(Path::new(LOGS_FILENAME));

    let matches = Command::new("korone-strap")
        .about("Launcher for the ProjectX and Pekora legacy clients")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("list").about("List installed versions and settings targets"))
        .subcommand(
            Command::new("flags")
                .about("Edit the FastFlag overlay")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the stored FastFlags"))
                .subcommand(
                    Command::new("set")
                        .about("Add or update a FastFlag; the value type is detected")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(
                    Command::new("unset")
                        .about("Remove a FastFlag")
                        .arg(Arg::new("key").required(true)),
                )
                .subcommand(Command::new("clear").about("Remove every stored FastFlag"))
                .subcommand(
                    Command::new("import")
                        .about("Merge FastFlags from a JSON object")
                        .arg(Arg::new("file").help("JSON file to read; stdin when omitted")),
                ),
        )
        .subcommand(
            Command::new("apply")
                .about("Write the FastFlag overlay into every installed client")
                .arg(
                    Arg::new("channel")
                        .long("channel")
                        .help("Only write targets of this channel")
                        .value_parser(parse_channel),
                ),
        )
        .subcommand(
            Command::new("launch")
                .about("Apply FastFlags and start a client")
                .arg(
                    Arg::new("channel")
                        .help("Client channel: 2017, 2018, 2020 or 2021")
                        .required(true)
                        .value_parser(parse_channel),
                )
                .arg(
                    Arg::new("app")
                        .long("app")
                        .action(ArgAction::SetTrue)
                        .help("Start the client app instead of going through the browser"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("list", _)) => cmd_list(),
        Some(("flags", sub)) => match sub.subcommand() {
            Some(("show", _)) => cmd_flags_show(),
            Some(("set", m)) => cmd_flags_set(
                m.get_one::<String>("key").unwrap(),
                m.get_one::<String>("value").unwrap(),
            ),
            Some(("unset", m)) => cmd_flags_unset(m.get_one::<String>("key").unwrap()),
            Some(("clear", _)) => cmd_flags_clear(),
            Some(("import", m)) => cmd_flags_import(m.get_one::<String>("file")),
            _ => unreachable!(),
        },
        Some(("apply", m)) => cmd_apply(m.get_one::<Channel>("channel").copied()),
        Some(("launch", m)) => cmd_launch(
            *m.get_one::<Channel>("channel").unwrap(),
            m.get_flag("app"),
        ),
        _ => unreachable!(),
    }
}

fn cmd_list() -> BoxResult<()> {
    let finder = InstallFinder::for_host();

    println!("Version roots:");
    for root in finder.get_version_roots() {
        let marker = if root.path.is_dir() { "" } else { " (not present)" };
        println!("  [{}] {}{}", root.family.dir_name(), root.path.display(), marker);
    }

    let version_dirs = finder.get_version_dirs();
    if version_dirs.is_empty() {
        println!("\nNo installed versions found.");
        return Ok(());
    }

    println!("\nInstalled versions:");
    for dir in &version_dirs {
        println!("  {}", dir.display());
    }

    println!("\nSettings targets:");
    let targets = finder.get_settings_targets(&Channel::SETTINGS_CAPABLE);
    if targets.is_empty() {
        println!("  (none)");
    }
    for target in targets {
        println!("  [{}] {}", target.channel, target.settings_path.display());
    }

    println!("\nExecutables:");
    for channel in Channel::ALL {
        let paths = finder.get_executable_paths(channel);
        match paths.first() {
            None => println!("  [{}] (none)", channel),
            Some(first) => {
                println!("  [{}] {}", channel, first.display());
                for extra in &paths[1..] {
                    println!("  [{}] {} (ignored, first match wins)", channel, extra.display());
                }
            }
        }
    }
    Ok(())
}

fn cmd_flags_show() -> BoxResult<()> {
    let flags = FlagStore::at_default_location().load();
    if flags.is_empty() {
        println!("No FastFlags set.");
        return Ok(());
    }
    for (index, (key, value)) in flags.iter().enumerate() {
        println!("{:3}. {} = {} ({})", index + 1, key, value, value.type_name());
    }
    Ok(())
}

fn cmd_flags_set(key: &str, raw_value: &str) -> BoxResult<()> {
    let key = key.trim();
    if key.is_empty() {
        return Err("FastFlag name must not be empty".into());
    }
    if raw_value.trim().is_empty() {
        return Err("FastFlag value must not be empty".into());
    }

    let value = FlagValue::infer(raw_value);
    let store = FlagStore::at_default_location();
    let mut flags = store.load();
    flags.insert(key.to_string(), value.clone());
    store.save(&flags)?;
    println!("Set {} = {} ({})", key, value, value.type_name());
    Ok(())
}

fn cmd_flags_unset(key: &str) -> BoxResult<()> {
    let store = FlagStore::at_default_location();
    let mut flags = store.load();
    match flags.shift_remove(key) {
        Some(_) => {
            store.save(&flags)?;
            println!("Removed FastFlag {}", key);
            Ok(())
        }
        None => Err(format!("FastFlag '{}' is not set", key).into()),
    }
}

fn cmd_flags_clear() -> BoxResult<()> {
    let store = FlagStore::at_default_location();
    store.save(&FlagSet::new())?;
    println!("Cleared all FastFlags.");
    Ok(())
}

fn cmd_flags_import(file: Option<&String>) -> BoxResult<()> {
    let content = match file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    if content.trim().is_empty() {
        return Err("No JSON content provided".into());
    }
    let imported: FlagSet = serde_json::from_str(&content)
        .map_err(|err| format!("Invalid FastFlags JSON: {}", err))?;

    let store = FlagStore::at_default_location();
    let mut flags = store.load();
    for (key, value) in &imported {
        println!("  + {} = {} ({})", key, value, value.type_name());
    }
    let count = imported.len();
    merge(&mut flags, imported);
    store.save(&flags)?;
    println!("Imported {} FastFlag(s).", count);
    Ok(())
}

fn print_report(report: &ApplyReport) {
    for outcome in &report.outcomes {
        match &outcome.result {
            Ok(()) => println!(
                "Applied FastFlags to {} ({})",
                outcome.target.settings_path.display(),
                outcome.target.channel
            ),
            Err(err) => warn!("{}", err),
        }
    }
}

fn cmd_apply(channel: Option<Channel>) -> BoxResult<()> {
    let flags = FlagStore::at_default_location().load();
    if flags.is_empty() {
        println!("No FastFlags to apply.");
        return Ok(());
    }

    if let Some(channel) = channel {
        if !channel.supports_settings() {
            let message = format!("The {} client does not read ClientAppSettings.json", channel);
            return Err(message.into());
        }
    }
    let channels = match channel {
        Some(channel) => vec![channel],
        None => Channel::SETTINGS_CAPABLE.to_vec(),
    };
    let finder = InstallFinder::for_host();
    let targets = finder.get_settings_targets(&channels);
    if targets.is_empty() {
        println!("No installed versions take a FastFlag overlay; nothing to do.");
        return Ok(());
    }

    let report = apply_flags(&flags, &targets);
    print_report(&report);
    if report.any_succeeded() {
        Ok(())
    } else {
        Err("Could not apply FastFlags to any target".into())
    }
}

fn cmd_launch(channel: Channel, app_mode: bool) -> BoxResult<()> {
    if app_mode && !channel.supports_app_mode() {
        let message = format!("The {} client can only be started through the browser", channel);
        return Err(message.into());
    }

    let finder = InstallFinder::for_host();

    if channel.supports_settings() {
        let flags = FlagStore::at_default_location().load();
        if !flags.is_empty() {
            info!("Applying {} FastFlag(s) before launch", flags.len());
            let targets = finder.get_settings_targets(&Channel::SETTINGS_CAPABLE);
            let report = apply_flags(&flags, &targets);
            print_report(&report);
            if !report.is_empty() && !report.any_succeeded() {
                warn!("FastFlags could not be applied, launching anyway");
            }
        }
    }

    let executables = finder.get_executable_paths(channel);
    launch::launch(channel, app_mode, &executables)?;
    println!("Launched {}.", channel);
    if !app_mode {
        println!("Join a game from the website to start playing.");
    }
    Ok(())
}
