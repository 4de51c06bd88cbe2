//! Command handlers: open the store, apply one edit, validate and save
use anyhow::{bail, Context};
use easytier_panel::form::{display_value, is_required, is_visible};
use easytier_panel::schema::easytier::{PUBLIC_PEER, WEB_CONSOLE_URL};
use easytier_panel::schema::{OptionSpec, SectionSchema, GLOBAL, NETWORK};
use easytier_panel::status::UbusSupervisor;
use easytier_panel::{MemoryStore, Panel, PanelSettings, Record, StatusPoller, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cli::{Command, NetworkCommand};

pub async fn run(command: Command, settings: &PanelSettings) -> anyhow::Result<()> {
    match command {
        Command::Show => show(settings),
        Command::Validate => validate(settings),
        Command::Schema => {
            print_schema(&GLOBAL);
            print_schema(&NETWORK);
            Ok(())
        }
        Command::Set { key, values } => edit(settings, |panel| {
            let value = parse_value(&GLOBAL, &key, values)?;
            panel.set_global(&key, value)?;
            Ok(())
        }),
        Command::Unset { key } => edit(settings, |panel| {
            lookup(&GLOBAL, &key)?;
            panel.unset_global(&key)?;
            Ok(())
        }),
        Command::Network { action } => network(settings, action),
        Command::Status { watch, .. } => status(settings, watch).await,
    }
}

fn open_store(settings: &PanelSettings) -> anyhow::Result<MemoryStore> {
    MemoryStore::open(&settings.store_path)
        .with_context(|| format!("failed to open {}", settings.store_path.display()))
}

/// Load, apply one change, then save; nothing is written when validation fails
fn edit<F>(settings: &PanelSettings, change: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Panel) -> anyhow::Result<()>,
{
    let mut store = open_store(settings)?;
    let mut panel = Panel::load(&store);
    change(&mut panel)?;
    panel.save(&mut store).context("configuration not saved")?;
    Ok(())
}

fn lookup(schema: &SectionSchema, key: &str) -> anyhow::Result<&'static OptionSpec> {
    schema
        .find(key)
        .with_context(|| format!("unknown {} option '{}'", schema.section_type, key))
}

/// Turn command line words into the value shape the option stores
fn parse_value(schema: &SectionSchema, key: &str, mut values: Vec<String>) -> anyhow::Result<Value> {
    let spec = lookup(schema, key)?;
    Ok(if spec.kind.is_list() || values.len() > 1 {
        Value::List(values)
    } else {
        Value::Scalar(values.pop().unwrap_or_default())
    })
}

fn network(settings: &PanelSettings, action: NetworkCommand) -> anyhow::Result<()> {
    match action {
        NetworkCommand::List => {
            let store = open_store(settings)?;
            let panel = Panel::load(&store);
            for (index, record) in panel.networks().list().iter().enumerate() {
                println!(
                    "{:>2}  {}  id={}  {}",
                    index,
                    record.section(),
                    record.scalar("id").unwrap_or("-"),
                    if record.is_on("enabled") { "enabled" } else { "disabled" }
                );
            }
            Ok(())
        }
        NetworkCommand::Add { id } => edit(settings, |panel| {
            let networks = panel.networks_mut();
            let section = networks.add().section().to_string();
            networks.set_field(&section, "id", id.as_str())?;
            println!("{}", section);
            Ok(())
        }),
        NetworkCommand::Remove { section } => edit(settings, |panel| {
            panel.networks_mut().remove(&section)?;
            Ok(())
        }),
        NetworkCommand::Move { section, index } => edit(settings, |panel| {
            panel.networks_mut().move_to(&section, index)?;
            Ok(())
        }),
        NetworkCommand::Set {
            section,
            key,
            values,
        } => edit(settings, |panel| {
            let value = parse_value(&NETWORK, &key, values)?;
            panel.networks_mut().set_field(&section, &key, value)?;
            Ok(())
        }),
        NetworkCommand::Unset { section, key } => edit(settings, |panel| {
            lookup(&NETWORK, &key)?;
            panel.networks_mut().unset_field(&section, &key)?;
            Ok(())
        }),
    }
}

fn validate(settings: &PanelSettings) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let panel = Panel::load(&store);
    match panel.validate() {
        Ok(()) => {
            println!("Configuration is valid");
            Ok(())
        }
        Err(errors) => {
            for e in errors.iter() {
                println!("{}", e);
            }
            bail!("{} invalid field(s)", errors.len())
        }
    }
}

fn show(settings: &PanelSettings) -> anyhow::Result<()> {
    let store = open_store(settings)?;
    let panel = Panel::load(&store);

    println!("Global configuration");
    print_record(&GLOBAL, panel.global());
    if panel.global().is_on("console") {
        println!("  (nodes are managed from the Web Console, see {})", WEB_CONSOLE_URL);
    }

    for record in panel.networks().list() {
        println!();
        println!("Network {}", record.section());
        print_record(&NETWORK, record);
    }
    Ok(())
}

fn print_record(schema: &SectionSchema, record: &Record) {
    for spec in schema.options {
        let value = record.get(spec.key);
        let marker = if is_required(schema, spec.key, record) { "*" } else { " " };
        if is_visible(schema, spec.key, record) {
            let shown = match value {
                Some(v) => display_value(spec, v),
                None => spec
                    .placeholder
                    .map(|p| format!("(e.g. {})", p))
                    .unwrap_or_else(|| "-".to_string()),
            };
            println!("  {}{:<18} {}", marker, spec.key, shown);
        } else if let Some(v) = value {
            println!("   {:<18} {} (inactive)", spec.key, display_value(spec, v));
        }
    }
}

fn print_schema(schema: &SectionSchema) {
    println!("[{}]", schema.section_type);
    for spec in schema.options {
        let depends: Vec<String> = spec
            .depends
            .iter()
            .map(|clause| {
                clause
                    .iter()
                    .map(|c| {
                        let op = if c.negate { "!=" } else { "==" };
                        format!("{} {} '{}'", c.key, op, c.expected)
                    })
                    .collect::<Vec<_>>()
                    .join(" && ")
            })
            .collect();
        println!(
            "  {:<18} {:<12} {:<24} default={:<20} {}{}",
            spec.key,
            format!("{:?}", spec.kind),
            spec.datatype.to_string(),
            spec.default.unwrap_or("-"),
            if spec.required { "required " } else { "" },
            if depends.is_empty() {
                String::new()
            } else {
                format!("when {}", depends.join(" || "))
            }
        );
        if spec.key == "peers" {
            println!("  {:<18} suggested: {}", "", PUBLIC_PEER);
        }
    }
}

async fn status(settings: &PanelSettings, watch: bool) -> anyhow::Result<()> {
    let supervisor = UbusSupervisor::new(settings.ubus_path.clone(), settings.status_timeout());
    let mut poller = StatusPoller::new(
        Arc::new(supervisor),
        settings.service_name.clone(),
        settings.instance_name.clone(),
        settings.poll_interval(),
    );

    if !watch {
        println!("{}", poller.tick().await);
        return Ok(());
    }

    let mut slot = poller.subscribe();
    println!("{}", *slot.borrow_and_update());
    poller.start();
    loop {
        tokio::select! {
            changed = slot.changed() => {
                if changed.is_err() {
                    warn!("Status slot closed");
                    break;
                }
                println!("{}", *slot.borrow_and_update());
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }
    poller.stop();
    Ok(())
}
