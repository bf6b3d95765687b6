// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-EbtOutline-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of ebt-outline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! ebt-outline CLI entrypoint.
//!
//! Loads the outline tree (from the survey backend, a local JSON file, or the built-in demo)
//! and runs the interactive TUI. `--text-tree` prints the outline as indented text instead.

use std::error::Error;
use std::path::Path;

use ebt_outline::backend::{Backend, BackendClient, HttpBackend, OfflineBackend};
use ebt_outline::config::{ConfigOverrides, ViewerConfig};
use ebt_outline::format::load_session;
use ebt_outline::model::fixtures::{demo_session, demo_source};
use ebt_outline::model::Session;
use ebt_outline::render::render_text_tree;
use ebt_outline::timer::Timer;
use ebt_outline::tui::{self, AppContext};
use ebt_outline::viewer::ViewKind;
use tracing::{info, warn};

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} --data <url|file> [--base-url <url>] [options]\n  {program} --demo [options]\n\nOptions:\n  --config <file>      Read settings from <file> instead of the default config path\n  --base-url <url>     Outline page directory on the survey backend\n  --data <url|file>    Tree JSON, relative to --base-url, absolute, or a local file\n  --user <name>        User name sent with every log record\n  --proj <name>        Project name\n  --ver <name>         Project version\n  --view-kind <kind>   GITREV or RELEASE (source links)\n  --view-id <id>       Revision or version directory for source links\n  --no-log             Do not post actions to the backend log\n  --text-tree          Print the outline as indented text and exit\n  --demo               Use the built-in demo outline (offline)\n\nEnvironment: EBT_OUTLINE_USER, EBT_OUTLINE_BASE_URL, EBT_OUTLINE_LOG (log filter)."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    config: Option<String>,
    overrides: ConfigOverrides,
    demo: bool,
    text_tree: bool,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    fn value(
        slot: &mut Option<String>,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<(), ()> {
        if slot.is_some() {
            return Err(());
        }
        let raw = args.next().filter(|raw| !raw.starts_with("--")).ok_or(())?;
        *slot = Some(raw);
        Ok(())
    }

    let mut options = CliOptions::default();
    let mut view_kind = None;

    while let Some(arg) = args.next() {
        let overrides = &mut options.overrides;
        match arg.as_str() {
            "--config" => value(&mut options.config, &mut args)?,
            "--base-url" => value(&mut overrides.base_url, &mut args)?,
            "--data" => value(&mut overrides.data_url, &mut args)?,
            "--user" => value(&mut overrides.user, &mut args)?,
            "--proj" => value(&mut overrides.proj, &mut args)?,
            "--ver" => value(&mut overrides.ver, &mut args)?,
            "--view-id" => value(&mut overrides.view_id, &mut args)?,
            "--view-kind" => value(&mut view_kind, &mut args)?,
            "--no-log" => {
                if overrides.no_log {
                    return Err(());
                }
                overrides.no_log = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--text-tree" => {
                if options.text_tree {
                    return Err(());
                }
                options.text_tree = true;
            }
            _ => return Err(()),
        }
    }

    if let Some(kind) = view_kind {
        options.overrides.view_kind = kind.parse::<ViewKind>().ok();
    }
    if options.demo && options.overrides.data_url.is_some() {
        return Err(());
    }

    Ok(options)
}

/// Reads the tree from a local file or the backend. Returns the client when there is one.
fn load_tree(
    config: &ViewerConfig,
    runtime: &tokio::runtime::Runtime,
) -> Result<(Session, Option<BackendClient>), Box<dyn Error>> {
    let data_url = config
        .data_url
        .as_deref()
        .ok_or("no outline data: pass --data <url|file> or --demo")?;
    let client = config
        .base_url
        .as_deref()
        .map(|base_url| BackendClient::new(base_url, config.timeout()))
        .transpose()?;

    let timer = Timer::start();
    let json = if Path::new(data_url).is_file() {
        std::fs::read_to_string(data_url)?
    } else {
        let client = client
            .as_ref()
            .ok_or("remote outline data needs --base-url (or EBT_OUTLINE_BASE_URL)")?;
        runtime.block_on(client.fetch_tree(data_url))?
    };
    let session = load_session(&json)?;
    info!(
        data_url,
        nodes = session.tree().len(),
        elapsed_ms = timer.elapsed_ms(),
        "outline loaded"
    );
    Ok((session, client))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "ebt-outline".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        let mut config = ViewerConfig::load(options.config.as_deref().map(Path::new))?;
        config.apply_env(|name| std::env::var(name).ok());
        config.apply_overrides(options.overrides);
        if let Some(path) = ebt_outline::logging::init(&config.logging)? {
            info!(log = %path.display(), user = config.user.as_str(), "ebt-outline starting");
        }

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        let (session, client) = if options.demo {
            (demo_session()?, None)
        } else {
            load_tree(&config, &runtime).map_err(|err| {
                warn!(error = %err, "outline load failed");
                err
            })?
        };
        let backend: Box<dyn Backend + Send> = match client {
            Some(client) => Box::new(HttpBackend::new(
                client,
                runtime.handle().clone(),
                config.log_enabled,
            )),
            None if options.demo => Box::new(OfflineBackend::new(demo_source)),
            None => {
                warn!("no base url; logging and source view stay local");
                Box::new(OfflineBackend::new(|_| None))
            }
        };

        if options.text_tree {
            print!("{}", render_text_tree(session.tree()));
            return Ok(());
        }

        let context = AppContext {
            identity: config.log_identity(),
            link: config.link_context(),
            judgments: config.judgment_values(),
            data_url: config.data_url.clone(),
        };

        runtime.block_on(async move {
            let tui_result = tokio::task::spawn_blocking(move || {
                tui::run(session, backend, context).map_err(|err| err.to_string())
            })
            .await
            .map_err(|err| -> Box<dyn Error> { Box::new(err) })?;
            tui_result.map_err(|err| -> Box<dyn Error> { err.into() })
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("ebt-outline: {err}");
        std::process::exit(1);
    }
}
