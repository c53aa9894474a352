//! Browse, generate, import and download wallpapers from the command line.

use std::path::Path;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;
use wallsf1::{
    AspectRatio, ExportOutcome, GalleryItem, GalleryTab, ImageProvider, LocalFile, Session,
    WallsConfig,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wallsf1=info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("wallsf1 failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        print_usage();
        return Ok(());
    };
    let rest = &args[1..];

    if matches!(command.as_str(), "help" | "--help" | "-h") {
        print_usage();
        return Ok(());
    }

    let config = WallsConfig::load_or_default().context("loading config")?;
    let mut session = Session::from_config(&config)?;

    match command.as_str() {
        "list" => {
            if rest.iter().any(|a| a == "--saved") {
                session.set_tab(GalleryTab::Saved);
            }
            list(&session);
            Ok(())
        }
        "toggle" => {
            let [id] = rest else {
                bail!("toggle requires exactly one wallpaper id");
            };
            let saved = session.toggle_favorite(id);
            println!("{id}\t{}", if saved { "saved" } else { "removed" });
            Ok(())
        }
        "generate" => {
            let (prompt, flags) = split_positional(rest, "generate requires a prompt")?;
            let ratio = match flag_value(flags, "--ratio")? {
                Some(raw) => raw.parse::<AspectRatio>()?,
                None => session.draft_ratio(),
            };
            let id = match session.generate(prompt, ratio).await {
                Ok(item) => item.id().to_owned(),
                Err(e) => {
                    let err = anyhow::Error::new(e);
                    return Err(match session.last_error() {
                        Some(message) => err.context(message.to_owned()),
                        None => err,
                    });
                }
            };
            println!("generated {id}");
            if flags.iter().any(|a| a == "--download") {
                report(session.export(&id).await?);
            }
            Ok(())
        }
        "upload" => {
            let (path, flags) = split_positional(rest, "upload requires a file path")?;
            let title = flag_value(flags, "--title")?;
            match session.upload(LocalFile::from_path(Path::new(path)), title).await? {
                Some(item) => println!("uploaded {}\t{}", item.id(), item.title()),
                None => println!("skipped {path}: not an image"),
            }
            Ok(())
        }
        "download" => {
            let [id] = rest else {
                bail!("download requires exactly one wallpaper id");
            };
            report(session.export(id).await?);
            Ok(())
        }
        other => bail!("unknown subcommand `{other}` (use list|toggle|generate|upload|download)"),
    }
}

fn list<P: ImageProvider>(session: &Session<P>) {
    let items = session.visible_items();
    if items.is_empty() {
        println!("no wallpapers");
        return;
    }
    for item in items {
        print_item(item, session.is_saved(item.id()));
    }
}

fn print_item(item: &GalleryItem, saved: bool) {
    println!(
        "{}\t{}\t{}\t{}{}",
        item.id(),
        item.title(),
        item.author().unwrap_or("-"),
        if item.image().is_embedded() { "embedded" } else { "remote" },
        if saved { "\t*" } else { "" },
    );
}

fn report(outcome: ExportOutcome) {
    match outcome {
        ExportOutcome::Saved(path) => println!("saved to {}", path.display()),
        ExportOutcome::OpenedInBrowser => println!("could not save; opened in browser instead"),
        ExportOutcome::Failed(reason) => eprintln!("download failed: {reason}"),
    }
}

fn split_positional<'a>(
    args: &'a [String],
    missing: &str,
) -> anyhow::Result<(&'a str, &'a [String])> {
    match args.split_first() {
        Some((first, rest)) if !first.starts_with("--") => Ok((first.as_str(), rest)),
        _ => bail!("{missing}"),
    }
}

fn flag_value<'a>(flags: &'a [String], name: &str) -> anyhow::Result<Option<&'a str>> {
    match flags.iter().position(|a| a == name) {
        Some(i) => flags
            .get(i + 1)
            .map(|v| Some(v.as_str()))
            .with_context(|| format!("{name} requires a value")),
        None => Ok(None),
    }
}

fn print_usage() {
    println!(
        "Usage:\n  \
         wallsf1 list [--saved]\n  \
         wallsf1 toggle <id>\n  \
         wallsf1 generate <prompt> [--ratio 1:1|3:4|4:3|9:16|16:9] [--download]\n  \
         wallsf1 upload <path> [--title <title>]\n  \
         wallsf1 download <id>\n  \
         wallsf1 help"
    );
}
