// SPDX-License-Identifier: MIT
//
// dusted — a headless host for the Dust editing core.
//
// The core crate never draws and never touches the filesystem. This binary
// lends it a rope buffer loaded from disk, an in-memory clipboard and a
// recording surface, drives one command through the engine, and prints the
// result:
//
//   argv → Invocation → Engine (+ --set options) → command → stdout
//
// Errors go to stderr as `dusted: …` with exit status 1.

use std::env;
use std::fmt::Write as _;
use std::io;
use std::path::Path;
use std::process;

use dusted_core::buffer::{Buffer, TextBuffer};
use dusted_core::catalog::SuffixCatalog;
use dusted_core::completion::CompletionSession;
use dusted_core::position::Position;
use dusted_core::search::{find_all, search};
use dusted_core::surface::RenderQueue;
use dusted_core::{EditError, Engine};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: dusted [--set OPTION]... COMMAND

commands:
  suffixes [NAME]                    suffix reference, or what NAME_ offers
  highlight FILE                     print highlight spans
  find FILE WORD [LINE:COL]          list matches, or the next one from LINE:COL
  complete FILE LINE:COL [CAT ITEM]  list or apply completions for identifier_
  options                            show option values

flags:
  --set OPTION   :set-style option, e.g. --set nowrapscan --set debounce=50
  --write, -w    save the file after `complete`

Positions are 1-indexed. DUSTED_LOG sets the log filter (e.g. debug).";

// ─── Arguments ──────────────────────────────────────────────────────────────

#[derive(Debug, Default, PartialEq, Eq)]
struct Invocation {
    sets: Vec<String>,
    write: bool,
    help: bool,
    words: Vec<String>,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Invocation, String> {
    let mut inv = Invocation::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--set" => inv.sets.push(args.next().ok_or("--set needs an option")?),
            "--write" | "-w" => inv.write = true,
            "--help" | "-h" => inv.help = true,
            _ => match arg.strip_prefix("--set=") {
                Some(directive) => inv.sets.push(directive.to_string()),
                None => inv.words.push(arg),
            },
        }
    }
    Ok(inv)
}

fn parse_pos(s: &str) -> Result<Position, String> {
    Position::parse_display(s).ok_or_else(|| format!("bad position '{s}' (expected LINE:COL)"))
}

// ─── Commands ───────────────────────────────────────────────────────────────

fn build_engine(sets: &[String]) -> Result<Engine, String> {
    let mut engine = Engine::default();
    for directive in sets {
        engine.set_option(directive).map_err(|e| e.to_string())?;
    }
    Ok(engine)
}

fn load(file: &str) -> Result<Buffer, String> {
    Buffer::from_file(Path::new(file)).map_err(|e| format!("{file}: {e}"))
}

fn run(inv: &Invocation) -> Result<String, String> {
    if inv.help || inv.words.is_empty() {
        return Ok(USAGE.to_string());
    }
    let mut engine = build_engine(&inv.sets)?;
    let words: Vec<&str> = inv.words.iter().map(String::as_str).collect();

    match words.as_slice() {
        ["suffixes"] => Ok(engine.catalog().reference()),
        ["suffixes", name] => Ok(suffixes_for(engine.catalog(), name)),
        ["options"] => engine
            .set_option("all")
            .map(Option::unwrap_or_default)
            .map_err(|e| e.to_string()),
        ["highlight", file] => Ok(highlight(&mut engine, &load(file)?)),
        ["find", file, word] => list_matches(&engine, &load(file)?, word),
        ["find", file, word, at] => find_from(&engine, &load(file)?, word, parse_pos(at)?),
        ["complete", file, at] => list_completions(&mut engine, &load(file)?, parse_pos(at)?),
        ["complete", file, at, category, item] => {
            let mut buf = load(file)?;
            let line = complete(&mut engine, &mut buf, parse_pos(at)?, category, item)?;
            if inv.write {
                buf.save().map_err(|e| format!("{file}: {e}"))?;
            }
            Ok(line)
        }
        _ => Err(format!("unrecognized arguments: {}\n\n{USAGE}", words.join(" "))),
    }
}

/// What `name` means if it already has a suffix, else what `name_` offers.
fn suffixes_for(catalog: &SuffixCatalog, name: &str) -> String {
    if let Some(entry) = catalog.describe(name, &[]) {
        return format!("{name}: {}\n", entry.description);
    }
    let base = name.strip_suffix('_').unwrap_or(name);
    let trigger = format!("{base}_");
    let mut out = String::new();
    for category in catalog.resolve(base) {
        let _ = writeln!(out, "{}:", category.name);
        for entry in &category.entries {
            let _ = writeln!(
                out,
                "  {:<12} {}",
                category.replacement(&trigger, entry),
                entry.description
            );
        }
    }
    out
}

fn highlight(engine: &mut Engine, buf: &Buffer) -> String {
    engine.rescan_now(buf, &mut RenderQueue::new());
    let mut out = String::new();
    for span in engine.highlighter().spans() {
        let text = buf.get_range(span.range).unwrap_or_default();
        let _ = writeln!(out, "{}\t{}\t{text}", span.range, span.tag.name());
    }
    out
}

fn list_matches(engine: &Engine, buf: &Buffer, word: &str) -> Result<String, String> {
    let matches = find_all(buf, word, engine.options().case_mode());
    if matches.is_empty() {
        return Err(EditError::SearchNotFound(word.to_string()).to_string());
    }
    let mut out = String::new();
    for m in matches {
        let line = buf.line_text(m.start.line).unwrap_or_default();
        let _ = writeln!(out, "{}\t{line}", m.start);
    }
    Ok(out)
}

fn find_from(engine: &Engine, buf: &Buffer, word: &str, at: Position) -> Result<String, String> {
    let options = engine.options();
    search(buf, word, at, options.wrapscan, options.case_mode())
        .map(|m| format!("Found '{word}' at {}\n", m.start))
        .ok_or_else(|| EditError::SearchNotFound(word.to_string()).to_string())
}

fn list_completions(engine: &mut Engine, buf: &Buffer, at: Position) -> Result<String, String> {
    engine
        .on_trigger_key(buf, &mut RenderQueue::new(), at)
        .map_err(|e| e.to_string())?;
    let session = engine
        .session()
        .ok_or_else(|| EditError::NoSession.to_string())?;

    let mut out = String::new();
    for (ci, category) in session.categories().iter().enumerate() {
        let _ = writeln!(out, "{}. {}", ci + 1, category.name);
        for (ii, entry) in category.entries.iter().enumerate() {
            let _ = writeln!(
                out,
                "   {}. {:<10} {}",
                ii + 1,
                category.label(entry),
                entry.description
            );
        }
    }
    Ok(out)
}

/// Open completion at `at`, pick `(category, item)`, commit, and return the
/// rewritten line.
fn complete(
    engine: &mut Engine,
    buf: &mut Buffer,
    at: Position,
    category: &str,
    item: &str,
) -> Result<String, String> {
    let mut ui = RenderQueue::new();
    engine
        .on_trigger_key(&*buf, &mut ui, at)
        .map_err(|e| e.to_string())?;
    let (ci, ii) = match engine.session() {
        Some(session) => pick(session, category, item)?,
        None => return Err(EditError::NoSession.to_string()),
    };
    engine
        .on_select(&mut ui, ci, ii)
        .map_err(|e| e.to_string())?;
    let inserted = engine
        .on_commit(buf, &mut ui)
        .map_err(|e| e.to_string())?;
    let line = buf.line_text(inserted.start.line).unwrap_or_default();
    Ok(format!("{line}\n"))
}

/// Resolve a category and item given as 1-based numbers or by name.
fn pick(session: &CompletionSession, category: &str, item: &str) -> Result<(usize, usize), String> {
    let categories = session.categories();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_ref()).collect();
    let ci = choose(category, &names).ok_or_else(|| format!("no category '{category}'"))?;

    let cat = &categories[ci];
    let labels: Vec<String> = cat.entries.iter().map(|e| cat.label(e)).collect();
    let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
    let mnemonics: Vec<&str> = cat.entries.iter().map(|e| e.mnemonic.as_ref()).collect();
    let ii = choose(item, &labels)
        .or_else(|| choose(item, &mnemonics))
        .ok_or_else(|| format!("no item '{item}' in {}", cat.name))?;
    Ok((ci, ii))
}

fn choose(wanted: &str, names: &[&str]) -> Option<usize> {
    if let Ok(n) = wanted.parse::<usize>() {
        return (1..=names.len()).contains(&n).then(|| n - 1);
    }
    names.iter().position(|name| name.eq_ignore_ascii_case(wanted))
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DUSTED_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();

    let inv = parse_args(env::args().skip(1)).unwrap_or_else(|e| {
        eprintln!("dusted: {e}");
        process::exit(1);
    });

    debug!(?inv, "invocation");

    match run(&inv) {
        Ok(out) if out.ends_with('\n') => print!("{out}"),
        Ok(out) => println!("{out}"),
        Err(e) => {
            eprintln!("dusted: {e}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────
