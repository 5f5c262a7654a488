use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use log::error;
use mp4walk::{BoxRef, FourCC, parse_file, to_json_tree};

#[derive(Parser, Debug)]
#[command(version, about = "Dump the box tree of an MP4/ISOBMFF file")]
struct Args {
    /// MP4/ISOBMFF file path
    path: String,

    /// Print every line of each box's detail
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    /// Do not print ctts details (they can run to one line per sample)
    #[arg(long, action = ArgAction::SetTrue)]
    hide_ctts: bool,

    /// Limit recursion depth
    #[arg(long, default_value_t = 64)]
    max_depth: usize,

    /// Emit JSON instead of the indented tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if is_fatal(&e) => e.exit(),
        Err(e) => {
            // usage, help and version all end successfully
            e.print()?;
            return Ok(());
        }
    };

    // An unreadable file is reported but still prints an empty tree.
    let boxes = parse_file(&args.path).unwrap_or_else(|e| {
        error!("{}: {}", args.path, e);
        Vec::new()
    });

    if args.json {
        println!("{}", serde_json::to_string_pretty(&to_json_tree(&boxes))?);
        return Ok(());
    }

    print_boxes(&boxes, &args, 0);
    Ok(())
}

fn print_boxes(boxes: &[BoxRef], args: &Args, depth: usize) {
    for b in boxes {
        let indent = " ".repeat(depth * 4);
        let detail = if args.hide_ctts && b.typ() == FourCC(*b"ctts") {
            String::new()
        } else {
            shorten(b.detail(), args.verbose)
        };
        if detail.is_empty() {
            println!("{indent}type {}, offset {}, size {}", b.typ(), b.offset(), b.size());
        } else {
            println!("{indent}type {}, offset {}, size {}, {}", b.typ(), b.offset(), b.size(), detail);
        }
        if b.has_children() && depth < args.max_depth {
            print_boxes(b.children(), args, depth + 1);
        }
    }
}

/// Only a missing file argument is a failing exit.
fn is_fatal(e: &clap::Error) -> bool {
    e.kind() == ErrorKind::MissingRequiredArgument
}

/// Keep the first two lines of a long detail unless verbose.
fn shorten(detail: String, verbose: bool) -> String {
    if verbose {
        return detail;
    }
    match detail.match_indices('\n').nth(1) {
        Some((i, _)) => format!("{} ...", &detail[..i]),
        None => detail,
    }
}
