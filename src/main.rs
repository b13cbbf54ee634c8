use std::fs;

use clap::Parser;

/// numera is a small expression language with exact rational arithmetic,
/// user-declared functions, and LaTeX rendering.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells numera to look at a file instead of an inline script.
    #[arg(short, long)]
    file: bool,

    /// Print the LaTeX rendering of the computed result.
    #[arg(short, long)]
    latex: bool,

    /// Print the plain-text rendering of the parse instead of evaluating.
    #[arg(short, long)]
    text: bool,

    /// Print the parsed tree for debugging.
    #[arg(long)]
    tree: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    if args.tree {
        println!("{:#?}", numera::parse(&script));
        return;
    }
    if args.text {
        println!("{}", numera::stringify(&script));
        return;
    }
    if args.latex {
        println!("{}", numera::compute(&script));
        return;
    }

    let result = numera::interpret(&script);
    if let numera::ast::Node::Error(message) = &result {
        eprintln!("{message}");
        std::process::exit(1);
    }
    let mut renderer = numera::interpreter::render::ToString;
    println!("{}", result.accept(&mut renderer));
}
