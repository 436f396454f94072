//! End-to-end pipeline: two generator patterns in, common words out.
//!
//! The left pattern is closed under the group relations before the
//! intersection, so that the right pattern may spell the same elements
//! differently.
//!
//! ```text
//! cargo run --example pipeline -- "XN" "NX"
//! cargo run --example pipeline -- "YYY" "N(XX)*" --max-len 6
//! ```

use std::time::Instant;

use clap::Parser;
use log::info;

use sl2z_automata::automaton::Automaton;
use sl2z_automata::canonical::GroupAlphabet;

#[derive(Debug, Parser)]
#[command(author, version, about = "Intersect two generator patterns up to the group relations")]
struct Cli {
    /// Pattern to canonicalize.
    #[arg(value_name = "REGEX")]
    left: String,

    /// Pattern to intersect with.
    #[arg(value_name = "REGEX")]
    right: String,

    /// Order-2 generator.
    #[arg(long, value_name = "CHAR", default_value = "X")]
    x: char,

    /// Order-3 generator.
    #[arg(long, value_name = "CHAR", default_value = "Y")]
    y: char,

    /// Central sign flip.
    #[arg(long, value_name = "CHAR", default_value = "N")]
    n: char,

    /// Maximum length of enumerated words.
    #[arg(long, value_name = "INT", default_value = "8")]
    max_len: usize,

    /// Log level.
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    log_level: simplelog::LevelFilter,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        args.log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    println!("args = {:?}", args);
    let time_total = Instant::now();

    let group = GroupAlphabet::new(args.x, args.y, args.n);

    let mut left = Automaton::from_regex(group.symbols(), &args.left)?.to_dfa();
    info!("left: {} states, {} transitions", left.num_states(), left.num_transitions());
    let added = left.canonicalize(&group)?;
    info!("left: {} transitions derived from the relations", added);
    let left = left.to_dfa().minimize()?;
    println!("left (canonical, minimal):\n{}", left);

    let right = Automaton::from_regex(group.symbols(), &args.right)?.to_dfa().minimize()?;
    println!("right (minimal):\n{}", right);

    let both = left.intersect(&right)?.minimize()?;
    println!("intersection:\n{}", both);

    match both.shortest_word() {
        Some(word) => println!("Solution exists, shortest: {:?}", word),
        None => println!("No solution"),
    }
    for len in 0..=args.max_len {
        println!("{} word(s) of length {}", both.count_words(len)?, len);
    }
    for word in both.words(args.max_len) {
        println!("  {:?}", word);
    }

    println!("All done in {:.3} s", time_total.elapsed().as_secs_f64());
    Ok(())
}
