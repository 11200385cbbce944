use std::io::Read;

use lok_solver::parse::parse;
use lok_solver::search::{solve, SolveOptions};

fn usage() -> ! {
    eprintln!(
        "Usage: lok [--limit N | --all] [--json] [puzzle-file]\n\n\
         Reads the puzzle from puzzle-file, or stdin if omitted.\n\
         One character per tile, spaces for holes, '_' for empty tiles.\n\
           --limit N   stop after N solutions (default 1)\n\
           --all       search the whole bounded tree\n\
           --json      print the report as JSON"
    );
    std::process::exit(2);
}

fn main() {
    let mut limit: Option<usize> = Some(1);
    let mut json = false;
    let mut path: Option<String> = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--limit" => {
                let Some(n) = args.next().and_then(|v| v.parse().ok()) else {
                    usage();
                };
                limit = Some(n);
            }
            "--all" => limit = None,
            "--json" => json = true,
            "--help" | "-h" => usage(),
            _ if arg.starts_with('-') => usage(),
            _ if path.is_none() => path = Some(arg),
            _ => usage(),
        }
    }

    let input = match &path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Failed to read {p}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            let mut buf = String::new();
            if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
                eprintln!("Failed to read stdin: {e}");
                std::process::exit(1);
            }
            buf
        }
    };

    let mut grid = match parse(&input) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("Parse error: {e}");
            std::process::exit(1);
        }
    };

    let report = solve(&mut grid, &SolveOptions { solution_limit: limit });

    if json {
        println!("{}", serde_json::to_string_pretty(&report).unwrap());
        return;
    }

    print!("{grid}");
    println!();
    println!("explored states: {}", report.explored_states);
    println!("solutions: {}", report.solutions.len());
    for (i, solution) in report.solutions.iter().enumerate() {
        println!("  #{}:", i + 1);
        for step in &solution.steps {
            println!("    {step}");
        }
    }
}
