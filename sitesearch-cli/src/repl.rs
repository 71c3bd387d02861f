//! Interactive search session
//!
//! Reads one command per line from stdin. Plain text is searched; lines
//! starting with `:` are commands.

use anyhow::Result;
use sitesearch::{CategoryFilter, SearchOutcome, Session, SuggestionSink};
use std::io::{BufRead, BufReader, Write};

const HELP: &str = "\
Commands:
  <query>          search
  :filter <name>   show all, title, meta or content results
  :suggest <text>  suggest completions
  :pick <text>     search for a suggestion
  :clear           reset query, results and filter
  :quit            exit";

/// Prints suggestions to stdout
struct TerminalSuggestions;

impl SuggestionSink for TerminalSuggestions {
    fn show(&mut self, suggestions: &[String]) {
        for s in suggestions {
            println!("  > {}", s);
        }
    }

    fn hide(&mut self) {}
}

/// Run the session until EOF or `:quit`
pub fn run(mut session: Session) -> Result<()> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut sink = TerminalSuggestions;

    println!(
        "{} pages loaded. Type a query, or :help for commands.",
        session.corpus().len()
    );

    loop {
        print!("search> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            tracing::debug!("EOF received, leaving session");
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, arg) = match line.strip_prefix(':') {
            Some(rest) => {
                let mut parts = rest.splitn(2, char::is_whitespace);
                let command = parts.next().unwrap_or_default();
                (Some(command), parts.next().unwrap_or_default().trim())
            }
            None => (None, line),
        };

        match command {
            None => {
                let outcome = session.search(arg);
                report(&session, outcome);
            }
            Some("filter") => match arg.parse::<CategoryFilter>() {
                Ok(filter) => {
                    session.set_filter(filter);
                    crate::print_results(&session);
                }
                Err(e) => println!("{}", e),
            },
            Some("suggest") => session.input(arg, &mut sink),
            Some("pick") => {
                let outcome = session.select_suggestion(arg, &mut sink);
                report(&session, outcome);
            }
            Some("clear") => {
                session.clear(&mut sink);
                println!("Cleared.");
            }
            Some("quit") | Some("q") => break,
            Some("help") => println!("{}", HELP),
            Some(other) => println!("Unknown command :{} (try :help)", other),
        }
    }

    Ok(())
}

fn report(session: &Session, outcome: SearchOutcome) {
    match outcome {
        SearchOutcome::Ignored => {}
        SearchOutcome::NoResults => println!("No results found for '{}'", session.query()),
        SearchOutcome::Results { .. } => crate::print_results(session),
    }
}
