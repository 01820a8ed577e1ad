use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};

use crate::scryfall_client::CardSource;
use crate::session::Session;

pub struct Repl<S: CardSource, R: BufRead, W: Write> {
    session: Session<S>,
    input: R,
    output: W,
}

impl<S: CardSource, R: BufRead, W: Write> Repl<S, R, W> {
    pub fn new(session: Session<S>, input: R, output: W) -> Self {
        Repl {
            session,
            input,
            output,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn Error>> {
        writeln!(self.output, "Type 'help' for a list of commands")?;
        loop {
            let line = match self.readline("> ")? {
                Some(line) => line,
                None => break,
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match self.respond(line).await {
                Ok(quit) => {
                    if quit {
                        break;
                    }
                }
                Err(err) => {
                    writeln!(self.output, "error: {err}")?;
                }
            }
            self.output.flush()?;
        }

        Ok(())
    }

    /// `None` once the input is exhausted.
    fn readline(&mut self, prompt: &str) -> Result<Option<String>, Box<dyn Error>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buffer = String::new();
        if self.input.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        Ok(Some(buffer))
    }

    fn confirm(&mut self, question: &str) -> Result<bool, Box<dyn Error>> {
        let answer = self.readline(&format!("{question} [y/N] "))?;
        Ok(matches!(
            answer.as_deref().map(str::trim),
            Some("y") | Some("Y") | Some("yes")
        ))
    }

    async fn respond(&mut self, line: &str) -> Result<bool, Box<dyn Error>> {
        let args = shlex::split(line).ok_or("Invalid quoting")?;
        let matches = match cli().try_get_matches_from(args) {
            Ok(matches) => matches,
            Err(err) => {
                write!(self.output, "{}", err.render())?;
                return Ok(false);
            }
        };

        match matches.subcommand() {
            Some(("search", matches)) => {
                let query = matches
                    .get_many::<String>("query")
                    .unwrap_or_default()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(" ");
                let lines = self.session.search(&query).await?;
                for line in lines {
                    writeln!(self.output, "{line}")?;
                }
                writeln!(
                    self.output,
                    "{} printings found",
                    self.session.last_results().len()
                )?;
            }
            Some(("show", matches)) => {
                let number = number_arg(matches);
                let path = self.session.select(number).await?;
                let card = self.session.selected(number)?;
                writeln!(self.output, "Image of {}: {}", card, path.display())?;
            }
            Some(("add", matches)) => {
                let number = number_arg(matches);
                let selected = self.session.selected(number)?;
                let card = selected.to_string();
                let owned = self
                    .session
                    .store()
                    .get(&selected.set, &selected.name)
                    .map(|entry| entry.count)
                    .unwrap_or_default();
                let question = if owned > 0 {
                    format!("Add {card} to the collection? You have {owned} already.")
                } else {
                    format!("Add {card} to the collection?")
                };
                if !matches.get_flag("yes") && !self.confirm(&question)? {
                    writeln!(self.output, "Not added")?;
                    return Ok(false);
                }
                let entry = self.session.add(number)?;
                writeln!(self.output, "Added {entry}")?;
            }
            Some(("list", _matches)) => {
                let store = self.session.store();
                if store.is_empty() {
                    writeln!(self.output, "The collection is empty")?;
                }
                for line in self.session.list() {
                    writeln!(self.output, "{line}")?;
                }
                writeln!(
                    self.output,
                    "{} entries, {} cards",
                    store.len(),
                    store.total_cards()
                )?;
            }
            Some(("view", matches)) => {
                let path = self.session.view(number_arg(matches)).await?;
                writeln!(self.output, "Image: {}", path.display())?;
            }
            Some(("save", matches)) => {
                let path = matches.get_one::<PathBuf>("path");
                let saved_to = self.session.save(path.map(PathBuf::as_path))?;
                writeln!(self.output, "Saved collection to {}", saved_to.display())?;
            }
            Some(("load", matches)) => {
                let path = matches.get_one::<PathBuf>("path");
                let loaded_from = self.session.load(path.map(PathBuf::as_path))?;
                writeln!(
                    self.output,
                    "Loaded {} entries from {}",
                    self.session.store().len(),
                    loaded_from.display()
                )?;
            }
            Some(("quit", _matches)) => {
                writeln!(self.output, "Exiting ...")?;
                self.output.flush()?;
                return Ok(true);
            }
            Some((name, _matches)) => unreachable!("unknown command {name}"),
            None => unreachable!("subcommand required"),
        }

        Ok(false)
    }
}

fn number_arg(matches: &ArgMatches) -> usize {
    matches.get_one::<usize>("number").copied().unwrap_or_default()
}

fn cli() -> Command {
    // strip out usage
    const PARSER_TEMPLATE: &str = "\
        {all-args}
    ";
    // strip out name/version
    const COMMAND_TEMPLATE: &str = "\
        {about-with-newline}\n\
        {usage-heading}\n    {usage}\n\
        \n\
        {all-args}{after-help}\
    ";

    let number = Arg::new("number")
        .help("Card number as listed")
        .required(true)
        .value_parser(value_parser!(usize));
    let path = Arg::new("path")
        .help("Collection file, defaults to COLLECTION_PATH")
        .value_parser(value_parser!(PathBuf));

    Command::new("repl")
        .multicall(true)
        .arg_required_else_help(true)
        .subcommand_required(true)
        .subcommand_value_name("COMMAND")
        .subcommand_help_heading("COMMANDS")
        .help_template(PARSER_TEMPLATE)
        .subcommand(
            Command::new("search")
                .about("Search Scryfall for every printing matching a query")
                .arg(
                    Arg::new("query")
                        .required(true)
                        .num_args(1..)
                        .trailing_var_arg(true)
                        .allow_hyphen_values(true),
                )
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("show")
                .alias("select")
                .about("Save a preview image of a search result")
                .arg(number.clone())
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("add")
                .about("Add a search result to the collection")
                .arg(number.clone())
                .arg(
                    Arg::new("yes")
                        .short('y')
                        .long("yes")
                        .help("Do not ask for confirmation")
                        .action(ArgAction::SetTrue),
                )
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("list")
                .alias("ls")
                .about("List the collection")
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("view")
                .about("Save a preview image of a collection entry")
                .arg(number)
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("save")
                .about("Save the collection")
                .arg(path.clone())
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("load")
                .about("Replace the collection with a saved one")
                .arg(path)
                .help_template(COMMAND_TEMPLATE),
        )
        .subcommand(
            Command::new("quit")
                .alias("exit")
                .alias("q")
                .alias(":q")
                .about("Quit the REPL")
                .help_template(COMMAND_TEMPLATE),
        )
}
