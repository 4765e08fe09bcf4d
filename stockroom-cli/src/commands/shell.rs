//! Interactive numbered menu over one collection.
//!
//! Reads one line per prompt and re-prompts on bad numeric input. End of
//! input behaves like "save & exit". Store errors are printed and the menu
//! continues; a failed save is reported and the menu stays open so nothing
//! in memory is lost.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;
use stockroom_catalog::{Book, CatalogStore, Item, Record};

use crate::CliError;
use crate::display::{TableRow, capitalize, render_table};
use crate::storage::{Persisted, Storage};

use super::records::{StockUpdate, describe, locate};

/// Line-oriented prompting over any reader and writer.
pub(crate) struct Prompter<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Prompter<I, O> {
    pub(crate) fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub(crate) fn say(&mut self, msg: impl std::fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{msg}")
    }

    /// One trimmed line, or `None` at end of input.
    pub(crate) fn line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }

    /// A non-empty line.
    pub(crate) fn required(&mut self, prompt: &str) -> io::Result<Option<String>> {
        loop {
            match self.line(prompt)? {
                Some(s) if s.is_empty() => self.say("This field cannot be empty.")?,
                other => return Ok(other),
            }
        }
    }

    /// A value that parses as `T` and passes `accept`; re-prompts otherwise.
    pub(crate) fn number<T: FromStr>(
        &mut self,
        prompt: &str,
        hint: &str,
        accept: impl Fn(&T) -> bool,
    ) -> io::Result<Option<T>> {
        loop {
            let Some(raw) = self.line(prompt)? else {
                return Ok(None);
            };
            match raw.parse::<T>() {
                Ok(v) if accept(&v) => return Ok(Some(v)),
                _ => self.say(format!(
                    "{} Enter {hint}.",
                    "Invalid value.".if_supports_color(Stdout, |t| t.red())
                ))?,
            }
        }
    }

    pub(crate) fn quantity(&mut self, prompt: &str) -> io::Result<Option<u64>> {
        self.number(prompt, "a whole number >= 0", |_: &u64| true)
    }
}

/// Record kinds the shell can register interactively.
pub(crate) trait Prompted: Persisted + TableRow {
    /// Ask for every field of a new record. `None` at end of input.
    fn prompt_draft<I: BufRead, O: Write>(p: &mut Prompter<I, O>) -> io::Result<Option<Self>>;
}

impl Prompted for Book {
    fn prompt_draft<I: BufRead, O: Write>(p: &mut Prompter<I, O>) -> io::Result<Option<Self>> {
        let Some(name) = p.required("Title: ")? else {
            return Ok(None);
        };
        let Some(author) = p.line("Author: ")? else {
            return Ok(None);
        };
        let Some(publisher) = p.required("Publisher: ")? else {
            return Ok(None);
        };
        let Some(category) = p.line("Category: ")? else {
            return Ok(None);
        };
        let Some(pages) = p.number("Pages: ", "a whole number > 0", |n: &u32| *n > 0)? else {
            return Ok(None);
        };
        let Some(quantity) = p.quantity("Quantity: ")? else {
            return Ok(None);
        };
        Ok(Some(Book::new(
            name, category, author, publisher, pages, quantity,
        )))
    }
}

impl Prompted for Item {
    fn prompt_draft<I: BufRead, O: Write>(p: &mut Prompter<I, O>) -> io::Result<Option<Self>> {
        let Some(name) = p.required("Name: ")? else {
            return Ok(None);
        };
        let Some(category) = p.line("Category (optional): ")? else {
            return Ok(None);
        };
        let Some(price) = p.number("Unit price: ", "a price >= 0", |v: &f64| {
            v.is_finite() && *v >= 0.0
        })?
        else {
            return Ok(None);
        };
        let Some(quantity) = p.quantity("Quantity: ")? else {
            return Ok(None);
        };
        Ok(Some(Item::new(name, category, price, quantity)))
    }
}

enum Flow {
    Continue,
    Exit,
}

/// Run the menu on stdin/stdout.
pub(crate) fn run_shell<R: Prompted>(storage: &Storage) -> Result<(), CliError> {
    let stdin = io::stdin();
    run_shell_with::<R, _, _>(storage, stdin.lock(), io::stdout())
}

pub(crate) fn run_shell_with<R: Prompted, I: BufRead, O: Write>(
    storage: &Storage,
    input: I,
    output: O,
) -> Result<(), CliError> {
    let mut store = storage.open::<R>()?;
    let mut p = Prompter::new(input, output);
    let title = format!("{} manager", capitalize(R::KIND.noun));

    loop {
        p.say("")?;
        p.say(title.if_supports_color(Stdout, |t| t.bold()))?;
        p.say(format!("  1. Register {}", R::KIND.noun))?;
        p.say(format!("  2. List {}", R::KIND.plural))?;
        p.say(format!("  3. Filter {}", R::KIND.plural))?;
        p.say("  4. Update stock")?;
        p.say(format!("  5. Remove {}", R::KIND.noun))?;
        p.say("  6. Save & exit")?;

        let Some(choice) = p.line("Choose an option: ")? else {
            storage.save(&store)?;
            return Ok(());
        };
        let flow = match choice.as_str() {
            "1" => register(&mut store, &mut p)?,
            "2" => list(&store, &mut p)?,
            "3" => filter(&store, &mut p)?,
            "4" => stock(&mut store, &mut p)?,
            "5" => remove(&mut store, &mut p)?,
            "6" => match storage.save(&store) {
                Ok(()) => {
                    p.say(format!(
                        "Saved {} {}.",
                        store.len(),
                        R::KIND.plural
                    ))?;
                    return Ok(());
                }
                Err(e) => {
                    p.say(format!(
                        "{} {e}",
                        "Save failed:".if_supports_color(Stdout, |t| t.red())
                    ))?;
                    Flow::Continue
                }
            },
            _ => {
                p.say("Invalid option, choose 1-6.")?;
                Flow::Continue
            }
        };
        if let Flow::Exit = flow {
            storage.save(&store)?;
            return Ok(());
        }
    }
}

fn register<R: Prompted, I: BufRead, O: Write>(
    store: &mut CatalogStore<R>,
    p: &mut Prompter<I, O>,
) -> io::Result<Flow> {
    let Some(draft) = R::prompt_draft(p)? else {
        return Ok(Flow::Exit);
    };
    let name = draft.name().to_string();
    match store.upsert(draft) {
        Ok(outcome) if outcome.created => p.say(format!(
            "{} '{name}'.",
            "Registered".if_supports_color(Stdout, |t| t.green())
        ))?,
        Ok(outcome) => p.say(format!(
            "'{name}' already exists; stock is now {}.",
            outcome.quantity
        ))?,
        Err(e) => p.say(e)?,
    }
    Ok(Flow::Continue)
}

fn list<R: Prompted, I: BufRead, O: Write>(
    store: &CatalogStore<R>,
    p: &mut Prompter<I, O>,
) -> io::Result<Flow> {
    if store.is_empty() {
        p.say(format!("No {} yet.", R::KIND.plural))?;
        return Ok(Flow::Continue);
    }
    for line in render_table(store.records()) {
        p.say(line)?;
    }
    Ok(Flow::Continue)
}

fn filter<R: Prompted, I: BufRead, O: Write>(
    store: &CatalogStore<R>,
    p: &mut Prompter<I, O>,
) -> io::Result<Flow> {
    for (i, field) in R::SEARCH_FIELDS.iter().enumerate() {
        p.say(format!("  {}. By {field}", i + 1))?;
    }
    let fields = R::SEARCH_FIELDS.len();
    let Some(pick) = p.number("Filter by: ", &format!("a number from 1 to {fields}"), |n: &usize| {
        (1..=fields).contains(n)
    })?
    else {
        return Ok(Flow::Exit);
    };
    let field = R::SEARCH_FIELDS[pick - 1];
    let Some(term) = p.line("Search for: ")? else {
        return Ok(Flow::Exit);
    };

    let hits: Vec<&R> = store.filter(field, &term).map(|(_, r)| r).collect();
    if hits.is_empty() {
        p.say(format!("No {} match.", R::KIND.plural))?;
    } else {
        for line in render_table(hits) {
            p.say(line)?;
        }
    }
    Ok(Flow::Continue)
}

/// Ask for the exact identity of a record: name, plus publisher for books.
fn ask_identity<R: Prompted, I: BufRead, O: Write>(
    p: &mut Prompter<I, O>,
) -> io::Result<Option<(String, Option<String>)>> {
    let Some(name) = p.required("Exact name: ")? else {
        return Ok(None);
    };
    if !R::NEEDS_PUBLISHER {
        return Ok(Some((name, None)));
    }
    let Some(publisher) = p.required("Exact publisher: ")? else {
        return Ok(None);
    };
    Ok(Some((name, Some(publisher))))
}

fn stock<R: Prompted, I: BufRead, O: Write>(
    store: &mut CatalogStore<R>,
    p: &mut Prompter<I, O>,
) -> io::Result<Flow> {
    let Some((name, publisher)) = ask_identity::<R, _, _>(p)? else {
        return Ok(Flow::Exit);
    };
    let id = match locate(store, &name, publisher.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            p.say(e)?;
            return Ok(Flow::Continue);
        }
    };
    let current = store.get(id).map_or(0, |r| r.quantity());
    p.say(format!("Current stock: {current}"))?;
    p.say("  1. Set exact stock")?;
    p.say("  2. Add or take out units")?;
    let Some(mode) = p.number("Option: ", "1 or 2", |n: &u8| matches!(n, 1 | 2))? else {
        return Ok(Flow::Exit);
    };
    let Some(value) = p.number("Units: ", "a whole number", |_: &i64| true)? else {
        return Ok(Flow::Exit);
    };
    let update = if mode == 1 {
        StockUpdate::Set(value)
    } else {
        StockUpdate::Add(value)
    };

    match update.apply(store, id) {
        Ok(after) => p.say(format!(
            "Stock of {} is now {after}.",
            describe(&name, publisher.as_deref())
        ))?,
        Err(e) => p.say(format!(
            "{} {e}",
            "Rejected:".if_supports_color(Stdout, |t| t.red())
        ))?,
    }
    Ok(Flow::Continue)
}

fn remove<R: Prompted, I: BufRead, O: Write>(
    store: &mut CatalogStore<R>,
    p: &mut Prompter<I, O>,
) -> io::Result<Flow> {
    let Some((name, publisher)) = ask_identity::<R, _, _>(p)? else {
        return Ok(Flow::Exit);
    };
    let id = match locate(store, &name, publisher.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            p.say(e)?;
            return Ok(Flow::Continue);
        }
    };
    for line in render_table(store.get(id)) {
        p.say(line)?;
    }
    let Some(answer) = p.line("Remove this record? [y/N] ")? else {
        return Ok(Flow::Exit);
    };
    if !answer.eq_ignore_ascii_case("y") {
        p.say("Kept.")?;
        return Ok(Flow::Continue);
    }
    match store.remove(id) {
        Ok(removed) => p.say(format!("Removed '{}'.", removed.name()))?,
        Err(e) => p.say(e)?,
    }
    Ok(Flow::Continue)
}
