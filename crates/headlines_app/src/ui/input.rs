use headlines_core::Category;

/// A parsed line of user input. Numbers are 1-based positions as printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Refresh,
    More,
    Category(Category),
    ListCategories,
    Save(usize),
    /// Position in the saved list.
    Unsave(usize),
    Toggle(usize),
    Saved,
    Open(usize),
    /// Position in the saved list.
    OpenSaved(usize),
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("too many arguments for `{verb}`"));
    }

    let command = match verb.to_ascii_lowercase().as_str() {
        "r" | "refresh" => no_arg(verb, arg, Command::Refresh)?,
        "m" | "more" => no_arg(verb, arg, Command::More)?,
        "categories" => no_arg(verb, arg, Command::ListCategories)?,
        "saved" => no_arg(verb, arg, Command::Saved)?,
        "h" | "help" | "?" => no_arg(verb, arg, Command::Help)?,
        "q" | "quit" | "exit" => no_arg(verb, arg, Command::Quit)?,
        "c" | "category" => {
            let name = arg.ok_or_else(|| format!("`{verb}` needs a category name"))?;
            Command::Category(name.parse().map_err(|err| format!("{err}"))?)
        }
        "s" | "save" => Command::Save(number(verb, arg)?),
        "u" | "unsave" => Command::Unsave(number(verb, arg)?),
        "t" | "toggle" => Command::Toggle(number(verb, arg)?),
        "o" | "open" => Command::Open(number(verb, arg)?),
        "os" | "open-saved" => Command::OpenSaved(number(verb, arg)?),
        other => return Err(format!("unknown command `{other}` (try `help`)")),
    };
    Ok(Some(command))
}

fn no_arg(verb: &str, arg: Option<&str>, command: Command) -> Result<Command, String> {
    match arg {
        None => Ok(command),
        Some(_) => Err(format!("`{verb}` takes no arguments")),
    }
}

fn number(verb: &str, arg: Option<&str>) -> Result<usize, String> {
    let raw = arg.ok_or_else(|| format!("`{verb}` needs an article number"))?;
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(format!("`{raw}` is not an article number")),
    }
}
