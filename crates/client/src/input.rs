//! Maps prompt lines onto session commands and local directives.

/// What one line of input asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive<'a> {
    /// A command name to hand to the session. Aliases expand to canonical
    /// names; anything unrecognized passes through verbatim so the session
    /// is the one that rejects it.
    Submit(&'a str),
    /// Redraw the map without spending a turn.
    Look,
    Help,
    Quit,
    Empty,
}

pub const HELP: &str = "\
move:  w/a/s/d, vi keys (h/j/k/l), or up/down/left/right
       full command names work too: MoveUp, MoveDown, MoveLeft, MoveRight
wait:  . or wait
map:   m or look
quit:  q or quit";

/// Aliases are matched case-insensitively; everything else keeps its exact
/// spelling, since command names are case-sensitive.
pub fn parse_line(line: &str) -> Directive<'_> {
    let token = line.trim();
    if token.is_empty() {
        return Directive::Empty;
    }
    match token.to_ascii_lowercase().as_str() {
        "w" | "k" | "up" | "north" => Directive::Submit("MoveUp"),
        "s" | "j" | "down" | "south" => Directive::Submit("MoveDown"),
        "a" | "h" | "left" | "west" => Directive::Submit("MoveLeft"),
        "d" | "l" | "right" | "east" => Directive::Submit("MoveRight"),
        "." | "z" | "wait" | "rest" => Directive::Submit("Wait"),
        "m" | "map" | "look" => Directive::Look,
        "?" | "help" => Directive::Help,
        "q" | "quit" | "exit" => Directive::Quit,
        _ => Directive::Submit(token),
    }
}
