use std::{collections::HashSet, fmt, mem};

#[cfg(not(test))]
use proc_macro::{Delimiter, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

pub(crate) fn parse(ts: TokenStream) -> Result<ast::Decls> {
    let mut p = Parser::new(ts);
    decls(&mut p)
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

fn decls(p: &mut Parser) -> Result<ast::Decls> {
    let mut items = Vec::new();
    while !p.end() {
        let doc = opt_doc(p)?;
        let mut item = item(p)?;
        item.doc = doc;
        items.push(item);
    }
    Ok(ast::Decls { items })
}

fn item(p: &mut Parser) -> Result<ast::Item> {
    let kind = if p.eat_keyword("flags") {
        ast::ItemKind::Flags
    } else if p.eat_keyword("args") {
        ast::ItemKind::Args
    } else {
        let next = p.ts.last().map(|it| it.to_string()).unwrap_or_default();
        bail!("expected `flags` or `args`, got `{next}`")
    };

    let name = p.expect_name()?;
    if name.starts_with('-') {
        bail!("type name can't begin with `-`: `{name}`");
    }
    let mut res = ast::Item {
        kind,
        name,
        doc: ast::Doc::default(),
        flags: Vec::new(),
        args: Vec::new(),
    };

    p.enter_delim(Delimiter::Brace)?;
    while !p.end() {
        let doc = opt_doc(p)?;
        match kind {
            ast::ItemKind::Flags => {
                let mut flag = flag(p)?;
                flag.doc = doc;
                res.flags.push(flag);
            }
            ast::ItemKind::Args => {
                let mut arg = arg(p)?;
                arg.doc = doc;
                res.args.push(arg);
            }
        }
    }
    p.exit_delim()?;

    check_item(&res)?;
    Ok(res)
}

fn check_item(item: &ast::Item) -> Result<()> {
    let mut shorts = HashSet::new();
    for flag in &item.flags {
        if let Some(short) = &flag.short {
            if !shorts.insert(short.as_str()) {
                bail!("duplicate short flag in `{}`: `-{short}`", item.name);
            }
        }
    }

    let last = item.args.len().saturating_sub(1);
    for (idx, arg) in item.args.iter().enumerate() {
        if arg.arity != ast::Arity::Required && idx != last {
            bail!("only the last argument can be repeated: `{}`", arg.val.name);
        }
    }
    Ok(())
}

fn flag(p: &mut Parser) -> Result<ast::Flag> {
    if p.at_keyword("required") || p.at_keyword("repeated") {
        bail!("flags are scalar, only `optional` is supported")
    }
    p.expect_keyword("optional")?;

    let mut short = None;
    let mut name = flag_name(p)?;
    if !name.starts_with("--") {
        if name.chars().count() != 2 {
            bail!("short flag must be a single character: `{name}`");
        }
        short = Some(name);
        if !p.eat_punct(',') {
            bail!("long option is required for `{}`", short.unwrap_or_default());
        }
        name = flag_name(p)?;
        if !name.starts_with("--") {
            bail!("long name must begin with `--`: `{name}`");
        }
    }

    let val = opt_val(p)?;
    Ok(ast::Flag {
        name: name[2..].to_string(),
        short: short.map(|it| it[1..].to_string()),
        doc: ast::Doc::default(),
        val,
    })
}

fn arg(p: &mut Parser) -> Result<ast::Arg> {
    let arity = arity(p)?;
    let val = match opt_val(p)? {
        Some(it) => it,
        None => bail!("expected `name: Type` after the arity"),
    };
    if arity != ast::Arity::Required && val.ty != ast::Ty::String {
        bail!("repeated argument `{}` must be a `String`", val.name);
    }
    Ok(ast::Arg { arity, doc: ast::Doc::default(), val })
}

fn opt_val(p: &mut Parser) -> Result<Option<ast::Val>, Error> {
    if !p.lookahead_punct(':', 1) {
        return Ok(None);
    }

    let name = p.expect_name()?;
    p.expect_punct(':')?;
    let ty = ty(p)?;
    let res = ast::Val { name, ty };
    Ok(Some(res))
}

fn arity(p: &mut Parser) -> Result<ast::Arity> {
    if p.eat_keyword("required") {
        if p.eat_keyword("repeated") {
            return Ok(ast::Arity::RequiredRepeated);
        }
        return Ok(ast::Arity::Required);
    }
    if p.eat_keyword("repeated") {
        return Ok(ast::Arity::Repeated);
    }
    if let Some(name) = p.eat_name() {
        bail!("expected one of `required`, `repeated`, got `{name}`")
    }
    bail!("expected one of `required`, `repeated`, got {:?}", p.ts.pop().map(|it| it.to_string()))
}

fn ty(p: &mut Parser) -> Result<ast::Ty> {
    let name = p.expect_name()?;
    let res = match name.as_str() {
        "String" => ast::Ty::String,
        "i64" => ast::Ty::I64,
        "u64" => ast::Ty::U64,
        "f64" => ast::Ty::F64,
        "bool" => bail!("`bool` values are spelled as flags without a value"),
        _ => bail!("unsupported type `{name}`, expected one of `String`, `i64`, `u64`, `f64`"),
    };
    Ok(res)
}

fn opt_doc(p: &mut Parser) -> Result<ast::Doc> {
    let mut res = ast::Doc::default();
    while p.eat_punct('#') {
        p.enter_delim(Delimiter::Bracket)?;
        p.expect_keyword("doc")?;
        p.expect_punct('=')?;
        let mut line = p.expect_string()?;
        if let Some(suf) = line.strip_prefix("\" ") {
            line = format!("\"{suf}");
        }
        res.lines.push(line);
        p.exit_delim()?;
    }
    Ok(res)
}

fn flag_name(p: &mut Parser) -> Result<String> {
    let name = p.expect_name()?;
    if !name.starts_with('-') {
        bail!("flag name should begin with `-`: `{name}`");
    }
    Ok(name)
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            let next = self.ts.last().map(|it| it.to_string()).unwrap_or_default();
            bail!("unexpected `{next}`")
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{kw}`")
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_name(&mut self) -> Result<String> {
        self.eat_name().ok_or_else(|| {
            let next = self.ts.pop().map(|it| it.to_string()).unwrap_or_default();
            format_err!("expected a name, got: `{next}`")
        })
    }
    fn eat_name(&mut self) -> Option<String> {
        let mut buf = String::new();
        let mut prev_ident = false;
        loop {
            match self.ts.last() {
                Some(TokenTree::Punct(p)) if p.as_char() == '-' => {
                    prev_ident = false;
                    buf.push('-');
                }
                Some(TokenTree::Ident(ident)) if !prev_ident => {
                    prev_ident = true;
                    buf.push_str(&ident.to_string());
                }
                _ => break,
            }
            self.ts.pop();
        }
        if buf.is_empty() {
            None
        } else {
            Some(buf)
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{punct}`")
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) if p.as_char() == punct => {
                self.ts.pop();
                true
            }
            _ => false,
        }
    }
    fn lookahead_punct(&mut self, punct: char, n: usize) -> bool {
        match self.ts.iter().rev().nth(n) {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    /// Returns the literal as written, quotes and escapes included.
    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) if lit.to_string().starts_with('"') => Ok(lit.to_string()),
            _ => bail!("expected a string"),
        }
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::Parenthesis => "(",
        Delimiter::None => "group",
    }
}
