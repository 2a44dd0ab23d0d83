//! Expression engine for selections and variables over tree columns.
//!
//! The grammar follows the `TTree::Draw` dialect used in analysis cuts:
//! arithmetic (`+ - * / %`), comparisons (`== != < <= > >=`), boolean
//! operators (`&& || !`), numeric and `true`/`false` literals, and a small set
//! of math functions, optionally spelled with a `TMath::` prefix.
//!
//! Identifiers may contain dots so that friend columns can be addressed as
//! `friend.column`. Truthiness is C-like: any non-zero value is true.

use crate::dataset::Dataset;
use crate::error::{Result, TreeError};

// ── AST ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Node {
    Number(f64),
    Column(usize),
    Neg(Box<Node>),
    Not(Box<Node>),
    Binary(BinOp, Box<Node>, Box<Node>),
    Call(Func, Vec<Node>),
}

#[derive(Debug, Clone, Copy)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy)]
enum Func {
    Abs,
    Sqrt,
    Log,
    Log10,
    Exp,
    Pow,
    Min,
    Max,
    Sin,
    Cos,
    Tan,
    Atan2,
    Floor,
    Ceil,
}

impl Func {
    fn lookup(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("TMath::").unwrap_or(name);
        let f = match bare.to_ascii_lowercase().as_str() {
            "abs" | "fabs" => Func::Abs,
            "sqrt" => Func::Sqrt,
            "log" => Func::Log,
            "log10" => Func::Log10,
            "exp" => Func::Exp,
            "pow" | "power" => Func::Pow,
            "min" => Func::Min,
            "max" => Func::Max,
            "sin" => Func::Sin,
            "cos" => Func::Cos,
            "tan" => Func::Tan,
            "atan2" => Func::Atan2,
            "floor" => Func::Floor,
            "ceil" => Func::Ceil,
            _ => return None,
        };
        Some(f)
    }

    fn arity(self) -> usize {
        match self {
            Func::Pow | Func::Min | Func::Max | Func::Atan2 => 2,
            _ => 1,
        }
    }
}

#[inline]
fn truth(v: f64) -> bool {
    v != 0.0
}

#[inline]
fn flag(b: bool) -> f64 {
    if b { 1.0 } else { 0.0 }
}

// ── Compiled expression ────────────────────────────────────────

/// A compiled expression ready for evaluation.
///
/// Identifiers are collected into [`CompiledExpr::columns`] in order of first
/// occurrence; evaluation receives values in that order.
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    source: String,
    root: Node,
    columns: Vec<String>,
}

impl CompiledExpr {
    /// Parse and compile an expression string.
    pub fn compile(input: &str) -> Result<Self> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(TreeError::Expression("empty expression".into()));
        }
        let mut parser = Parser { tokens: &tokens, pos: 0, columns: Vec::new() };
        let root = parser.parse_or()?;
        if let Some(tok) = parser.peek() {
            return Err(TreeError::Expression(format!(
                "unexpected token {tok:?} after expression '{input}'"
            )));
        }
        Ok(Self { source: input.trim().to_string(), root, columns: parser.columns })
    }

    /// Compile a selection; blank input means "every row".
    pub fn compile_selection(input: &str) -> Result<Option<Self>> {
        if input.trim().is_empty() { Ok(None) } else { Self::compile(input).map(Some) }
    }

    /// The trimmed source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Column names referenced by this expression.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Evaluate for a single row; `values` follows [`Self::columns`] order.
    pub fn eval_row(&self, values: &[f64]) -> f64 {
        eval(&self.root, values)
    }

    /// Evaluate for every row of `dataset`.
    pub fn eval_dataset(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        let cols: Vec<&[f64]> = self
            .columns
            .iter()
            .map(|name| {
                dataset.column(name).ok_or_else(|| TreeError::ColumnNotFound(name.clone()))
            })
            .collect::<Result<_>>()?;

        let n = dataset.entries() as usize;
        let mut row = vec![0.0f64; cols.len()];
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            for (slot, col) in row.iter_mut().zip(&cols) {
                *slot = col[i];
            }
            out.push(eval(&self.root, &row));
        }
        Ok(out)
    }
}

/// Split a `y:x` draw expression into `(y, x)`.
///
/// Only a single top-level colon separates axes; `::` and colons inside
/// parentheses are left alone. Returns `None` for one-dimensional input.
pub fn split_2d(varexp: &str) -> Option<(&str, &str)> {
    let bytes = varexp.as_bytes();
    let mut depth = 0i32;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => depth += 1,
            b')' => depth -= 1,
            b':' if i + 1 < bytes.len() && bytes[i + 1] == b':' => {
                i += 2;
                continue;
            }
            b':' if depth == 0 => {
                return Some((varexp[..i].trim(), varexp[i + 1..].trim()));
            }
            _ => {}
        }
        i += 1;
    }
    None
}

// ── Evaluation ─────────────────────────────────────────────────

fn eval(node: &Node, vals: &[f64]) -> f64 {
    match node {
        Node::Number(n) => *n,
        Node::Column(i) => vals[*i],
        Node::Neg(a) => -eval(a, vals),
        Node::Not(a) => flag(!truth(eval(a, vals))),
        Node::Binary(BinOp::And, a, b) => flag(truth(eval(a, vals)) && truth(eval(b, vals))),
        Node::Binary(BinOp::Or, a, b) => flag(truth(eval(a, vals)) || truth(eval(b, vals))),
        Node::Binary(op, a, b) => {
            let lhs = eval(a, vals);
            let rhs = eval(b, vals);
            match op {
                BinOp::Add => lhs + rhs,
                BinOp::Sub => lhs - rhs,
                BinOp::Mul => lhs * rhs,
                BinOp::Div => lhs / rhs,
                BinOp::Rem => lhs % rhs,
                BinOp::Eq => flag(lhs == rhs),
                BinOp::Ne => flag(lhs != rhs),
                BinOp::Lt => flag(lhs < rhs),
                BinOp::Le => flag(lhs <= rhs),
                BinOp::Gt => flag(lhs > rhs),
                BinOp::Ge => flag(lhs >= rhs),
                BinOp::And | BinOp::Or => unreachable!("short-circuit handled above"),
            }
        }
        Node::Call(f, args) => {
            let a = eval(&args[0], vals);
            match f {
                Func::Abs => a.abs(),
                Func::Sqrt => a.sqrt(),
                Func::Log => a.ln(),
                Func::Log10 => a.log10(),
                Func::Exp => a.exp(),
                Func::Sin => a.sin(),
                Func::Cos => a.cos(),
                Func::Tan => a.tan(),
                Func::Floor => a.floor(),
                Func::Ceil => a.ceil(),
                Func::Pow => a.powf(eval(&args[1], vals)),
                Func::Min => a.min(eval(&args[1], vals)),
                Func::Max => a.max(eval(&args[1], vals)),
                Func::Atan2 => a.atan2(eval(&args[1], vals)),
            }
        }
    }
}

// ── Tokenizer ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    LParen,
    RParen,
    Comma,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Not,
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }

        let next = chars.get(i + 1).copied();
        let two = match (c, next) {
            ('&', Some('&')) => Some(Token::And),
            ('|', Some('|')) => Some(Token::Or),
            ('=', Some('=')) => Some(Token::Eq),
            ('!', Some('=')) => Some(Token::Ne),
            ('<', Some('=')) => Some(Token::Le),
            ('>', Some('=')) => Some(Token::Ge),
            _ => None,
        };
        if let Some(t) = two {
            tokens.push(t);
            i += 2;
            continue;
        }

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '%' => Some(Token::Percent),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            ',' => Some(Token::Comma),
            '<' => Some(Token::Lt),
            '>' => Some(Token::Gt),
            '!' => Some(Token::Not),
            _ => None,
        };
        if let Some(t) = single {
            tokens.push(t);
            i += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = i;
            while i < chars.len() {
                let ch = chars[i];
                let exp_sign =
                    (ch == '+' || ch == '-') && i > start && matches!(chars[i - 1], 'e' | 'E');
                if ch.is_ascii_digit() || ch == '.' || ch == 'e' || ch == 'E' || exp_sign {
                    i += 1;
                } else {
                    break;
                }
            }
            let text: String = chars[start..i].iter().collect();
            let n: f64 = text
                .parse()
                .map_err(|_| TreeError::Expression(format!("invalid number: '{text}'")))?;
            tokens.push(Token::Num(n));
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            i += 1;
            loop {
                match chars.get(i).copied() {
                    Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => i += 1,
                    Some(':') if chars.get(i + 1) == Some(&':') && ident_start(chars.get(i + 2)) => {
                        i += 2;
                    }
                    Some('.') if ident_start(chars.get(i + 1)) => i += 1,
                    _ => break,
                }
            }
            let word: String = chars[start..i].iter().collect();
            match word.as_str() {
                "true" => tokens.push(Token::Num(1.0)),
                "false" => tokens.push(Token::Num(0.0)),
                _ => tokens.push(Token::Ident(word)),
            }
            continue;
        }

        return Err(TreeError::Expression(format!(
            "unexpected character '{c}' at offset {i} in '{input}'"
        )));
    }

    Ok(tokens)
}

fn ident_start(c: Option<&char>) -> bool {
    matches!(c, Some(ch) if ch.is_ascii_alphabetic() || *ch == '_')
}

// ── Parser (recursive descent) ─────────────────────────────────

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    columns: Vec<String>,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Token> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    fn expect(&mut self, expected: &Token) -> Result<()> {
        match self.bump() {
            Some(ref t) if t == expected => Ok(()),
            other => Err(TreeError::Expression(format!("expected {expected:?}, got {other:?}"))),
        }
    }

    fn column(&mut self, name: String) -> usize {
        match self.columns.iter().position(|c| *c == name) {
            Some(i) => i,
            None => {
                self.columns.push(name);
                self.columns.len() - 1
            }
        }
    }

    fn binary_chain(
        &mut self,
        ops: &[(Token, BinOp)],
        next: fn(&mut Self) -> Result<Node>,
    ) -> Result<Node> {
        let mut lhs = next(self)?;
        'outer: loop {
            for (tok, op) in ops {
                if self.peek() == Some(tok) {
                    self.pos += 1;
                    let rhs = next(self)?;
                    lhs = Node::Binary(*op, Box::new(lhs), Box::new(rhs));
                    continue 'outer;
                }
            }
            return Ok(lhs);
        }
    }

    fn parse_or(&mut self) -> Result<Node> {
        self.binary_chain(&[(Token::Or, BinOp::Or)], Self::parse_and)
    }

    fn parse_and(&mut self) -> Result<Node> {
        self.binary_chain(&[(Token::And, BinOp::And)], Self::parse_cmp)
    }

    fn parse_cmp(&mut self) -> Result<Node> {
        let lhs = self.parse_add()?;
        let op = match self.peek() {
            Some(Token::Eq) => BinOp::Eq,
            Some(Token::Ne) => BinOp::Ne,
            Some(Token::Lt) => BinOp::Lt,
            Some(Token::Le) => BinOp::Le,
            Some(Token::Gt) => BinOp::Gt,
            Some(Token::Ge) => BinOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.parse_add()?;
        Ok(Node::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn parse_add(&mut self) -> Result<Node> {
        self.binary_chain(&[(Token::Plus, BinOp::Add), (Token::Minus, BinOp::Sub)], Self::parse_mul)
    }

    fn parse_mul(&mut self) -> Result<Node> {
        self.binary_chain(
            &[(Token::Star, BinOp::Mul), (Token::Slash, BinOp::Div), (Token::Percent, BinOp::Rem)],
            Self::parse_unary,
        )
    }

    fn parse_unary(&mut self) -> Result<Node> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Node::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            Some(Token::Not) => {
                self.pos += 1;
                Ok(Node::Not(Box::new(self.parse_unary()?)))
            }
            _ => self.parse_atom(),
        }
    }

    fn parse_atom(&mut self) -> Result<Node> {
        match self.bump() {
            Some(Token::Num(n)) => Ok(Node::Number(n)),
            Some(Token::LParen) => {
                let e = self.parse_or()?;
                self.expect(&Token::RParen)?;
                Ok(e)
            }
            Some(Token::Ident(name)) if self.peek() == Some(&Token::LParen) => {
                self.pos += 1;
                let func = Func::lookup(&name)
                    .ok_or_else(|| TreeError::Expression(format!("unknown function: '{name}'")))?;
                let mut args = vec![self.parse_or()?];
                while self.peek() == Some(&Token::Comma) {
                    self.pos += 1;
                    args.push(self.parse_or()?);
                }
                self.expect(&Token::RParen)?;
                if args.len() != func.arity() {
                    return Err(TreeError::Expression(format!(
                        "'{name}' takes {} argument(s), got {}",
                        func.arity(),
                        args.len()
                    )));
                }
                Ok(Node::Call(func, args))
            }
            Some(Token::Ident(name)) => Ok(Node::Column(self.column(name))),
            other => Err(TreeError::Expression(format!(
                "expected number, identifier, or '(', got {other:?}"
            ))),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
