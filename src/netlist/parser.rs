#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! A recursive-descent parser for structural Verilog.
//!
//! The accepted subset is one module made of declarations, gate primitives
//! and `always @(posedge clk)` blocks of non-blocking register updates:
//!
//! ```text
//! module counter(clk, en);
//!   input clk, en;
//!   reg s0;
//!   wire n0;
//!   xor g0(n0, s0, en);
//!   always @(posedge clk) begin
//!     s0 <= n0;
//!   end
//! endmodule
//! ```
//!
//! A gate names its ports in one of two ways. `and (o, a, b)` and the
//! labelled `and g1(o, a, b)` list the output first, followed by the
//! operands. When the name after the primitive is followed by exactly as
//! many ports as the gate has operands, as in `and o(a, b)`, that name is
//! the output and the gate carries no label.

use super::lexer::Token;
use super::model::{GateInstance, GateKind, Item, Netlist, RegisterBinding, Signal, SignalKind};
use crate::error::{BmcError, Result};
use logos::Logos;
use rustc_hash::FxHashSet;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

/// Parses a module from source text and validates the resulting netlist.
///
/// # Errors
///
/// [`BmcError::Parse`] for syntax errors, [`BmcError::UnsupportedGate`] for
/// unknown primitives, and any validation error of [`Netlist::from_items`].
pub fn parse_netlist(source: &str) -> Result<Netlist> {
    let mut parser = Parser::new(source)?;
    let (name, items) = parser.module()?;
    debug!(module = %name, items = items.len(), "parsed netlist source");
    Netlist::from_items(name, items)
}

/// Reads and parses a netlist file.
///
/// # Errors
///
/// [`BmcError::Io`] if the file cannot be read, otherwise as [`parse_netlist`].
pub fn parse_netlist_file(path: impl AsRef<Path>) -> Result<Netlist> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|e| BmcError::io(path, e))?;
    parse_netlist(&source)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<(Token<'a>, Range<usize>)>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Result<Self> {
        let mut tokens = Vec::new();
        let mut lexer = Token::lexer(source);
        while let Some(token) = lexer.next() {
            let span = lexer.span();
            match token {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    return Err(BmcError::Parse {
                        line: line_of(source, span.start),
                        message: format!("unexpected character `{}`", lexer.slice()),
                    });
                }
            }
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).map(|(token, _)| *token)
    }

    fn line(&self) -> usize {
        let offset = self
            .tokens
            .get(self.pos)
            .map_or(self.source.len(), |(_, span)| span.start);
        line_of(self.source, offset)
    }

    fn error<T>(&self, expected: &str) -> Result<T> {
        let found = self
            .peek()
            .map_or_else(|| "end of input".to_string(), |token| token.to_string());
        Err(BmcError::Parse {
            line: self.line(),
            message: format!("expected {expected}, found {found}"),
        })
    }

    fn expect(&mut self, token: Token<'a>) -> Result<()> {
        if self.peek() == Some(token) {
            self.pos += 1;
            Ok(())
        } else {
            self.error(&token.to_string())
        }
    }

    fn eat(&mut self, token: Token<'a>) -> bool {
        let matched = self.peek() == Some(token);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn ident(&mut self) -> Result<&'a str> {
        if let Some(Token::Ident(name)) = self.peek() {
            self.pos += 1;
            Ok(name)
        } else {
            self.error("an identifier")
        }
    }

    /// `ident {, ident}`
    fn ident_list(&mut self) -> Result<Vec<&'a str>> {
        let mut names = vec![self.ident()?];
        while self.eat(Token::Comma) {
            names.push(self.ident()?);
        }
        Ok(names)
    }

    fn module(&mut self) -> Result<(String, Vec<Item>)> {
        self.expect(Token::Module)?;
        let name = self.ident()?;
        let mut ports = Vec::new();
        if self.eat(Token::LParen) {
            if self.peek() != Some(Token::RParen) {
                ports = self.ident_list()?;
            }
            self.expect(Token::RParen)?;
        }
        self.expect(Token::Semicolon)?;

        let mut items = Vec::new();
        let mut clocks = Vec::new();
        loop {
            match self.peek() {
                Some(Token::EndModule) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Input) => self.declaration(SignalKind::Input, &mut items)?,
                Some(Token::Output) => self.declaration(SignalKind::Output, &mut items)?,
                Some(Token::Wire) => self.declaration(SignalKind::Wire, &mut items)?,
                Some(Token::Reg) => self.declaration(SignalKind::StateRegister, &mut items)?,
                Some(Token::Always) => clocks.push(self.always_block(&mut items)?),
                Some(Token::Ident(_)) => items.push(Item::Gate(self.gate()?)),
                _ => return self.error("a declaration, gate, `always` block or `endmodule`"),
            }
        }
        if self.peek().is_some() {
            return self.error("end of input after `endmodule`");
        }

        let declared: FxHashSet<&str> = items
            .iter()
            .filter_map(|item| match item {
                Item::Signal(signal) => Some(signal.name.as_str()),
                _ => None,
            })
            .collect();
        for (port, context) in ports
            .iter()
            .map(|port| (*port, "the port list"))
            .chain(clocks.iter().map(|clock| (*clock, "an `always` block")))
        {
            if !declared.contains(port) {
                return Err(BmcError::UnknownSignal {
                    signal: port.to_string(),
                    context: context.to_string(),
                });
            }
        }

        Ok((name.to_string(), items))
    }

    /// `kind ident {, ident} ;`
    fn declaration(&mut self, kind: SignalKind, items: &mut Vec<Item>) -> Result<()> {
        self.pos += 1;
        for name in self.ident_list()? {
            items.push(Item::Signal(Signal::new(name, kind)));
        }
        self.expect(Token::Semicolon)
    }

    /// `gate [label] ( out, in {, in} ) ;` or `gate out ( in {, in} ) ;`
    fn gate(&mut self) -> Result<GateInstance> {
        let kind: GateKind = self.ident()?.parse()?;
        let name = match self.peek() {
            Some(Token::Ident(name)) => {
                self.pos += 1;
                Some(name)
            }
            _ => None,
        };
        self.expect(Token::LParen)?;
        let ports = self.ident_list()?;
        self.expect(Token::RParen)?;
        self.expect(Token::Semicolon)?;

        match name {
            // exactly the operands: the name before the list is the output
            Some(output) if ports.len() == kind.arity() => Ok(GateInstance {
                kind,
                label: None,
                output: output.to_string(),
                inputs: ports.iter().map(ToString::to_string).collect(),
            }),
            label => {
                // ident_list yields at least one name
                let (output, inputs) = ports.split_first().unwrap_or((&"", &[]));
                Ok(GateInstance {
                    kind,
                    label: label.map(str::to_string),
                    output: (*output).to_string(),
                    inputs: inputs.iter().map(ToString::to_string).collect(),
                })
            }
        }
    }

    /// `always @ ( posedge clk ) (begin {update} end | update)`, returning
    /// the clock name.
    fn always_block(&mut self, items: &mut Vec<Item>) -> Result<&'a str> {
        self.pos += 1;
        self.expect(Token::At)?;
        self.expect(Token::LParen)?;
        self.expect(Token::Posedge)?;
        let clock = self.ident()?;
        self.expect(Token::RParen)?;

        if self.eat(Token::Begin) {
            while !self.eat(Token::End) {
                items.push(Item::Binding(self.update()?));
            }
        } else {
            items.push(Item::Binding(self.update()?));
        }
        Ok(clock)
    }

    /// `state <= next ;`
    fn update(&mut self) -> Result<RegisterBinding> {
        let state = self.ident()?;
        self.expect(Token::NonBlocking)?;
        let next = self.ident()?;
        self.expect(Token::Semicolon)?;
        Ok(RegisterBinding::new(state, next))
    }
}

fn line_of(source: &str, offset: usize) -> usize {
    source[..offset.min(source.len())]
        .bytes()
        .filter(|&b| b == b'\n')
        .count()
        + 1
}
