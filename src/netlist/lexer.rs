#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Tokens of the structural Verilog subset.
//!
//! Gate primitives (`and`, `or`, ...) are lexed as plain identifiers so that
//! an unsupported primitive reaches the parser and is reported by name.

use logos::Logos;

/// A lexical token borrowing identifiers from the source.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*[^*]*\*+([^/*][^*]*\*+)*/")]
pub enum Token<'a> {
    /// `module`
    #[token("module")]
    Module,
    /// `endmodule`
    #[token("endmodule")]
    EndModule,
    /// `input`
    #[token("input")]
    Input,
    /// `output`
    #[token("output")]
    Output,
    /// `reg`
    #[token("reg")]
    Reg,
    /// `wire`
    #[token("wire")]
    Wire,
    /// `always`
    #[token("always")]
    Always,
    /// `posedge`
    #[token("posedge")]
    Posedge,
    /// `begin`
    #[token("begin")]
    Begin,
    /// `end`
    #[token("end")]
    End,

    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `,`
    #[token(",")]
    Comma,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `@`
    #[token("@")]
    At,
    /// `<=`, the non-blocking assignment.
    #[token("<=")]
    NonBlocking,

    /// Any other name: signals, modules, labels and gate primitives.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*", |lex| lex.slice())]
    Ident(&'a str),
}

impl std::fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Module => f.write_str("`module`"),
            Self::EndModule => f.write_str("`endmodule`"),
            Self::Input => f.write_str("`input`"),
            Self::Output => f.write_str("`output`"),
            Self::Reg => f.write_str("`reg`"),
            Self::Wire => f.write_str("`wire`"),
            Self::Always => f.write_str("`always`"),
            Self::Posedge => f.write_str("`posedge`"),
            Self::Begin => f.write_str("`begin`"),
            Self::End => f.write_str("`end`"),
            Self::LParen => f.write_str("`(`"),
            Self::RParen => f.write_str("`)`"),
            Self::Comma => f.write_str("`,`"),
            Self::Semicolon => f.write_str("`;`"),
            Self::At => f.write_str("`@`"),
            Self::NonBlocking => f.write_str("`<=`"),
            Self::Ident(name) => write!(f, "identifier `{name}`"),
        }
    }
}
