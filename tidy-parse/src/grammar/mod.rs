#[cfg(test)]
mod test;

use crate::{operator, Nesting, ParseError, Parser, MAX_NESTING};
use std::rc::Rc;
use tidy_lex::token::{Data, Name};
use tidy_syntax::{Arg, Binop, Keyword, Literal, Node, Unop, UNQUOTE_PRECEDENCE};

/// Tokens that can start an expression, reported when one is missing.
const EXPRESSION_START: &[Name] = &[
    Name::Ident,
    Name::Number,
    Name::String,
    Name::LParen,
    Name::LBrace,
];

impl Parser {
    /*
    program ::=
      sep* [expr (sep+ expr)*] sep*

    sep ::= newline | ';'
     */
    pub fn program(&mut self) -> Result<Vec<Node>, ParseError> {
        self.statements(Name::Eof)
    }

    fn separators(&mut self) {
        while matches!(self.peek_name(), Name::Newline | Name::Semicolon) {
            self.consume();
        }
    }

    /// Expressions up to (but not including) `end`.
    fn statements(&mut self, end: Name) -> Result<Vec<Node>, ParseError> {
        let mut nodes = Vec::new();
        loop {
            self.separators();
            self.expecting.insert(end);
            if self.peek_name() == end {
                break;
            }
            nodes.push(self.expr()?);

            self.expecting.insert(Name::Newline);
            self.expecting.insert(Name::Semicolon);
            self.expecting.insert(end);
            match self.peek_name() {
                Name::Newline | Name::Semicolon => continue,
                name if name == end => break,
                _ => return self.unexpected(),
            }
        }
        Ok(nodes)
    }

    pub fn expr(&mut self) -> Result<Node, ParseError> {
        self.binary(0)
    }

    /// A chain of binary operators whose precedence is at least `min`.
    fn binary(&mut self, min: u16) -> Result<Node, ParseError> {
        if self.depth >= MAX_NESTING {
            return self.too_deep();
        }
        self.depth += 1;
        let result = self.binary_chain(min);
        self.depth -= 1;
        result
    }

    fn binary_chain(&mut self, min: u16) -> Result<Node, ParseError> {
        let first = self.unary()?;
        let mut rest = Vec::new();
        loop {
            let token = self.peek();
            let binop = match token.data.name().binop() {
                Some(binop) if binop != Binop::Dollar && binop.precedence() >= min => binop,
                _ => break,
            };
            let pos = token.pos;
            self.consume();
            self.skip_newlines();
            let operand = self.unary()?;
            rest.push((binop, pos, operand));
        }
        operator::operator(first, &mut rest.into_iter())
            .map_err(|use_| self.ambiguous_use_of(use_))
    }

    fn prefix(&mut self, precedence: u16) -> Result<Node, ParseError> {
        self.consume();
        self.skip_newlines();
        self.binary(precedence)
    }

    /*
    unary ::=
      ('-' | '+' | '!' | '~' | '!!' | '!!!') binary(prec)
      postfix
     */
    fn unary(&mut self) -> Result<Node, ParseError> {
        let unop = match self.peek_name() {
            Name::Minus => Unop::Minus,
            Name::Plus => Unop::Plus,
            Name::Bang => Unop::Not,
            Name::Tilde => Unop::Tilde,
            Name::BangBang => {
                let operand = self.prefix(UNQUOTE_PRECEDENCE)?;
                return Ok(Node::mk_unquote(operand));
            }
            Name::BangBangBang => {
                let operand = self.prefix(UNQUOTE_PRECEDENCE)?;
                return Ok(Node::mk_splice(operand));
            }
            _ => return self.postfix(),
        };
        let operand = self.prefix(unop.precedence())?;
        Ok(Node::mk_unop(unop, operand))
    }

    /*
    postfix ::=
      atom ('(' args ')' | '$' selector)*
     */
    fn postfix(&mut self) -> Result<Node, ParseError> {
        let mut node = self.atom()?;
        loop {
            match self.peek_name() {
                Name::LParen => {
                    self.consume();
                    let args = self.args()?;
                    node = Node::call(node, args);
                }
                Name::Dollar => {
                    self.consume();
                    self.skip_newlines();
                    let selector = self.selector()?;
                    node = Node::mk_binop(Binop::Dollar, node, selector);
                }
                _ => break,
            }
        }
        Ok(node)
    }

    fn selector(&mut self) -> Result<Node, ParseError> {
        self.expecting.insert(Name::Ident);
        self.expecting.insert(Name::String);
        let data = self.peek().data.clone();
        match data {
            Data::Ident { value, .. } => {
                self.consume();
                Ok(Node::Symbol(value))
            }
            Data::String { value, .. } => {
                self.consume();
                Ok(Node::Constant(Literal::Str(value)))
            }
            _ => self.unexpected(),
        }
    }

    fn ident(&mut self) -> Result<Rc<str>, ParseError> {
        self.expecting.insert(Name::Ident);
        let data = self.peek().data.clone();
        match data {
            Data::Ident { value, .. } => {
                self.consume();
                Ok(value)
            }
            _ => self.unexpected(),
        }
    }

    fn atom(&mut self) -> Result<Node, ParseError> {
        let data = self.peek().data.clone();
        let node = match data {
            Data::Number { value, .. } => Node::num(value),
            Data::String { value, .. } => Node::Constant(Literal::Str(value)),
            Data::Ident { value, .. } => Node::Symbol(value),
            Data::Keyword(Keyword::True) => Node::bool(true),
            Data::Keyword(Keyword::False) => Node::bool(false),
            Data::Keyword(Keyword::Null) => Node::null(),
            Data::Keyword(Keyword::If) => return self.if_(),
            Data::Keyword(Keyword::Function) => return self.function(),
            Data::LParen => {
                self.consume();
                let inner = self.with_nesting(Nesting::Paren, |parser| {
                    let inner = parser.expr()?;
                    parser.expect(Name::RParen)?;
                    Ok(inner)
                })?;
                return Ok(Node::mk_paren(inner));
            }
            Data::LBrace => {
                self.consume();
                let statements = self.with_nesting(Nesting::Brace, |parser| {
                    let statements = parser.statements(Name::RBrace)?;
                    parser.expect(Name::RBrace)?;
                    Ok(statements)
                })?;
                return Ok(Node::mk_block(statements));
            }
            _ => {
                for name in EXPRESSION_START {
                    self.expecting.insert(*name);
                }
                return self.unexpected();
            }
        };
        self.consume();
        Ok(node)
    }

    /*
    if ::=
      'if' '(' expr ')' expr ['else' expr]
     */
    fn if_(&mut self) -> Result<Node, ParseError> {
        self.consume();
        self.expect(Name::LParen)?;
        let cond = self.with_nesting(Nesting::Paren, |parser| {
            let cond = parser.expr()?;
            parser.expect(Name::RParen)?;
            Ok(cond)
        })?;
        self.skip_newlines();
        let then = self.expr()?;
        let else_ = if self.else_follows() {
            self.consume();
            self.skip_newlines();
            Some(self.expr()?)
        } else {
            None
        };
        Ok(Node::mk_if(cond, then, else_))
    }

    /// At the top level a newline ends an `if`, but inside braces or parentheses
    /// an `else` on the following line still belongs to it.
    fn else_follows(&mut self) -> bool {
        if self.peek_name() == Name::Keyword(Keyword::Else) {
            return true;
        }
        if !self.is_nested() {
            return false;
        }
        let mut ix = self.ix;
        while self.token_at(ix).data.name() == Name::Newline {
            ix += 1;
        }
        if self.token_at(ix).data.name() == Name::Keyword(Keyword::Else) {
            self.ix = ix;
            true
        } else {
            false
        }
    }

    /*
    function ::=
      'function' '(' [formal (',' formal)*] ')' expr

    formal ::=
      ident ['=' expr]
     */
    fn function(&mut self) -> Result<Node, ParseError> {
        self.consume();
        self.expect(Name::LParen)?;
        let formals = self.with_nesting(Nesting::Paren, |parser| {
            let mut formals = Vec::new();
            parser.expecting.insert(Name::RParen);
            if parser.peek_name() == Name::RParen {
                parser.consume();
                return Ok(formals);
            }
            loop {
                let name = parser.ident()?;
                let default = if parser.peek_name() == Name::Equals {
                    parser.consume();
                    parser.expr()?
                } else {
                    parser.expecting.insert(Name::Equals);
                    Node::Missing
                };
                formals.push(Arg {
                    name: Some(name),
                    value: default,
                });

                parser.expecting.insert(Name::Comma);
                parser.expecting.insert(Name::RParen);
                match parser.peek_name() {
                    Name::Comma => {
                        parser.consume();
                    }
                    Name::RParen => {
                        parser.consume();
                        break;
                    }
                    _ => return parser.unexpected(),
                }
            }
            Ok(formals)
        })?;
        self.skip_newlines();
        let body = self.expr()?;
        Ok(Node::mk_function(formals, body))
    }

    /*
    args ::=
      [arg (',' arg)*] ')'

    arg ::=
      [name '='] expr
      name '='
      <empty>
     */
    fn args(&mut self) -> Result<Vec<Arg>, ParseError> {
        self.with_nesting(Nesting::Paren, |parser| {
            let mut args = Vec::new();
            parser.expecting.insert(Name::RParen);
            if parser.peek_name() == Name::RParen {
                parser.consume();
                return Ok(args);
            }
            loop {
                args.push(parser.arg()?);

                parser.expecting.insert(Name::Comma);
                parser.expecting.insert(Name::RParen);
                match parser.peek_name() {
                    Name::Comma => {
                        parser.consume();
                    }
                    Name::RParen => {
                        parser.consume();
                        break;
                    }
                    _ => return parser.unexpected(),
                }
            }
            Ok(args)
        })
    }

    fn arg_value(&mut self) -> Result<Node, ParseError> {
        match self.peek_name() {
            Name::Comma | Name::RParen => Ok(Node::Missing),
            _ => self.expr(),
        }
    }

    fn arg(&mut self) -> Result<Arg, ParseError> {
        let data = self.peek().data.clone();
        let name = match data {
            Data::Ident { value, .. } | Data::String { value, .. }
                if self.lookahead_name() == Name::Equals =>
            {
                Some(value)
            }
            _ => None,
        };
        match name {
            Some(name) => {
                self.consume();
                self.consume();
                let value = self.arg_value()?;
                Ok(Arg {
                    name: Some(name),
                    value,
                })
            }
            None => Ok(Arg::positional(self.arg_value()?)),
        }
    }
}
