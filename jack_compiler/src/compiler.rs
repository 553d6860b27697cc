//! Single-pass recursive-descent parser and code generator for Jack.
//!
//! Every production either consumes tokens and emits VM commands directly, or
//! defers to another production; there is no separate AST. The one-token
//! look-ahead the grammar needs falls out of [`crate::tokenizer::Tokenizer`]
//! always holding the next unconsumed token in `current`.

use crate::error::{JackCompilerError, Position, Result};
use crate::symbol_table::{Kind, SymbolTable};
use crate::token::{Keyword, Token};
use crate::tokenizer::Tokenizer;
use crate::vm_writer::{Arithmetic, Segment, VmWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubroutineKind {
    Constructor,
    Function,
    Method,
}

/// Compiles one `.jack` source file (one class) into its VM code.
pub fn compile(source: &str) -> Result<Vec<String>> {
    let mut compiler = Compiler::new(source)?;
    compiler.compile_class()?;
    Ok(compiler.writer.into_lines())
}

struct Compiler<'a> {
    tokenizer: Tokenizer<'a>,
    writer: VmWriter,
    symbols: SymbolTable,
    class_name: String,
    label_id: u32,
}

impl<'a> Compiler<'a> {
    fn new(source: &'a str) -> Result<Self> {
        Ok(Self {
            tokenizer: Tokenizer::new(source)?,
            writer: VmWriter::new(),
            symbols: SymbolTable::new(),
            class_name: String::new(),
            label_id: 0,
        })
    }

    // -- token-stream helpers -------------------------------------------------

    fn pos(&self) -> Position {
        self.tokenizer.position()
    }

    fn advance(&mut self) -> Result<()> {
        self.tokenizer.advance()
    }

    fn current_token(&self) -> Result<&Token> {
        self.tokenizer.current().ok_or_else(|| JackCompilerError::UnexpectedToken {
            pos: self.pos(),
            expected: "more input".to_string(),
            found: "end of file".to_string(),
        })
    }

    fn unexpected(&self, expected: &str, found: &Token) -> JackCompilerError {
        JackCompilerError::UnexpectedToken {
            pos: self.pos(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    fn is_symbol(&self, c: char) -> bool {
        matches!(self.tokenizer.current(), Some(Token::Symbol(s)) if *s == c)
    }

    fn is_keyword(&self, k: Keyword) -> bool {
        matches!(self.tokenizer.current(), Some(Token::Keyword(kw)) if *kw == k)
    }

    fn expect_symbol(&mut self, c: char) -> Result<()> {
        let found = self.current_token()?.clone();
        match found {
            Token::Symbol(s) if s == c => {
                self.advance()?;
                Ok(())
            }
            other => Err(self.unexpected(&format!("`{c}`"), &other)),
        }
    }

    fn expect_keyword(&mut self, k: Keyword) -> Result<()> {
        let found = self.current_token()?.clone();
        match found {
            Token::Keyword(kw) if kw == k => {
                self.advance()?;
                Ok(())
            }
            other => Err(self.unexpected(&format!("`{k}`"), &other)),
        }
    }

    fn identifier(&mut self) -> Result<String> {
        let found = self.current_token()?.clone();
        match found {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(self.unexpected("an identifier", &other)),
        }
    }

    /// `int | char | boolean | className`.
    fn compile_type(&mut self) -> Result<String> {
        let found = self.current_token()?.clone();
        match found {
            Token::Keyword(Keyword::Int) => {
                self.advance()?;
                Ok("int".to_string())
            }
            Token::Keyword(Keyword::Char) => {
                self.advance()?;
                Ok("char".to_string())
            }
            Token::Keyword(Keyword::Boolean) => {
                self.advance()?;
                Ok("boolean".to_string())
            }
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            other => Err(self.unexpected("a type (int, char, boolean, or a class name)", &other)),
        }
    }

    fn define(&mut self, name: &str, type_name: &str, kind: Kind) -> Result<()> {
        let pos = self.pos();
        if self.symbols.define(name, type_name, kind) {
            Ok(())
        } else {
            Err(JackCompilerError::DuplicateDefinition {
                pos,
                name: name.to_string(),
            })
        }
    }

    fn next_label(&mut self) -> String {
        let label = format!("L{}", self.label_id);
        self.label_id += 1;
        label
    }

    fn segment_for_kind(kind: Kind) -> Segment {
        match kind {
            Kind::Static => Segment::Static,
            Kind::Field => Segment::This,
            Kind::Arg => Segment::Argument,
            Kind::Local => Segment::Local,
        }
    }

    // -- class structure -------------------------------------------------

    fn compile_class(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Class)?;
        self.class_name = self.identifier()?;
        self.expect_symbol('{')?;

        while self.is_keyword(Keyword::Static) || self.is_keyword(Keyword::Field) {
            self.compile_class_var_dec()?;
        }
        while self.is_keyword(Keyword::Constructor)
            || self.is_keyword(Keyword::Function)
            || self.is_keyword(Keyword::Method)
        {
            self.compile_subroutine_dec()?;
        }

        self.expect_symbol('}')
    }

    fn compile_class_var_dec(&mut self) -> Result<()> {
        let found = self.current_token()?.clone();
        let kind = match found {
            Token::Keyword(Keyword::Static) => Kind::Static,
            Token::Keyword(Keyword::Field) => Kind::Field,
            other => return Err(self.unexpected("`static` or `field`", &other)),
        };
        self.advance()?;
        self.compile_var_decl_list(kind)
    }

    fn compile_var_dec(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Var)?;
        self.compile_var_decl_list(Kind::Local)
    }

    /// Shared tail of `classVarDec` and `varDec`: `type varName (',' varName)* ';'`.
    fn compile_var_decl_list(&mut self, kind: Kind) -> Result<()> {
        let type_name = self.compile_type()?;
        let name = self.identifier()?;
        self.define(&name, &type_name, kind)?;
        while self.is_symbol(',') {
            self.expect_symbol(',')?;
            let name = self.identifier()?;
            self.define(&name, &type_name, kind)?;
        }
        self.expect_symbol(';')
    }

    fn compile_subroutine_dec(&mut self) -> Result<()> {
        self.symbols.start_subroutine();

        let found = self.current_token()?.clone();
        let kind = match found {
            Token::Keyword(Keyword::Constructor) => SubroutineKind::Constructor,
            Token::Keyword(Keyword::Function) => SubroutineKind::Function,
            Token::Keyword(Keyword::Method) => SubroutineKind::Method,
            other => return Err(self.unexpected("`constructor`, `function`, or `method`", &other)),
        };
        self.advance()?;

        if kind == SubroutineKind::Method {
            self.define("this", &self.class_name, Kind::Arg)?;
        }

        if self.is_keyword(Keyword::Void) {
            self.advance()?;
        } else {
            self.compile_type()?;
        }

        let name = self.identifier()?;
        let full_name = format!("{}.{name}", self.class_name);

        self.expect_symbol('(')?;
        self.compile_parameter_list()?;
        self.expect_symbol(')')?;

        self.compile_subroutine_body(&full_name, kind)
    }

    fn compile_parameter_list(&mut self) -> Result<()> {
        if self.is_symbol(')') {
            return Ok(());
        }
        loop {
            let type_name = self.compile_type()?;
            let name = self.identifier()?;
            self.define(&name, &type_name, Kind::Arg)?;
            if self.is_symbol(',') {
                self.expect_symbol(',')?;
                continue;
            }
            break;
        }
        Ok(())
    }

    fn compile_subroutine_body(&mut self, full_name: &str, kind: SubroutineKind) -> Result<()> {
        self.expect_symbol('{')?;
        while self.is_keyword(Keyword::Var) {
            self.compile_var_dec()?;
        }

        let n_locals = self.symbols.count(Kind::Local);
        self.writer.write_function(full_name, n_locals);

        match kind {
            SubroutineKind::Method => {
                self.writer.write_push(Segment::Argument, 0);
                self.writer.write_pop(Segment::Pointer, 0);
            }
            SubroutineKind::Constructor => {
                let n_fields = self.symbols.count(Kind::Field);
                self.writer.write_push(Segment::Constant, n_fields);
                self.writer.write_call("Memory.alloc", 1);
                self.writer.write_pop(Segment::Pointer, 0);
            }
            SubroutineKind::Function => {}
        }

        self.compile_statements()?;
        self.expect_symbol('}')
    }

    // -- statements -------------------------------------------------

    fn compile_statements(&mut self) -> Result<()> {
        loop {
            match self.tokenizer.current() {
                Some(Token::Keyword(Keyword::If)) => self.compile_if()?,
                Some(Token::Keyword(Keyword::Let)) => self.compile_let()?,
                Some(Token::Keyword(Keyword::While)) => self.compile_while()?,
                Some(Token::Keyword(Keyword::Do)) => self.compile_do()?,
                Some(Token::Keyword(Keyword::Return)) => self.compile_return()?,
                _ => break,
            }
        }
        Ok(())
    }

    fn compile_let(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Let)?;
        let pos = self.pos();
        let name = self.identifier()?;
        let kind = self
            .symbols
            .kind_of(&name)
            .ok_or_else(|| JackCompilerError::UnknownIdentifier {
                pos,
                name: name.clone(),
            })?;
        let index = self.symbols.index_of(&name).expect("kind_of succeeded");
        let segment = Self::segment_for_kind(kind);

        if self.is_symbol('[') {
            self.expect_symbol('[')?;
            self.writer.write_push(segment, index);
            self.compile_expression()?;
            self.expect_symbol(']')?;
            self.writer.write_arithmetic(Arithmetic::Add);
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            // Stash the RHS before pointing THAT at the destination, so that
            // the RHS could itself have read through `a[...]` without the
            // write clobbering THAT out from under it.
            self.writer.write_pop(Segment::Temp, 0);
            self.writer.write_pop(Segment::Pointer, 1);
            self.writer.write_push(Segment::Temp, 0);
            self.writer.write_pop(Segment::That, 0);
        } else {
            self.expect_symbol('=')?;
            self.compile_expression()?;
            self.expect_symbol(';')?;
            self.writer.write_pop(segment, index);
        }
        Ok(())
    }

    fn compile_if(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::If)?;
        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic(Arithmetic::Not);

        let else_label = self.next_label();
        let end_label = self.next_label();
        self.writer.write_if_goto(&else_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.writer.write_goto(&end_label);
        self.writer.write_label(&else_label);

        if self.is_keyword(Keyword::Else) {
            self.advance()?;
            self.expect_symbol('{')?;
            self.compile_statements()?;
            self.expect_symbol('}')?;
        }
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_while(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::While)?;
        let top_label = self.next_label();
        let end_label = self.next_label();
        self.writer.write_label(&top_label);

        self.expect_symbol('(')?;
        self.compile_expression()?;
        self.expect_symbol(')')?;
        self.writer.write_arithmetic(Arithmetic::Not);
        self.writer.write_if_goto(&end_label);

        self.expect_symbol('{')?;
        self.compile_statements()?;
        self.expect_symbol('}')?;
        self.writer.write_goto(&top_label);
        self.writer.write_label(&end_label);
        Ok(())
    }

    fn compile_do(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Do)?;
        let name = self.identifier()?;
        self.compile_call(name)?;
        self.expect_symbol(';')?;
        self.writer.write_pop(Segment::Temp, 0);
        Ok(())
    }

    fn compile_return(&mut self) -> Result<()> {
        self.expect_keyword(Keyword::Return)?;
        if self.is_symbol(';') {
            self.writer.write_push(Segment::Constant, 0);
        } else {
            self.compile_expression()?;
        }
        self.expect_symbol(';')?;
        self.writer.write_return();
        Ok(())
    }

    // -- expressions -------------------------------------------------

    fn binary_op(&self) -> Option<char> {
        match self.tokenizer.current() {
            Some(Token::Symbol(c)) if "+-*/&|<>=".contains(*c) => Some(*c),
            _ => None,
        }
    }

    fn emit_binary_op(&mut self, op: char) {
        match op {
            '+' => self.writer.write_arithmetic(Arithmetic::Add),
            '-' => self.writer.write_arithmetic(Arithmetic::Sub),
            '&' => self.writer.write_arithmetic(Arithmetic::And),
            '|' => self.writer.write_arithmetic(Arithmetic::Or),
            '<' => self.writer.write_arithmetic(Arithmetic::Lt),
            '>' => self.writer.write_arithmetic(Arithmetic::Gt),
            '=' => self.writer.write_arithmetic(Arithmetic::Eq),
            '*' => self.writer.write_call("Math.multiply", 2),
            '/' => self.writer.write_call("Math.divide", 2),
            _ => unreachable!("binary_op only returns recognized operators"),
        }
    }

    /// `term (op term)*`. Every `op term` pair compiles its term first and
    /// then recurses into the rest of the chain before emitting its own
    /// operator, so the operator closest to the end of the expression is
    /// emitted first: this is what makes `1 + 2 * 3` generate the multiply
    /// before the add, matching how a caller of a flat, precedence-free
    /// grammar expects adjacent operators to nest.
    fn compile_expression(&mut self) -> Result<()> {
        self.compile_term()?;
        self.compile_expression_tail()
    }

    fn compile_expression_tail(&mut self) -> Result<()> {
        if let Some(op) = self.binary_op() {
            self.advance()?;
            self.compile_term()?;
            self.compile_expression_tail()?;
            self.emit_binary_op(op);
        }
        Ok(())
    }

    fn compile_term(&mut self) -> Result<()> {
        let pos = self.pos();
        let found = self.current_token()?.clone();
        match found {
            Token::IntConst(v) => {
                self.writer.write_push(Segment::Constant, v as u16);
                self.advance()?;
            }
            Token::StringConst(s) => {
                self.writer.write_push(Segment::Constant, s.len() as u16);
                self.writer.write_call("String.new", 1);
                for byte in s.bytes() {
                    self.writer.write_push(Segment::Constant, u16::from(byte));
                    self.writer.write_call("String.appendChar", 2);
                }
                self.advance()?;
            }
            Token::Keyword(Keyword::True) => {
                self.writer.write_push(Segment::Constant, 0);
                self.writer.write_arithmetic(Arithmetic::Not);
                self.advance()?;
            }
            Token::Keyword(Keyword::False) | Token::Keyword(Keyword::Null) => {
                self.writer.write_push(Segment::Constant, 0);
                self.advance()?;
            }
            Token::Keyword(Keyword::This) => {
                self.writer.write_push(Segment::Pointer, 0);
                self.advance()?;
            }
            Token::Symbol('(') => {
                self.advance()?;
                self.compile_expression()?;
                self.expect_symbol(')')?;
            }
            Token::Symbol('-') => {
                self.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic(Arithmetic::Neg);
            }
            Token::Symbol('~') => {
                self.advance()?;
                self.compile_term()?;
                self.writer.write_arithmetic(Arithmetic::Not);
            }
            Token::Identifier(name) => {
                self.advance()?;
                if self.is_symbol('[') {
                    self.compile_array_access(&name, pos)?;
                } else if self.is_symbol('(') || self.is_symbol('.') {
                    self.compile_call(name)?;
                } else {
                    self.compile_variable_push(&name, pos)?;
                }
            }
            other => return Err(self.unexpected("a term", &other)),
        }
        Ok(())
    }

    fn compile_array_access(&mut self, name: &str, pos: Position) -> Result<()> {
        let kind = self
            .symbols
            .kind_of(name)
            .ok_or_else(|| JackCompilerError::UnknownIdentifier {
                pos,
                name: name.to_string(),
            })?;
        let index = self.symbols.index_of(name).expect("kind_of succeeded");
        let segment = Self::segment_for_kind(kind);

        self.expect_symbol('[')?;
        self.writer.write_push(segment, index);
        self.compile_expression()?;
        self.expect_symbol(']')?;
        self.writer.write_arithmetic(Arithmetic::Add);
        self.writer.write_pop(Segment::Pointer, 1);
        self.writer.write_push(Segment::That, 0);
        Ok(())
    }

    fn compile_variable_push(&mut self, name: &str, pos: Position) -> Result<()> {
        let kind = self
            .symbols
            .kind_of(name)
            .ok_or_else(|| JackCompilerError::UnknownIdentifier {
                pos,
                name: name.to_string(),
            })?;
        let index = self.symbols.index_of(name).expect("kind_of succeeded");
        self.writer.write_push(Self::segment_for_kind(kind), index);
        Ok(())
    }

    /// `name(args)` (a call on `this`) or `qual.name(args)` (a method call on
    /// a known variable, or a static/class call when `qual` resolves to
    /// nothing in the symbol table).
    fn compile_call(&mut self, name: String) -> Result<()> {
        if self.is_symbol('(') {
            self.expect_symbol('(')?;
            self.writer.write_push(Segment::Pointer, 0);
            let n_args = self.compile_expression_list()?;
            self.expect_symbol(')')?;
            self.writer
                .write_call(&format!("{}.{name}", self.class_name), n_args + 1);
            return Ok(());
        }

        if self.is_symbol('.') {
            self.expect_symbol('.')?;
            let member = self.identifier()?;
            self.expect_symbol('(')?;

            if let Some(kind) = self.symbols.kind_of(&name) {
                let segment = Self::segment_for_kind(kind);
                let index = self.symbols.index_of(&name).expect("kind_of succeeded");
                let type_name = self
                    .symbols
                    .type_of(&name)
                    .expect("kind_of succeeded")
                    .to_string();
                self.writer.write_push(segment, index);
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer
                    .write_call(&format!("{type_name}.{member}"), n_args + 1);
            } else {
                let n_args = self.compile_expression_list()?;
                self.expect_symbol(')')?;
                self.writer.write_call(&format!("{name}.{member}"), n_args);
            }
            return Ok(());
        }

        let found = self.current_token()?.clone();
        Err(self.unexpected("`(` or `.`", &found))
    }

    fn compile_expression_list(&mut self) -> Result<u16> {
        if self.is_symbol(')') {
            return Ok(0);
        }
        let mut count: u16 = 1;
        self.compile_expression()?;
        while self.is_symbol(',') {
            self.expect_symbol(',')?;
            self.compile_expression()?;
            count += 1;
        }
        Ok(count)
    }
}
