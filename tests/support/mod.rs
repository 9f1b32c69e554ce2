//! Fixture-dialect parser shared by the integration tests.
//!
//! The engine consumes externally built trees; this module is the test
//! suite's tree-building collaborator. It parses a small JS-like dialect
//! (functions, classes, var/let/const, `if`/`for`/`for..of`/`while`,
//! `try`/`catch`, `throw`, `return`, expressions, comments-as-nodes) into
//! `stylefix` node trees with byte-accurate spans.

use anyhow::{Result, bail};

use stylefix::tree::{AttrValue, ByteSpan, Node, NodeKind};

/// Parse a fixture source into a `Unit` tree.
pub fn parse_unit(source: &str) -> Result<Node> {
    let mut parser = Parser::new(source);
    let mut unit = Node::new(NodeKind::Unit, ByteSpan::new(0, source.len()));

    parser.skip_ws();
    while !parser.at_end() {
        unit.push(parser.parse_statement()?);
        parser.skip_ws();
    }

    Ok(unit)
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    // ------------------------------------------------------------------
    // Low-level scanning
    // ------------------------------------------------------------------

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn peek(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek_at(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn skip_ws(&mut self) {
        while !self.at_end() && self.peek().is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn starts_with(&self, s: &str) -> bool {
        self.src[self.pos..].starts_with(s)
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn eat(&mut self, s: &str) -> Result<()> {
        if self.starts_with(s) {
            self.advance(s.len());
            Ok(())
        } else {
            bail!(
                "expected `{s}` at byte {} (near `{}`)",
                self.pos,
                &self.src[self.pos..self.src.len().min(self.pos + 20)]
            );
        }
    }

    fn try_eat(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.advance(s.len());
            true
        } else {
            false
        }
    }

    fn at_keyword(&self, kw: &str) -> bool {
        self.starts_with(kw) && !is_ident_byte(self.peek_at(kw.len()))
    }

    fn eat_keyword(&mut self, kw: &str) -> Result<()> {
        if self.at_keyword(kw) {
            self.advance(kw.len());
            Ok(())
        } else {
            bail!("expected keyword `{kw}` at byte {}", self.pos);
        }
    }

    fn parse_ident(&mut self) -> Result<(String, ByteSpan)> {
        let start = self.pos;
        if !matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'_') {
            bail!("expected identifier at byte {}", self.pos);
        }
        while is_ident_byte(self.peek()) {
            self.pos += 1;
        }
        let span = ByteSpan::new(start, self.pos);
        Ok((self.src[start..self.pos].to_string(), span))
    }

    fn ident_node(&mut self) -> Result<Node> {
        let (name, span) = self.parse_ident()?;
        Ok(Node::new(NodeKind::Identifier, span).with_attr("name", AttrValue::Str(name)))
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Node> {
        self.skip_ws();

        if self.starts_with("//") {
            return self.parse_line_comment();
        }
        if self.starts_with("/*") {
            return self.parse_block_comment();
        }
        if self.at_keyword("function") {
            return self.parse_function();
        }
        if self.at_keyword("class") {
            return self.parse_class();
        }
        for kw in ["var", "let", "const"] {
            if self.at_keyword(kw) {
                return self.parse_var_decl(true);
            }
        }
        if self.at_keyword("if") {
            return self.parse_if();
        }
        if self.at_keyword("for") {
            return self.parse_for();
        }
        if self.at_keyword("while") {
            return self.parse_while();
        }
        if self.at_keyword("return") {
            return self.parse_return();
        }
        if self.at_keyword("throw") {
            return self.parse_throw();
        }
        if self.at_keyword("try") {
            return self.parse_try();
        }

        // Expression statement; the node's span absorbs the terminator.
        let mut expr = self.parse_expression()?;
        self.skip_ws();
        self.eat(";")?;
        expr.set_span(ByteSpan::new(expr.span().start, self.pos));
        Ok(expr)
    }

    fn parse_line_comment(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat("//")?;
        while !self.at_end() && self.peek() != b'\n' {
            self.pos += 1;
        }
        let content = self.src[start + 2..self.pos].trim().to_string();
        Ok(Node::new(NodeKind::Comment, ByteSpan::new(start, self.pos))
            .with_attr("text", AttrValue::Str(content))
            .with_attr("style", AttrValue::Str("line".into())))
    }

    fn parse_block_comment(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat("/*")?;
        let Some(rel) = self.src[self.pos..].find("*/") else {
            bail!("unterminated block comment at byte {start}");
        };
        let inner = self.src[self.pos..self.pos + rel].trim().to_string();
        self.pos += rel + 2;
        Ok(Node::new(NodeKind::Comment, ByteSpan::new(start, self.pos))
            .with_attr("text", AttrValue::Str(inner))
            .with_attr("style", AttrValue::Str("block".into())))
    }

    fn parse_function(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("function")?;
        self.skip_ws();
        let name_node = self.ident_node()?;
        let name = name_node.name().unwrap_or_default().to_string();

        let mut node = Node::new(NodeKind::Function, ByteSpan::new(start, start))
            .with_attr("name", AttrValue::Str(name));
        node.push(name_node);

        self.skip_ws();
        self.eat("(")?;
        self.parse_params(&mut node)?;
        self.eat(")")?;
        self.skip_ws();
        let body = self.parse_block()?;
        let end = body.span().end;
        node.push(body);
        node.set_span(ByteSpan::new(start, end));
        Ok(node)
    }

    fn parse_params(&mut self, node: &mut Node) -> Result<()> {
        loop {
            self.skip_ws();
            if self.peek() == b')' {
                return Ok(());
            }

            let start = self.pos;
            let param = if self.try_eat("...") {
                let (name, span) = self.parse_ident()?;
                Node::new(NodeKind::Param, ByteSpan::new(start, span.end))
                    .with_attr("name", AttrValue::Str(name))
                    .with_attr("rest", AttrValue::Bool(true))
            } else if self.peek() == b'{' {
                let span = self.consume_balanced(b'{', b'}')?;
                let raw = self.src[span.start..span.end].to_string();
                Node::new(NodeKind::Param, span)
                    .with_attr("name", AttrValue::Str(raw))
                    .with_attr("pattern", AttrValue::Bool(true))
            } else {
                let (name, span) = self.parse_ident()?;
                let mut param = Node::new(NodeKind::Param, span)
                    .with_attr("name", AttrValue::Str(name));
                self.skip_ws();
                if self.peek() == b'=' && self.peek_at(1) != b'=' {
                    self.advance(1);
                    self.skip_ws();
                    let default = self.parse_expression()?;
                    param.set_span(ByteSpan::new(span.start, default.span().end));
                    param.push(default);
                }
                param
            };

            node.push(param);
            self.skip_ws();
            if !self.try_eat(",") {
                return Ok(());
            }
        }
    }

    fn parse_block(&mut self) -> Result<Node> {
        self.skip_ws();
        let start = self.pos;
        self.eat("{")?;
        let mut block = Node::new(NodeKind::Block, ByteSpan::new(start, start));
        loop {
            self.skip_ws();
            if self.try_eat("}") {
                break;
            }
            if self.at_end() {
                bail!("unterminated block starting at byte {start}");
            }
            let stmt = self.parse_statement()?;
            block.push(stmt);
        }
        block.set_span(ByteSpan::new(start, self.pos));
        Ok(block)
    }

    fn parse_var_decl(&mut self, terminated: bool) -> Result<Node> {
        let start = self.pos;
        let keyword = if self.at_keyword("var") {
            "var"
        } else if self.at_keyword("let") {
            "let"
        } else {
            "const"
        };
        self.eat_keyword(keyword)?;
        self.skip_ws();
        let (name, name_span) = self.parse_ident()?;

        let mut node = Node::new(NodeKind::VarDecl, ByteSpan::new(start, name_span.end))
            .with_attr("name", AttrValue::Str(name))
            .with_attr("keyword", AttrValue::Str(keyword.into()));

        self.skip_ws();
        if self.peek() == b'=' && self.peek_at(1) != b'=' {
            self.advance(1);
            self.skip_ws();
            let init = self.parse_expression()?;
            node.set_span(ByteSpan::new(start, init.span().end));
            node.push(init);
        }

        if terminated {
            self.skip_ws();
            self.eat(";")?;
            node.set_span(ByteSpan::new(start, self.pos));
        }
        Ok(node)
    }

    fn parse_if(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("if")?;
        self.skip_ws();
        self.eat("(")?;
        let cond = self.parse_expression()?;
        self.skip_ws();
        self.eat(")")?;
        let then = self.parse_block()?;

        let mut node = Node::new(NodeKind::If, ByteSpan::new(start, then.span().end));
        let mut end = then.span().end;
        node.push(cond);
        node.push(then);

        let saved = self.pos;
        self.skip_ws();
        if self.at_keyword("else") {
            self.eat_keyword("else")?;
            self.skip_ws();
            let alternate = if self.at_keyword("if") {
                self.parse_if()?
            } else {
                self.parse_block()?
            };
            end = alternate.span().end;
            node.push(alternate);
        } else {
            self.pos = saved;
        }

        node.set_span(ByteSpan::new(start, end));
        Ok(node)
    }

    fn parse_for(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("for")?;
        self.skip_ws();
        self.eat("(")?;

        // `for (x of xs)` / `for (let x of xs)` element-binding form.
        let header = self.pos;
        if let Some(node) = self.try_parse_for_each(start)? {
            return Ok(node);
        }
        self.pos = header;

        let init = if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const")
        {
            self.parse_var_decl(false)?
        } else {
            self.parse_expression()?
        };
        self.skip_ws();
        self.eat(";")?;
        let cond = self.parse_expression()?;
        self.skip_ws();
        self.eat(";")?;
        let update = self.parse_expression()?;
        self.skip_ws();
        self.eat(")")?;
        let body = self.parse_block()?;

        let end = body.span().end;
        let mut node = Node::new(NodeKind::For, ByteSpan::new(start, end));
        node.push(init);
        node.push(cond);
        node.push(update);
        node.push(body);
        Ok(node)
    }

    fn try_parse_for_each(&mut self, start: usize) -> Result<Option<Node>> {
        self.skip_ws();
        for kw in ["var", "let", "const"] {
            if self.at_keyword(kw) {
                self.eat_keyword(kw)?;
                self.skip_ws();
                break;
            }
        }
        if !matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'_') {
            return Ok(None);
        }
        let binding = self.ident_node()?;
        self.skip_ws();
        if !self.at_keyword("of") {
            return Ok(None);
        }
        self.eat_keyword("of")?;
        self.skip_ws();
        let iterable = self.parse_expression()?;
        self.skip_ws();
        self.eat(")")?;
        let body = self.parse_block()?;

        let end = body.span().end;
        let name = binding.name().unwrap_or_default().to_string();
        let mut node = Node::new(NodeKind::ForEach, ByteSpan::new(start, end))
            .with_attr("binding", AttrValue::Str(name));
        node.push(binding);
        node.push(iterable);
        node.push(body);
        Ok(Some(node))
    }

    fn parse_while(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("while")?;
        self.skip_ws();
        self.eat("(")?;
        let cond = self.parse_expression()?;
        self.skip_ws();
        self.eat(")")?;
        let body = self.parse_block()?;

        let end = body.span().end;
        let mut node = Node::new(NodeKind::While, ByteSpan::new(start, end));
        node.push(cond);
        node.push(body);
        Ok(node)
    }

    fn parse_return(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("return")?;
        self.skip_ws();
        let mut node = Node::new(NodeKind::Return, ByteSpan::new(start, start));
        if self.peek() != b';' {
            let value = self.parse_expression()?;
            node.push(value);
            self.skip_ws();
        }
        self.eat(";")?;
        node.set_span(ByteSpan::new(start, self.pos));
        Ok(node)
    }

    fn parse_throw(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("throw")?;
        self.skip_ws();
        let value = self.parse_expression()?;
        self.skip_ws();
        self.eat(";")?;
        let mut node = Node::new(NodeKind::Throw, ByteSpan::new(start, self.pos));
        node.push(value);
        Ok(node)
    }

    fn parse_try(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("try")?;
        let guarded = self.parse_block()?;
        self.skip_ws();

        let catch_start = self.pos;
        self.eat_keyword("catch")?;
        self.skip_ws();
        self.eat("(")?;
        self.skip_ws();
        let (param, _) = self.parse_ident()?;
        self.skip_ws();
        self.eat(")")?;
        let handler = self.parse_block()?;

        let catch_end = handler.span().end;
        let mut catch = Node::new(NodeKind::Catch, ByteSpan::new(catch_start, catch_end))
            .with_attr("param", AttrValue::Str(param));
        catch.push(handler);

        let mut node = Node::new(NodeKind::Try, ByteSpan::new(start, catch_end));
        node.push(guarded);
        node.push(catch);
        Ok(node)
    }

    fn parse_class(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat_keyword("class")?;
        self.skip_ws();
        let (name, _) = self.parse_ident()?;

        let mut node = Node::new(NodeKind::Class, ByteSpan::new(start, start))
            .with_attr("name", AttrValue::Str(name));

        self.skip_ws();
        if self.at_keyword("extends") {
            self.eat_keyword("extends")?;
            self.skip_ws();
            let (base, _) = self.parse_ident()?;
            node.set_attr("extends", AttrValue::Str(base));
        }

        self.skip_ws();
        self.eat("{")?;
        loop {
            self.skip_ws();
            if self.try_eat("}") {
                break;
            }
            if self.at_end() {
                bail!("unterminated class body starting at byte {start}");
            }
            if self.starts_with("//") {
                let comment = self.parse_line_comment()?;
                node.push(comment);
                continue;
            }
            if self.starts_with("/*") {
                let comment = self.parse_block_comment()?;
                node.push(comment);
                continue;
            }
            let method = self.parse_method()?;
            node.push(method);
        }
        node.set_span(ByteSpan::new(start, self.pos));
        Ok(node)
    }

    fn parse_method(&mut self) -> Result<Node> {
        let start = self.pos;
        let name_node = self.ident_node()?;
        let name = name_node.name().unwrap_or_default().to_string();

        let mut node = Node::new(NodeKind::Method, ByteSpan::new(start, start))
            .with_attr("name", AttrValue::Str(name));
        node.push(name_node);

        self.skip_ws();
        self.eat("(")?;
        self.parse_params(&mut node)?;
        self.eat(")")?;
        self.skip_ws();
        let body = self.parse_block()?;
        let end = body.span().end;
        node.push(body);
        node.set_span(ByteSpan::new(start, end));
        Ok(node)
    }

    // ------------------------------------------------------------------
    // Expressions (precedence climbing)
    // ------------------------------------------------------------------

    fn parse_expression(&mut self) -> Result<Node> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Node> {
        let lhs = self.parse_logical_or()?;
        self.skip_ws();

        let operator = if self.peek() == b'=' && self.peek_at(1) != b'=' {
            "="
        } else if self.starts_with("+=") {
            "+="
        } else if self.starts_with("-=") {
            "-="
        } else {
            return Ok(lhs);
        };

        self.advance(operator.len());
        self.skip_ws();
        let rhs = self.parse_assignment()?;

        let span = ByteSpan::new(lhs.span().start, rhs.span().end);
        let mut node =
            Node::new(NodeKind::Assign, span).with_attr("operator", AttrValue::Str(operator.into()));
        node.push(lhs);
        node.push(rhs);
        Ok(node)
    }

    fn parse_logical_or(&mut self) -> Result<Node> {
        let mut lhs = self.parse_logical_and()?;
        loop {
            self.skip_ws();
            if !self.starts_with("||") {
                return Ok(lhs);
            }
            self.advance(2);
            self.skip_ws();
            let rhs = self.parse_logical_and()?;
            lhs = binary(lhs, "||", rhs);
        }
    }

    fn parse_logical_and(&mut self) -> Result<Node> {
        let mut lhs = self.parse_equality()?;
        loop {
            self.skip_ws();
            if !self.starts_with("&&") {
                return Ok(lhs);
            }
            self.advance(2);
            self.skip_ws();
            let rhs = self.parse_equality()?;
            lhs = binary(lhs, "&&", rhs);
        }
    }

    fn parse_equality(&mut self) -> Result<Node> {
        let mut lhs = self.parse_relational()?;
        loop {
            self.skip_ws();
            let op = if self.starts_with("===") {
                "==="
            } else if self.starts_with("!==") {
                "!=="
            } else if self.starts_with("==") {
                "=="
            } else if self.starts_with("!=") {
                "!="
            } else {
                return Ok(lhs);
            };
            self.advance(op.len());
            self.skip_ws();
            let rhs = self.parse_relational()?;
            lhs = binary(lhs, op, rhs);
        }
    }

    fn parse_relational(&mut self) -> Result<Node> {
        let mut lhs = self.parse_additive()?;
        loop {
            self.skip_ws();
            let op = if self.starts_with("<=") {
                "<="
            } else if self.starts_with(">=") {
                ">="
            } else if self.peek() == b'<' {
                "<"
            } else if self.peek() == b'>' {
                ">"
            } else {
                return Ok(lhs);
            };
            self.advance(op.len());
            self.skip_ws();
            let rhs = self.parse_additive()?;
            lhs = binary(lhs, op, rhs);
        }
    }

    fn parse_additive(&mut self) -> Result<Node> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            self.skip_ws();
            let op = if self.peek() == b'+' && self.peek_at(1) != b'=' && self.peek_at(1) != b'+' {
                "+"
            } else if self.peek() == b'-' && self.peek_at(1) != b'=' && self.peek_at(1) != b'-' {
                "-"
            } else {
                return Ok(lhs);
            };
            self.advance(1);
            self.skip_ws();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(lhs, op, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        let mut lhs = self.parse_unary()?;
        loop {
            self.skip_ws();
            let op = if self.peek() == b'*' {
                "*"
            } else if self.peek() == b'/' && self.peek_at(1) != b'/' && self.peek_at(1) != b'*' {
                "/"
            } else {
                return Ok(lhs);
            };
            self.advance(1);
            self.skip_ws();
            let rhs = self.parse_unary()?;
            lhs = binary(lhs, op, rhs);
        }
    }

    fn parse_unary(&mut self) -> Result<Node> {
        self.skip_ws();
        if self.peek() == b'!' && self.peek_at(1) != b'=' {
            let start = self.pos;
            self.advance(1);
            let operand = self.parse_unary()?;
            let span = ByteSpan::new(start, operand.span().end);
            let mut node =
                Node::new(NodeKind::Unary, span).with_attr("operator", AttrValue::Str("!".into()));
            node.push(operand);
            return Ok(node);
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Node> {
        let mut node = self.parse_primary()?;

        loop {
            if self.try_eat("(") {
                let start = node.span().start;
                let mut call = Node::new(NodeKind::Call, ByteSpan::new(start, start));
                call.push(node);
                loop {
                    self.skip_ws();
                    if self.try_eat(")") {
                        break;
                    }
                    let arg = self.parse_expression()?;
                    call.push(arg);
                    self.skip_ws();
                    if !self.try_eat(",") {
                        self.eat(")")?;
                        break;
                    }
                }
                call.set_span(ByteSpan::new(start, self.pos));
                node = call;
            } else if self.peek() == b'.' && is_ident_byte(self.peek_at(1)) {
                self.advance(1);
                let property = self.ident_node()?;
                let span = ByteSpan::new(node.span().start, property.span().end);
                let mut member = Node::new(NodeKind::Member, span);
                member.push(node);
                member.push(property);
                node = member;
            } else if self.try_eat("[") {
                let index = self.parse_expression()?;
                self.skip_ws();
                self.eat("]")?;
                let span = ByteSpan::new(node.span().start, self.pos);
                let mut indexed = Node::new(NodeKind::Index, span);
                indexed.push(node);
                indexed.push(index);
                node = indexed;
            } else if self.starts_with("++") || self.starts_with("--") {
                let operator = if self.starts_with("++") { "++" } else { "--" };
                self.advance(2);
                let span = ByteSpan::new(node.span().start, self.pos);
                let mut update = Node::new(NodeKind::Update, span)
                    .with_attr("operator", AttrValue::Str(operator.into()));
                if let Some(name) = node.name() {
                    update.set_attr("name", AttrValue::Str(name.to_string()));
                }
                update.push(node);
                node = update;
            } else {
                return Ok(node);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Node> {
        self.skip_ws();

        if self.try_eat("(") {
            let inner = self.parse_expression()?;
            self.skip_ws();
            self.eat(")")?;
            return Ok(inner);
        }

        if self.peek() == b'"' {
            return self.parse_string();
        }

        if self.peek().is_ascii_digit() {
            return self.parse_number();
        }

        if self.peek() == b'{' {
            let span = self.consume_balanced(b'{', b'}')?;
            return Ok(Node::new(NodeKind::Object, span));
        }

        if self.at_keyword("true") || self.at_keyword("false") {
            let value = if self.at_keyword("true") { "true" } else { "false" };
            let start = self.pos;
            self.advance(value.len());
            return Ok(Node::new(NodeKind::Literal, ByteSpan::new(start, self.pos))
                .with_attr("value", AttrValue::Str(value.into()))
                .with_attr("kind", AttrValue::Str("bool".into())));
        }

        if matches!(self.peek(), b'a'..=b'z' | b'A'..=b'Z' | b'_') {
            return self.ident_node();
        }

        bail!(
            "unexpected token at byte {} (near `{}`)",
            self.pos,
            &self.src[self.pos..self.src.len().min(self.pos + 20)]
        );
    }

    fn parse_string(&mut self) -> Result<Node> {
        let start = self.pos;
        self.eat("\"")?;
        while !self.at_end() {
            match self.peek() {
                b'\\' => self.advance(2),
                b'"' => {
                    self.advance(1);
                    let inner = self.src[start + 1..self.pos - 1].to_string();
                    return Ok(Node::new(NodeKind::Literal, ByteSpan::new(start, self.pos))
                        .with_attr("value", AttrValue::Str(inner))
                        .with_attr("kind", AttrValue::Str("string".into())));
                }
                _ => self.advance(1),
            }
        }
        bail!("unterminated string starting at byte {start}");
    }

    fn parse_number(&mut self) -> Result<Node> {
        let start = self.pos;
        while self.peek().is_ascii_digit() {
            self.advance(1);
        }
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.advance(1);
            while self.peek().is_ascii_digit() {
                self.advance(1);
            }
        }
        let raw = self.src[start..self.pos].to_string();
        Ok(Node::new(NodeKind::Literal, ByteSpan::new(start, self.pos))
            .with_attr("value", AttrValue::Str(raw))
            .with_attr("kind", AttrValue::Str("number".into())))
    }

    /// Consume a balanced bracket pair (string-aware), returning its span.
    fn consume_balanced(&mut self, open: u8, close: u8) -> Result<ByteSpan> {
        let start = self.pos;
        self.advance(1);
        let mut depth = 1usize;
        while !self.at_end() {
            match self.peek() {
                b'"' => {
                    // Skip string contents so braces inside stay inert.
                    self.advance(1);
                    while !self.at_end() && self.peek() != b'"' {
                        if self.peek() == b'\\' {
                            self.advance(1);
                        }
                        self.advance(1);
                    }
                    self.advance(1);
                }
                b if b == open => {
                    depth += 1;
                    self.advance(1);
                }
                b if b == close => {
                    depth -= 1;
                    self.advance(1);
                    if depth == 0 {
                        return Ok(ByteSpan::new(start, self.pos));
                    }
                }
                _ => self.advance(1),
            }
        }
        bail!("unbalanced bracket starting at byte {start}");
    }
}

fn binary(lhs: Node, operator: &str, rhs: Node) -> Node {
    let span = ByteSpan::new(lhs.span().start, rhs.span().end);
    let mut node =
        Node::new(NodeKind::Binary, span).with_attr("operator", AttrValue::Str(operator.into()));
    node.push(lhs);
    node.push(rhs);
    node
}

fn is_ident_byte(b: u8) -> bool {
    matches!(b, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_')
}
