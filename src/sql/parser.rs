//! SQL Parser
//!
//! This module parses the tokens of one statement into an AST. It is a
//! recursive-descent parser with one token of lookahead and no backtracking.

use super::ast::*;
use super::lexer::Lexer;
use super::token::{Keyword, Token, TokenKind};
use crate::catalog::{ColumnDefinition, DataType, ForeignKey};
use crate::error::{Error, Result};
use crate::storage::Value;

/// SQL Parser
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    /// Returned by `current` once the tokens run out
    eof: Token,
}

/// A table-level clause, folded onto its column once the body is parsed
enum TableConstraint {
    PrimaryKey(String),
    Unique(String),
    ForeignKey {
        column: String,
        ref_table: String,
        ref_column: String,
    },
}

impl Parser {
    /// Create a new parser over the tokens of one statement
    pub fn new(tokens: Vec<Token>) -> Self {
        let end = tokens.last().map(|t| t.offset + t.lexeme.len()).unwrap_or(0);
        Self {
            tokens,
            position: 0,
            eof: Token::eof(end),
        }
    }

    /// Parse a single SQL statement. An optional `;` may follow it; anything
    /// else after the statement is an error.
    pub fn parse(&mut self) -> Result<Statement> {
        let stmt = self.parse_statement()?;

        // Consume optional semicolon
        if self.check(&TokenKind::Semicolon) {
            self.advance();
        }

        if !self.is_at_end() {
            return Err(self.error("end of statement"));
        }

        Ok(stmt)
    }

    /// Parse a single statement
    fn parse_statement(&mut self) -> Result<Statement> {
        match self.current().keyword() {
            Some(Keyword::Create) => self.parse_create_table().map(Statement::CreateTable),
            Some(Keyword::Insert) => self.parse_insert().map(Statement::Insert),
            Some(Keyword::Select) => self.parse_select().map(Statement::Select),
            _ => Err(self.error("CREATE, INSERT or SELECT")),
        }
    }

    // ========== SELECT Statement ==========

    fn parse_select(&mut self) -> Result<SelectStatement> {
        self.expect_keyword(Keyword::Select)?;

        let projections = self.parse_select_list()?;

        self.expect_keyword(Keyword::From)?;
        let from = self.expect_identifier()?;

        let mut joins = Vec::new();
        while self.is_join_keyword() {
            joins.push(self.parse_join()?);
        }

        let where_clause = if self.check_keyword(Keyword::Where) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(SelectStatement {
            projections,
            from,
            joins,
            where_clause,
        })
    }

    fn parse_select_list(&mut self) -> Result<Vec<SelectItem>> {
        let mut items = Vec::new();

        loop {
            items.push(self.parse_select_item()?);

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(items)
    }

    fn parse_select_item(&mut self) -> Result<SelectItem> {
        if self.check(&TokenKind::Asterisk) {
            self.advance();
            return Ok(SelectItem::Wildcard);
        }

        let first = self.expect_identifier()?;
        if !self.check(&TokenKind::Dot) {
            return Ok(SelectItem::Column(ColumnRef::new(None, &first)));
        }
        self.advance();

        if self.check(&TokenKind::Asterisk) {
            self.advance();
            return Ok(SelectItem::QualifiedWildcard(first));
        }
        let column = self.expect_identifier()?;
        Ok(SelectItem::Column(ColumnRef::qualified(&first, &column)))
    }

    fn is_join_keyword(&self) -> bool {
        self.check_keyword(Keyword::Join) || self.check_keyword(Keyword::Inner)
    }

    fn parse_join(&mut self) -> Result<Join> {
        if self.check_keyword(Keyword::Inner) {
            self.advance();
        }
        self.expect_keyword(Keyword::Join)?;

        let table = self.expect_identifier()?;
        self.expect_keyword(Keyword::On)?;
        let left = self.parse_column_ref()?;
        self.expect(&TokenKind::Eq)?;
        let right = self.parse_column_ref()?;

        Ok(Join { table, left, right })
    }

    fn parse_column_ref(&mut self) -> Result<ColumnRef> {
        let first = self.expect_identifier()?;
        if self.check(&TokenKind::Dot) {
            self.advance();
            let column = self.expect_identifier()?;
            Ok(ColumnRef::qualified(&first, &column))
        } else {
            Ok(ColumnRef::new(None, &first))
        }
    }

    // ========== INSERT Statement ==========

    fn parse_insert(&mut self) -> Result<InsertStatement> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;

        let table = self.expect_identifier()?;

        // Optional column list
        let columns = if self.check(&TokenKind::LParen) {
            self.advance();
            let cols = self.parse_identifier_list()?;
            self.expect(&TokenKind::RParen)?;
            Some(cols)
        } else {
            None
        };

        self.expect_keyword(Keyword::Values)?;

        let mut values = Vec::new();
        loop {
            self.expect(&TokenKind::LParen)?;
            let row = self.parse_literal_list()?;
            self.expect(&TokenKind::RParen)?;

            if let Some(cols) = &columns {
                if row.len() != cols.len() {
                    return Err(Error::ArityMismatch {
                        table,
                        expected: cols.len(),
                        found: row.len(),
                        row: values.len(),
                    });
                }
            }
            values.push(row);

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(InsertStatement {
            table,
            columns,
            values,
        })
    }

    fn parse_literal_list(&mut self) -> Result<Vec<Value>> {
        let mut literals = Vec::new();

        loop {
            literals.push(self.parse_literal()?);

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(literals)
    }

    fn parse_literal(&mut self) -> Result<Value> {
        let value = match &self.current().kind {
            TokenKind::Integer(n) => Value::Integer(*n),
            TokenKind::Real(n) => Value::Real(*n),
            TokenKind::String(s) => Value::Text(s.clone()),
            _ if self.check_keyword(Keyword::Null) => Value::Null,
            _ => return Err(self.error("literal")),
        };
        self.advance();
        Ok(value)
    }

    // ========== CREATE TABLE Statement ==========

    fn parse_create_table(&mut self) -> Result<CreateTableStatement> {
        self.expect_keyword(Keyword::Create)?;
        self.expect_keyword(Keyword::Table)?;

        // IF is not reserved, so `CREATE TABLE if (...)` names a table
        let if_not_exists =
            self.check_keyword(Keyword::If) && self.peek(1).is_keyword(Keyword::Not);
        if if_not_exists {
            self.advance();
            self.advance();
            self.expect_keyword(Keyword::Exists)?;
        }

        let mut schema = None;
        let mut name = self.expect_identifier()?;
        if self.check(&TokenKind::Dot) {
            self.advance();
            schema = Some(name);
            name = self.expect_identifier()?;
        }

        self.expect(&TokenKind::LParen)?;

        let mut columns = Vec::new();
        let mut constraints = Vec::new();

        loop {
            // Check for table constraint
            if self.check_keyword(Keyword::Primary)
                || self.check_keyword(Keyword::Foreign)
                || self.check_keyword(Keyword::Unique)
                || self.check_keyword(Keyword::Constraint)
            {
                constraints.push(self.parse_table_constraint()?);
            } else {
                columns.push(self.parse_column_def()?);
            }

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        self.expect(&TokenKind::RParen)?;

        for constraint in constraints {
            apply_table_constraint(&name, &mut columns, constraint)?;
        }

        Ok(CreateTableStatement {
            if_not_exists,
            schema,
            name,
            columns,
        })
    }

    fn parse_column_def(&mut self) -> Result<ColumnDefinition> {
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;
        let mut column = ColumnDefinition::new(name, data_type);

        // Parse column constraints
        loop {
            match self.current().keyword() {
                Some(Keyword::Not) => {
                    self.advance();
                    self.expect_keyword(Keyword::Null)?;
                    column.not_null = true;
                }
                Some(Keyword::Null) => {
                    // NULL is allowed (default)
                    self.advance();
                }
                Some(Keyword::Primary) => {
                    self.advance();
                    self.expect_keyword(Keyword::Key)?;
                    column.primary_key = true;

                    // Sort order is accepted and ignored
                    if self.check_keyword(Keyword::Asc) || self.check_keyword(Keyword::Desc) {
                        self.advance();
                    }
                    if self.check_keyword(Keyword::Autoincrement) {
                        self.advance();
                        column.autoincrement = true;
                    }
                }
                Some(Keyword::Unique) => {
                    self.advance();
                    column.unique = true;
                }
                Some(Keyword::References) => {
                    let (table, col) = self.parse_references()?;
                    column = column.references(table, col);
                }
                _ => break,
            }
        }

        Ok(column)
    }

    fn parse_data_type(&mut self) -> Result<DataType> {
        let dt = match self.current().keyword() {
            Some(Keyword::Int | Keyword::Integer) => DataType::Integer,
            Some(Keyword::Real | Keyword::Float | Keyword::Double) => DataType::Real,
            Some(Keyword::Text) => DataType::Text,
            Some(Keyword::Varchar | Keyword::Char) => {
                self.advance();
                // The declared length is accepted and ignored
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    self.expect_integer()?;
                    self.expect(&TokenKind::RParen)?;
                }
                return Ok(DataType::Text);
            }
            _ => return Err(self.error("data type")),
        };
        self.advance();
        Ok(dt)
    }

    fn parse_table_constraint(&mut self) -> Result<TableConstraint> {
        // Optional constraint name, not kept
        if self.check_keyword(Keyword::Constraint) {
            self.advance();
            self.expect_identifier()?;
        }

        match self.current().keyword() {
            Some(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let column = self.parse_single_column()?;
                Ok(TableConstraint::PrimaryKey(column))
            }
            Some(Keyword::Unique) => {
                self.advance();
                let column = self.parse_single_column()?;
                Ok(TableConstraint::Unique(column))
            }
            Some(Keyword::Foreign) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                let column = self.parse_single_column()?;
                let (ref_table, ref_column) = self.parse_references()?;
                Ok(TableConstraint::ForeignKey {
                    column,
                    ref_table,
                    ref_column,
                })
            }
            _ => Err(self.error("PRIMARY, UNIQUE or FOREIGN")),
        }
    }

    /// `REFERENCES table(column)`
    fn parse_references(&mut self) -> Result<(String, String)> {
        self.expect_keyword(Keyword::References)?;
        let table = self.expect_identifier()?;
        let column = self.parse_single_column()?;
        Ok((table, column))
    }

    /// `(column)`
    fn parse_single_column(&mut self) -> Result<String> {
        self.expect(&TokenKind::LParen)?;
        let column = self.expect_identifier()?;
        self.expect(&TokenKind::RParen)?;
        Ok(column)
    }

    // ========== Expressions ==========

    fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or_expr()
    }

    fn parse_or_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_and_expr()?;

        while self.check_keyword(Keyword::Or) {
            self.advance();
            let right = self.parse_and_expr()?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op: BinaryOperator::Or,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_and_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_comparison_expr()?;

        while self.check_keyword(Keyword::And) {
            self.advance();
            let right = self.parse_comparison_expr()?;
            left = Expr::BinaryOp {
                left: Box::new(left),
                op: BinaryOperator::And,
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    /// A parenthesized condition, or `operand op operand`
    fn parse_comparison_expr(&mut self) -> Result<Expr> {
        if self.check(&TokenKind::LParen) {
            self.advance();
            let expr = self.parse_expr()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(expr);
        }

        let left = self.parse_primary_expr()?;

        let op = match self.current().kind {
            TokenKind::Eq => BinaryOperator::Eq,
            TokenKind::Neq => BinaryOperator::Neq,
            TokenKind::Lt => BinaryOperator::Lt,
            TokenKind::Gt => BinaryOperator::Gt,
            TokenKind::Lte => BinaryOperator::Lte,
            TokenKind::Gte => BinaryOperator::Gte,
            _ => return Err(self.error("comparison operator")),
        };
        self.advance();

        let right = self.parse_primary_expr()?;

        Ok(Expr::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    /// Column reference or literal
    fn parse_primary_expr(&mut self) -> Result<Expr> {
        match &self.current().kind {
            TokenKind::Word(_) if !self.check_keyword(Keyword::Null) => {
                self.parse_column_ref().map(Expr::Column)
            }
            TokenKind::QuotedIdent(_) => self.parse_column_ref().map(Expr::Column),
            _ => self
                .parse_literal()
                .map_err(|_| self.error("column or literal"))
                .map(Expr::Literal),
        }
    }

    // ========== Helpers ==========

    fn parse_identifier_list(&mut self) -> Result<Vec<String>> {
        let mut identifiers = Vec::new();

        loop {
            identifiers.push(self.expect_identifier()?);

            if !self.check(&TokenKind::Comma) {
                break;
            }
            self.advance();
        }

        Ok(identifiers)
    }

    fn current(&self) -> &Token {
        self.peek(0)
    }

    fn peek(&self, ahead: usize) -> &Token {
        self.tokens.get(self.position + ahead).unwrap_or(&self.eof)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current().is_keyword(keyword)
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<()> {
        if self.check(kind) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("'{}'", kind)))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<()> {
        if self.check_keyword(keyword) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(keyword.as_str()))
        }
    }

    /// A plain word that is not a reserved keyword, or a quoted identifier
    fn expect_identifier(&mut self) -> Result<String> {
        let name = match &self.current().kind {
            TokenKind::Word(w) if Keyword::from_word(w).map_or(true, |k| !k.is_reserved()) => {
                w.clone()
            }
            TokenKind::QuotedIdent(w) => w.clone(),
            _ => return Err(self.error("identifier")),
        };
        self.advance();
        Ok(name)
    }

    fn expect_integer(&mut self) -> Result<i64> {
        match self.current().kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(n)
            }
            _ => Err(self.error("integer")),
        }
    }

    /// Syntax error at the current token
    fn error(&self, expected: &str) -> Error {
        let token = self.current();
        Error::SyntaxError {
            expected: expected.to_string(),
            found: token.kind.to_string(),
            offset: token.offset,
        }
    }
}

/// Fold a table-level clause onto the named column
fn apply_table_constraint(
    table: &str,
    columns: &mut [ColumnDefinition],
    constraint: TableConstraint,
) -> Result<()> {
    let name = match &constraint {
        TableConstraint::PrimaryKey(c) | TableConstraint::Unique(c) => c,
        TableConstraint::ForeignKey { column, .. } => column,
    };
    let column = columns
        .iter_mut()
        .find(|c| &c.name == name)
        .ok_or_else(|| Error::ColumnNotFound {
            table: table.to_string(),
            column: name.clone(),
        })?;

    match constraint {
        TableConstraint::PrimaryKey(_) => column.primary_key = true,
        TableConstraint::Unique(_) => column.unique = true,
        TableConstraint::ForeignKey {
            ref_table,
            ref_column,
            ..
        } => {
            column.references = Some(ForeignKey {
                table: ref_table,
                column: ref_column,
            })
        }
    }
    Ok(())
}

/// Parse the tokens of one statement
pub fn parse(tokens: Vec<Token>) -> Result<Statement> {
    Parser::new(tokens).parse()
}

/// Tokenize and parse one statement of SQL text
pub fn parse_sql(sql: &str) -> Result<Statement> {
    let tokens = Lexer::new(sql).tokenize()?;
    parse(tokens)
}
