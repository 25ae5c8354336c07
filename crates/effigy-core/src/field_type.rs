use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FieldTypeParseError;

/// Scalar value kinds an entity field may declare.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Integer,
    Float,
    Boolean,
    Text,
    Bytes,
    Date,
    DateTime,
    Uuid,
    Decimal,
    Json,
    /// A scalar the builder has no dedicated mapping for (stored as text).
    Other(String),
}

impl ScalarType {
    /// Look up a scalar by one of its accepted annotation spellings.
    pub fn from_name(name: &str) -> Option<Self> {
        let scalar = match name {
            "int" | "integer" | "i32" | "i64" => ScalarType::Integer,
            "float" | "f32" | "f64" => ScalarType::Float,
            "bool" | "boolean" => ScalarType::Boolean,
            "str" | "string" | "String" | "text" => ScalarType::Text,
            "bytes" | "bytearray" => ScalarType::Bytes,
            "date" => ScalarType::Date,
            "datetime" | "DateTime" => ScalarType::DateTime,
            "uuid" | "UUID" | "Uuid" => ScalarType::Uuid,
            "decimal" | "Decimal" => ScalarType::Decimal,
            "json" | "Json" => ScalarType::Json,
            _ => return None,
        };
        Some(scalar)
    }

    /// Canonical annotation spelling.
    pub fn name(&self) -> &str {
        match self {
            ScalarType::Integer => "int",
            ScalarType::Float => "float",
            ScalarType::Boolean => "bool",
            ScalarType::Text => "str",
            ScalarType::Bytes => "bytes",
            ScalarType::Date => "date",
            ScalarType::DateTime => "datetime",
            ScalarType::Uuid => "uuid",
            ScalarType::Decimal => "decimal",
            ScalarType::Json => "json",
            ScalarType::Other(name) => name,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, ScalarType::Text)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, ScalarType::Integer)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    Set,
    Map,
}

impl CollectionKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "list" | "List" | "Sequence" | "Vec" => Some(CollectionKind::List),
            "set" | "Set" | "frozenset" | "FrozenSet" | "HashSet" | "BTreeSet" => {
                Some(CollectionKind::Set)
            }
            "dict" | "Dict" | "Mapping" | "HashMap" | "BTreeMap" => Some(CollectionKind::Map),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CollectionKind::List => "list",
            CollectionKind::Set => "set",
            CollectionKind::Map => "dict",
        }
    }

    /// Number of type arguments the collection takes.
    pub fn arity(self) -> usize {
        match self {
            CollectionKind::List | CollectionKind::Set => 1,
            CollectionKind::Map => 2,
        }
    }
}

/// Declared type of an entity field.
///
/// This is the annotation as written on the record shape, before any column
/// inference happens. It parses from (and prints to) a compact annotation
/// syntax such as `int | None`, `Optional[str]`, `list["Tag"]` or
/// `dict[str, str]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldType {
    Scalar(ScalarType),
    /// The absence marker (`None`).
    None,
    Union(Vec<FieldType>),
    Collection {
        kind: CollectionKind,
        args: Vec<FieldType>,
    },
    /// Reference to another entity by name, resolved through a type registry.
    Entity(String),
}

impl FieldType {
    pub fn int() -> Self {
        FieldType::Scalar(ScalarType::Integer)
    }

    pub fn float() -> Self {
        FieldType::Scalar(ScalarType::Float)
    }

    pub fn boolean() -> Self {
        FieldType::Scalar(ScalarType::Boolean)
    }

    pub fn text() -> Self {
        FieldType::Scalar(ScalarType::Text)
    }

    pub fn scalar(scalar: ScalarType) -> Self {
        FieldType::Scalar(scalar)
    }

    /// `T | None`
    pub fn optional(inner: FieldType) -> Self {
        FieldType::union([inner, FieldType::None])
    }

    /// Builds a union, flattening nested unions and dropping duplicate arms.
    /// A union that collapses to a single arm is returned as that arm.
    pub fn union(arms: impl IntoIterator<Item = FieldType>) -> Self {
        let mut flat: Vec<FieldType> = Vec::new();
        for arm in arms {
            let nested = match arm {
                FieldType::Union(inner) => inner,
                other => vec![other],
            };
            for ty in nested {
                if !flat.contains(&ty) {
                    flat.push(ty);
                }
            }
        }
        if flat.len() == 1 {
            flat.remove(0)
        } else {
            FieldType::Union(flat)
        }
    }

    pub fn entity(name: impl Into<String>) -> Self {
        FieldType::Entity(name.into())
    }

    pub fn list_of(element: FieldType) -> Self {
        FieldType::Collection {
            kind: CollectionKind::List,
            args: vec![element],
        }
    }

    pub fn set_of(element: FieldType) -> Self {
        FieldType::Collection {
            kind: CollectionKind::Set,
            args: vec![element],
        }
    }

    pub fn dict_of(key: FieldType, value: FieldType) -> Self {
        FieldType::Collection {
            kind: CollectionKind::Map,
            args: vec![key, value],
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, FieldType::None)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, FieldType::Collection { .. })
    }

    /// The `T` of a two-armed `T | None` union.
    pub fn optional_inner(&self) -> Option<&FieldType> {
        match self {
            FieldType::Union(arms) if arms.len() == 2 => match (&arms[0], &arms[1]) {
                (FieldType::None, inner) | (inner, FieldType::None) if !inner.is_none() => {
                    Some(inner)
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// True for `int | None`, the only shape a database-generated key may take.
    pub fn is_optional_integer(&self) -> bool {
        matches!(
            self.optional_inner(),
            Some(FieldType::Scalar(ScalarType::Integer))
        )
    }

    /// Single type argument of a one-argument collection (`list[T]`, `set[T]`).
    pub fn element_type(&self) -> Option<&FieldType> {
        match self {
            FieldType::Collection { args, .. } if args.len() == 1 => args.first(),
            _ => None,
        }
    }
}

fn needs_quotes(name: &str) -> bool {
    let starts_upper = name.chars().next().is_some_and(|c| c.is_uppercase());
    !starts_upper
        || ScalarType::from_name(name).is_some()
        || CollectionKind::from_name(name).is_some()
        || matches!(name, "None" | "NoneType" | "Optional" | "Union")
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Scalar(scalar) => write!(f, "{}", scalar),
            FieldType::None => f.write_str("None"),
            FieldType::Union(arms) => {
                for (i, arm) in arms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{}", arm)?;
                }
                Ok(())
            }
            FieldType::Collection { kind, args } => {
                write!(f, "{}[", kind.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str("]")
            }
            FieldType::Entity(name) if needs_quotes(name) => write!(f, "\"{}\"", name),
            FieldType::Entity(name) => f.write_str(name),
        }
    }
}

impl From<ScalarType> for FieldType {
    fn from(value: ScalarType) -> Self {
        FieldType::Scalar(value)
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for FieldType {
    type Error = FieldTypeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for FieldType {
    type Error = FieldTypeParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for FieldType {
    type Err = FieldTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let error = |reason: String| FieldTypeParseError {
            input: s.to_string(),
            reason,
        };
        let tokens = tokenize(s).map_err(error)?;
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
        };
        let ty = parser.parse_union().map_err(error)?;
        if let Some(token) = parser.tokens.get(parser.pos) {
            return Err(error(format!("unexpected trailing {}", token)));
        }
        Ok(ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Quoted(String),
    Open,
    Close,
    Comma,
    Pipe,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(ident) => write!(f, "identifier '{}'", ident),
            Token::Quoted(name) => write!(f, "reference \"{}\"", name),
            Token::Open => f.write_str("'['"),
            Token::Close => f.write_str("']'"),
            Token::Comma => f.write_str("','"),
            Token::Pipe => f.write_str("'|'"),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

fn tokenize(input: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '[' | ']' | ',' | '|' => {
                chars.next();
                tokens.push(match c {
                    '[' => Token::Open,
                    ']' => Token::Close,
                    ',' => Token::Comma,
                    _ => Token::Pipe,
                });
            }
            '"' | '\'' => {
                chars.next();
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some(ch) if ch == c => break,
                        Some(ch) => name.push(ch),
                        None => return Err("unterminated quoted reference".to_string()),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err("empty quoted reference".to_string());
                }
                tokens.push(Token::Quoted(name.to_string()));
            }
            c if is_ident_char(c) => {
                let mut ident = String::new();
                while let Some(&ch) = chars.peek() {
                    if !is_ident_char(ch) {
                        break;
                    }
                    ident.push(ch);
                    chars.next();
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character '{}'", other)),
        }
    }

    Ok(tokens)
}

/// Deepest bracket nesting an annotation may use.
const MAX_NESTING: usize = 32;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.tokens.get(self.pos) == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_union(&mut self) -> Result<FieldType, String> {
        let mut arms = vec![self.parse_primary()?];
        while self.eat(&Token::Pipe) {
            arms.push(self.parse_primary()?);
        }
        Ok(FieldType::union(arms))
    }

    fn parse_primary(&mut self) -> Result<FieldType, String> {
        match self.next() {
            Some(Token::Quoted(name)) => Ok(FieldType::Entity(name)),
            Some(Token::Ident(ident)) => {
                // `typing.Optional` and `datetime.date` keep only their last segment
                let name = match ident.rsplit_once('.') {
                    Some((_, last)) => last.to_string(),
                    None => ident,
                };
                let args = if self.eat(&Token::Open) {
                    self.parse_args()?
                } else {
                    Vec::new()
                };
                build_named(&name, args)
            }
            Some(token) => Err(format!("unexpected {}", token)),
            None => Err("unexpected end of annotation".to_string()),
        }
    }

    fn parse_args(&mut self) -> Result<Vec<FieldType>, String> {
        if self.depth >= MAX_NESTING {
            return Err("annotation nested too deeply".to_string());
        }
        self.depth += 1;
        let mut args = Vec::new();
        let result = loop {
            args.push(self.parse_union()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Close) => break Ok(args),
                Some(token) => break Err(format!("expected ',' or ']', found {}", token)),
                None => break Err("missing closing ']'".to_string()),
            }
        };
        self.depth -= 1;
        result
    }
}

fn build_named(name: &str, mut args: Vec<FieldType>) -> Result<FieldType, String> {
    if name.is_empty() {
        return Err("empty identifier".to_string());
    }

    match name {
        "None" | "NoneType" if args.is_empty() => return Ok(FieldType::None),
        "Optional" => {
            if args.len() != 1 {
                return Err(format!("Optional takes 1 argument, found {}", args.len()));
            }
            return Ok(FieldType::optional(args.remove(0)));
        }
        "Union" => {
            if args.is_empty() {
                return Err("Union requires at least one argument".to_string());
            }
            return Ok(FieldType::union(args));
        }
        _ => {}
    }

    if let Some(kind) = CollectionKind::from_name(name) {
        if args.len() != kind.arity() {
            return Err(format!(
                "{} takes {} type argument(s), found {}",
                name,
                kind.arity(),
                args.len()
            ));
        }
        return Ok(FieldType::Collection { kind, args });
    }

    if !args.is_empty() {
        return Err(format!("unsupported generic type '{}'", name));
    }

    if let Some(scalar) = ScalarType::from_name(name) {
        return Ok(FieldType::Scalar(scalar));
    }

    if name.chars().next().is_some_and(|c| c.is_uppercase()) {
        Ok(FieldType::Entity(name.to_string()))
    } else {
        Ok(FieldType::Scalar(ScalarType::Other(name.to_string())))
    }
}
