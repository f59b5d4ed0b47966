//! Type-signature parsing
//!
//! Turns a raw C++ type string reported by the host debugger into a
//! [`TypeNode`] tree. Template argument lists are split on commas at bracket
//! depth zero, so a comma inside a nested `<...>` (or inside a casted constant
//! like `(ck_tile::address_space_enum)1`) never splits the outer list.
//!
//! The parser is deliberately forgiving: debugger output is routinely
//! truncated (`...` arguments) or decorated with qualifiers, and a best-effort
//! tree with [`ParsedType::complete`] unset is far more useful than a refusal.
//! Only an empty string or irreparably unbalanced brackets produce a
//! [`ParseError`].

use crate::error::ParseError;
use cpp_demangle::Symbol as CppSymbol;
use rustc_demangle::demangle as rust_demangle;
use serde::Serialize;

/// One level of a generic type signature: a name plus ordered template
/// arguments. `args` is empty for non-generic leaf types. Immutable once
/// parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeNode {
    /// Qualifier-stripped, namespace-qualified name, e.g.
    /// `ck_tile::tensor_descriptor`. Non-type arguments (integer literals,
    /// casted enum constants) are leaves whose name is the literal token.
    pub name: String,
    /// Ordered template arguments
    pub args: Vec<TypeNode>,
}

impl TypeNode {
    /// Leaf node with no template arguments
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Name with the leading namespace path stripped, used for dispatch
    /// matching: `ck_tile::tensor_descriptor` -> `tensor_descriptor`.
    pub fn base_name(&self) -> &str {
        self.name.rsplit("::").next().unwrap_or(&self.name)
    }

    /// Parse this node's name as an integer literal, tolerating the `l`/`u`
    /// suffixes GDB prints on `constant<8192l>` style parameters.
    pub fn as_int_literal(&self) -> Option<i64> {
        if !self.args.is_empty() {
            return None;
        }
        let token = self.name.trim_end_matches(['l', 'L', 'u', 'U']);
        token.parse::<i64>().ok()
    }

    /// Depth-first search for the first node whose base name matches.
    pub fn find(&self, base: &str) -> Option<&TypeNode> {
        if self.base_name() == base {
            return Some(self);
        }
        self.args.iter().find_map(|a| a.find(base))
    }
}

impl std::fmt::Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", arg)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Result of parsing a type signature: the tree plus a flag recording whether
/// the whole input was understood. `complete == false` means some argument was
/// truncated or malformed and absorbed as a best-effort leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedType {
    pub root: TypeNode,
    pub complete: bool,
}

/// Parse a raw type-signature string into a [`TypeNode`] tree.
pub fn parse_type(input: &str) -> Result<ParsedType, ParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }
    check_balance(trimmed)?;

    let mut parser = Parser { complete: true };
    let root = parser.parse_node(trimmed);
    Ok(ParsedType {
        root,
        complete: parser.complete,
    })
}

/// Verify angle brackets balance, reporting the offset of the first violation.
fn check_balance(s: &str) -> Result<(), ParseError> {
    let mut depth: i64 = 0;
    for (offset, ch) in s.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth < 0 {
                    return Err(ParseError::Unbalanced { offset });
                }
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(ParseError::Unbalanced { offset: s.len() });
    }
    Ok(())
}

struct Parser {
    complete: bool,
}

impl Parser {
    /// Parse one type from a balanced slice. Strictly decreasing input length
    /// per recursive call guarantees termination.
    fn parse_node(&mut self, s: &str) -> TypeNode {
        let s = s.trim();

        let Some(lt) = find_template_open(s) else {
            return TypeNode::leaf(self.clean_name(s));
        };

        // Balanced by the precondition, so the matching '>' exists.
        let gt = matching_close(s, lt);
        let name = self.clean_name(&s[..lt]);
        let inner = &s[lt + 1..gt];
        let suffix = s[gt + 1..].trim();

        // Reference/pointer/const decoration after the closing bracket is
        // normalized away; anything else (nested member names, truncation
        // artifacts) is dropped as best-effort.
        if !suffix.is_empty() && !is_qualifier_suffix(suffix) {
            self.complete = false;
        }

        let mut args = Vec::new();
        for piece in split_top_level(inner) {
            let piece = piece.trim();
            if piece.is_empty() {
                // Stray comma or truncated argument list
                self.complete = false;
                continue;
            }
            if piece == "..." {
                // Debugger-truncated argument list
                self.complete = false;
                args.push(TypeNode::leaf("..."));
                continue;
            }
            args.push(self.parse_node(piece));
        }

        TypeNode { name, args }
    }

    /// Strip cv-qualifiers and reference/pointer decoration from a name token.
    fn clean_name(&mut self, raw: &str) -> String {
        let mut s = raw.trim();
        loop {
            if let Some(rest) = s.strip_prefix("const ") {
                s = rest.trim_start();
            } else if let Some(rest) = s.strip_prefix("volatile ") {
                s = rest.trim_start();
            } else {
                break;
            }
        }
        loop {
            if let Some(rest) = s.strip_suffix('&').or_else(|| s.strip_suffix('*')) {
                s = rest.trim_end();
            } else if let Some(rest) = s
                .strip_suffix(" const")
                .or_else(|| s.strip_suffix(" volatile"))
            {
                s = rest.trim_end();
            } else {
                break;
            }
        }
        if s.is_empty() {
            self.complete = false;
            return "?".to_string();
        }
        s.to_string()
    }
}

/// Offset of the first `<` that opens a template argument list, skipping any
/// text inside parentheses (casted constants).
fn find_template_open(s: &str) -> Option<usize> {
    let mut paren_depth = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            '<' if paren_depth == 0 => return Some(i),
            _ => {}
        }
    }
    None
}

/// Offset of the `>` matching the `<` at `open`. Caller guarantees balance.
fn matching_close(s: &str, open: usize) -> usize {
    let mut depth = 0usize;
    for (i, ch) in s[open..].char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return open + i;
                }
            }
            _ => {}
        }
    }
    s.len().saturating_sub(1)
}

/// Split a template argument list on commas at bracket depth zero.
fn split_top_level(s: &str) -> Vec<&str> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut angle_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '<' => angle_depth += 1,
            '>' => angle_depth = angle_depth.saturating_sub(1),
            '(' => paren_depth += 1,
            ')' => paren_depth = paren_depth.saturating_sub(1),
            ',' if angle_depth == 0 && paren_depth == 0 => {
                pieces.push(&s[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&s[start..]);
    pieces
}

/// True when the text after a closing `>` is only reference/pointer/const
/// decoration (e.g. `&`, `*`, `const&`, `const*`).
fn is_qualifier_suffix(suffix: &str) -> bool {
    suffix.split_whitespace().all(|tok| {
        let stripped: String = tok.chars().filter(|&c| c != '&' && c != '*').collect();
        stripped.is_empty() || stripped == "const" || stripped == "volatile"
    })
}

/// Demangle a linker symbol into a displayable name.
///
/// Tries C++ (Itanium) first, then Rust, then gives the input back unchanged.
pub fn demangle_symbol(mangled: &str) -> String {
    if let Ok(symbol) = CppSymbol::new(mangled) {
        if let Ok(demangled) = symbol.demangle(&cpp_demangle::DemangleOptions::default()) {
            return demangled;
        }
    }

    let demangled = rust_demangle(mangled).to_string();
    if demangled != mangled {
        return demangled;
    }

    mangled.to_string()
}
