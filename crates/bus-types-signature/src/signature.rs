//! Parser for generic signatures as stored in the class-file `Signature` attribute (JVMS 4.7.9.1).

use bus_types::PrimitiveType;

use crate::descriptor::{array_dimensions, base_type, MAX_ARRAY_DIMENSIONS};
use crate::error::{Result, SignatureError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSignature {
    Base(PrimitiveType),
    Class(ClassTypeSignature),
    TypeVar(String),
    Array(Box<TypeSignature>),
}

/// `Lpkg/Outer<A>.Inner<B>;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassTypeSignature {
    pub package: Vec<String>,
    /// Outermost first. Never empty.
    pub segments: Vec<SimpleClassTypeSignature>,
}

impl ClassTypeSignature {
    /// Binary name of the class, e.g. `java.util.Map$Entry`.
    pub fn binary_name(&self) -> String {
        self.binary_name_of_prefix(self.segments.len())
    }

    /// Binary name of the class named by the first `len` segments.
    pub fn binary_name_of_prefix(&self, len: usize) -> String {
        let mut name = String::new();
        for part in &self.package {
            name.push_str(part);
            name.push('.');
        }
        for (idx, segment) in self.segments.iter().take(len).enumerate() {
            if idx > 0 {
                name.push('$');
            }
            name.push_str(&segment.name);
        }
        name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleClassTypeSignature {
    pub name: String,
    pub type_arguments: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeArgument {
    /// `*`
    Any,
    /// `+Bound`
    Extends(TypeSignature),
    /// `-Bound`
    Super(TypeSignature),
    Exact(TypeSignature),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameter {
    pub name: String,
    /// Absent for `T::Ljava/lang/Comparable;` (interface-only bounds).
    pub class_bound: Option<TypeSignature>,
    pub interface_bounds: Vec<TypeSignature>,
}

impl TypeParameter {
    pub fn bounds(&self) -> impl Iterator<Item = &TypeSignature> {
        self.class_bound.iter().chain(&self.interface_bounds)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub super_class: ClassTypeSignature,
    pub interfaces: Vec<ClassTypeSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<TypeSignature>,
    /// `None` for `void`.
    pub return_type: Option<TypeSignature>,
    pub throws: Vec<TypeSignature>,
}

pub fn parse_class_signature(signature: &str) -> Result<ClassSignature> {
    let mut parser = Parser::new(signature);
    let type_parameters = parser.type_parameters()?;
    let super_class = parser.class_type()?;
    let mut interfaces = Vec::new();
    while !parser.at_end() {
        interfaces.push(parser.class_type()?);
    }
    Ok(ClassSignature {
        type_parameters,
        super_class,
        interfaces,
    })
}

/// Parse a field signature. Base types are accepted too, so the same entry point works for
/// parameter and return types taken out of a method signature.
pub fn parse_field_signature(signature: &str) -> Result<TypeSignature> {
    let mut parser = Parser::new(signature);
    let ty = parser.java_type()?;
    parser.finish()?;
    Ok(ty)
}

pub fn parse_method_signature(signature: &str) -> Result<MethodSignature> {
    let mut parser = Parser::new(signature);
    let type_parameters = parser.type_parameters()?;
    parser.expect('(', "expected '('")?;
    let mut parameters = Vec::new();
    while !parser.eat(')') {
        parameters.push(parser.java_type()?);
    }
    let return_type = if parser.eat('V') {
        None
    } else {
        Some(parser.java_type()?)
    };
    let mut throws = Vec::new();
    while parser.eat('^') {
        let thrown = match parser.peek() {
            Some('T') => parser.type_var()?,
            _ => TypeSignature::Class(parser.class_type()?),
        };
        throws.push(thrown);
    }
    parser.finish()?;
    Ok(MethodSignature {
        type_parameters,
        parameters,
        return_type,
        throws,
    })
}

/// Deepest accepted nesting of type argument lists, as in `List<List<List<T>>>`.
const MAX_TYPE_ARGUMENT_DEPTH: usize = 64;

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    /// Type argument lists currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn error(&self, message: &'static str) -> SignatureError {
        SignatureError::Invalid {
            signature: self.input.to_string(),
            position: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, c: char, message: &'static str) -> Result<()> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    fn finish(&self) -> Result<()> {
        if self.at_end() {
            Ok(())
        } else {
            Err(self.error("trailing characters"))
        }
    }

    fn identifier(&mut self) -> Result<&'a str> {
        let rest = &self.input[self.pos..];
        let len = rest
            .find(|c| matches!(c, '.' | ';' | '[' | '/' | '<' | '>' | ':'))
            .unwrap_or(rest.len());
        if len == 0 {
            return Err(self.error("expected an identifier"));
        }
        self.pos += len;
        Ok(&rest[..len])
    }

    fn type_parameters(&mut self) -> Result<Vec<TypeParameter>> {
        let mut params = Vec::new();
        if !self.eat('<') {
            return Ok(params);
        }
        while !self.eat('>') {
            let name = self.identifier()?.to_string();
            self.expect(':', "expected ':' before a class bound")?;
            let class_bound = match self.peek() {
                Some(':') | None => None,
                _ => Some(self.reference_type()?),
            };
            let mut interface_bounds = Vec::new();
            while self.eat(':') {
                interface_bounds.push(self.reference_type()?);
            }
            params.push(TypeParameter {
                name,
                class_bound,
                interface_bounds,
            });
        }
        if params.is_empty() {
            return Err(self.error("empty type parameter list"));
        }
        Ok(params)
    }

    fn java_type(&mut self) -> Result<TypeSignature> {
        let Some(base) = self.peek().and_then(base_type) else {
            return self.reference_type();
        };
        self.pos += 1;
        Ok(TypeSignature::Base(base))
    }

    fn reference_type(&mut self) -> Result<TypeSignature> {
        match self.peek() {
            Some('L') => Ok(TypeSignature::Class(self.class_type()?)),
            Some('T') => self.type_var(),
            Some('[') => {
                let dimensions = array_dimensions(&self.input[self.pos..]);
                if dimensions > MAX_ARRAY_DIMENSIONS {
                    self.pos += MAX_ARRAY_DIMENSIONS;
                    return Err(self.error("too many array dimensions"));
                }
                self.pos += dimensions;
                let mut ty = self.java_type()?;
                for _ in 0..dimensions {
                    ty = TypeSignature::Array(Box::new(ty));
                }
                Ok(ty)
            }
            _ => Err(self.error("expected a reference type")),
        }
    }

    fn type_var(&mut self) -> Result<TypeSignature> {
        self.expect('T', "expected 'T'")?;
        let name = self.identifier()?.to_string();
        self.expect(';', "expected ';' after a type variable")?;
        Ok(TypeSignature::TypeVar(name))
    }

    fn class_type(&mut self) -> Result<ClassTypeSignature> {
        self.expect('L', "expected 'L'")?;
        let mut package = Vec::new();
        let mut name = self.identifier()?;
        while self.eat('/') {
            package.push(name.to_string());
            name = self.identifier()?;
        }

        let mut segments = vec![SimpleClassTypeSignature {
            name: name.to_string(),
            type_arguments: self.type_arguments()?,
        }];
        while self.eat('.') {
            let name = self.identifier()?.to_string();
            segments.push(SimpleClassTypeSignature {
                name,
                type_arguments: self.type_arguments()?,
            });
        }
        self.expect(';', "expected ';' after a class type")?;
        Ok(ClassTypeSignature { package, segments })
    }

    fn type_arguments(&mut self) -> Result<Vec<TypeArgument>> {
        let mut args = Vec::new();
        if self.peek() != Some('<') {
            return Ok(args);
        }
        if self.depth == MAX_TYPE_ARGUMENT_DEPTH {
            return Err(self.error("type arguments nested too deeply"));
        }
        self.pos += 1;
        self.depth += 1;
        while !self.eat('>') {
            let arg = if self.eat('*') {
                TypeArgument::Any
            } else if self.eat('+') {
                TypeArgument::Extends(self.reference_type()?)
            } else if self.eat('-') {
                TypeArgument::Super(self.reference_type()?)
            } else {
                TypeArgument::Exact(self.reference_type()?)
            };
            args.push(arg);
        }
        if args.is_empty() {
            return Err(self.error("empty type argument list"));
        }
        self.depth -= 1;
        Ok(args)
    }
}
