//! Type descriptor parsing into a bounded scratch arena.
//!
//! The compiler front end serializes the static type of every shown value
//! as a parenthesized descriptor string, e.g. `(ArrayType (IntType) 2)`.
//! The parser rebuilds that type as a compact tree inside a fixed 256-cell
//! arena owned by the calling render operation, so concurrent renders share
//! no state and need no external serialization.
//!
//! # Encoding
//!
//! Each node occupies one or more one-byte cells, addressed by [`NodeId`]:
//!
//! - cell values `250..=255` are tags: Void, Bool, Int, Float, Array,
//!   NdArray
//! - a cell value `0..=249` is a tuple header whose value is the arity,
//!   followed by one child-index cell per field
//! - Array is tag + element index (rank fixed at 1, the common case)
//! - NdArray is tag + rank + element index (rank `2..=255`)
//!
//! The single-byte cell space is a deliberate safety bound on descriptor
//! complexity. A descriptor that does not fit is rejected with a typed
//! error, never accommodated by growing the arena.

use thiserror::Error;

/// Number of one-byte cells in a descriptor arena.
pub const ARENA_CAPACITY: usize = 256;

/// Maximum number of tuple fields.
///
/// The arity shares the tag byte's value space, so it must stay below the
/// lowest tag value (250).
pub const MAX_TUPLE_FIELDS: usize = 249;

/// Maximum array rank (the rank cell is one byte).
pub const MAX_RANK: u32 = 255;

const TAG_VOID: u8 = 250;
const TAG_BOOL: u8 = 251;
const TAG_INT: u8 = 252;
const TAG_FLOAT: u8 = 253;
const TAG_ARRAY: u8 = 254;
const TAG_NDARRAY: u8 = 255;

/// Index of a type node in its arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NodeId(u8);

/// Decoded view of one arena node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Void,
    Bool,
    Int,
    Float,
    /// Rank-1 array (compact encoding).
    Array { elem: NodeId },
    /// Array of rank 2 or higher.
    NdArray { rank: u8, elem: NodeId },
    /// Field indices follow the header cell; resolve them with
    /// [`TypeArena::tuple_field`].
    Tuple { arity: usize },
}

/// Error from parsing a type descriptor.
///
/// Descriptors are toolchain-generated, so any of these signals a caller
/// bug; none is recoverable mid-parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Expected `(` followed by a known type keyword.
    #[error("could not parse type")]
    ExpectedType,
    /// A known keyword's literal or closing parenthesis did not match.
    #[error("could not parse {0} type")]
    Malformed(&'static str),
    /// A tuple body ran off the end of the descriptor.
    #[error("unterminated tuple type")]
    UnterminatedTuple,
    /// Non-whitespace input after the top-level type.
    #[error("trailing input after type descriptor")]
    TrailingInput,
    /// The descriptor needs more than the arena's 256 cells.
    #[error("type descriptor too complex: arena capacity of 256 cells exhausted")]
    ArenaExhausted,
    #[error("tuple has too many fields (limit 249)")]
    TupleTooLarge,
    /// Array rank of zero, or no rank digits at all.
    #[error("array rank is too small")]
    RankTooSmall,
    #[error("array rank is too large (limit 255)")]
    RankTooLarge,
}

/// Bounded cell storage for one parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeArena {
    cells: Vec<u8>,
}

impl TypeArena {
    fn new() -> Self {
        TypeArena {
            cells: Vec::with_capacity(ARENA_CAPACITY),
        }
    }

    /// Reserve `amt` contiguous cells, returning the index of the first.
    fn alloc(&mut self, amt: usize) -> Result<u8, DescriptorError> {
        if self.cells.len() + amt > ARENA_CAPACITY {
            return Err(DescriptorError::ArenaExhausted);
        }
        let at = self.cells.len() as u8;
        self.cells.resize(self.cells.len() + amt, 0);
        Ok(at)
    }

    /// Decode the node at `id`.
    pub fn kind(&self, id: NodeId) -> NodeKind {
        let at = id.0 as usize;
        match self.cells[at] {
            TAG_VOID => NodeKind::Void,
            TAG_BOOL => NodeKind::Bool,
            TAG_INT => NodeKind::Int,
            TAG_FLOAT => NodeKind::Float,
            TAG_ARRAY => NodeKind::Array {
                elem: NodeId(self.cells[at + 1]),
            },
            TAG_NDARRAY => NodeKind::NdArray {
                rank: self.cells[at + 1],
                elem: NodeId(self.cells[at + 2]),
            },
            arity => NodeKind::Tuple {
                arity: arity as usize,
            },
        }
    }

    /// Child node of the tuple at `id`.
    ///
    /// `index` must be below the tuple's arity.
    pub fn tuple_field(&self, id: NodeId, index: usize) -> NodeId {
        NodeId(self.cells[id.0 as usize + 1 + index])
    }

    /// Cells consumed by the parse that built this arena.
    pub fn cells_used(&self) -> usize {
        self.cells.len()
    }
}

/// A parsed descriptor: the arena plus the root node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedType {
    arena: TypeArena,
    root: NodeId,
}

impl ParsedType {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn arena(&self) -> &TypeArena {
        &self.arena
    }
}

/// Parse exactly one type descriptor.
///
/// Trailing whitespace is accepted; any other trailing input is an error.
/// The returned [`ParsedType`] owns its arena, so parses are independent
/// and deterministic: the same descriptor always yields the same cells.
pub fn parse_descriptor(descriptor: &str) -> Result<ParsedType, DescriptorError> {
    let mut parser = Parser {
        rest: descriptor,
        arena: TypeArena::new(),
    };
    let root = parser.parse_type()?;
    parser.skip_whitespace();
    if !parser.rest.is_empty() {
        return Err(DescriptorError::TrailingInput);
    }
    Ok(ParsedType {
        arena: parser.arena,
        root,
    })
}

struct Parser<'s> {
    rest: &'s str,
    arena: TypeArena,
}

impl Parser<'_> {
    /// The front end only ever emits spaces and newlines between tokens.
    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start_matches([' ', '\n']);
    }

    fn eat(&mut self, literal: &str, construct: &'static str) -> Result<(), DescriptorError> {
        match self.rest.strip_prefix(literal) {
            Some(rest) => {
                self.rest = rest;
                Ok(())
            }
            None => Err(DescriptorError::Malformed(construct)),
        }
    }

    fn parse_type(&mut self) -> Result<NodeId, DescriptorError> {
        self.skip_whitespace();
        self.rest = self
            .rest
            .strip_prefix('(')
            .ok_or(DescriptorError::ExpectedType)?;
        match self.rest.as_bytes().first() {
            Some(b'V') => self.parse_scalar("VoidType", "void", TAG_VOID),
            Some(b'B') => self.parse_scalar("BoolType", "boolean", TAG_BOOL),
            Some(b'I') => self.parse_scalar("IntType", "integer", TAG_INT),
            Some(b'F') => self.parse_scalar("FloatType", "floating", TAG_FLOAT),
            Some(b'T') => self.parse_tuple(),
            Some(b'A') => self.parse_array(),
            _ => Err(DescriptorError::ExpectedType),
        }
    }

    fn parse_scalar(
        &mut self,
        literal: &str,
        construct: &'static str,
        tag: u8,
    ) -> Result<NodeId, DescriptorError> {
        self.eat(literal, construct)?;
        self.skip_whitespace();
        self.eat(")", construct)?;

        let at = self.arena.alloc(1)?;
        self.arena.cells[at as usize] = tag;
        Ok(NodeId(at))
    }

    fn parse_tuple(&mut self) -> Result<NodeId, DescriptorError> {
        self.eat("TupleType", "tuple")?;
        self.skip_whitespace();

        let mut fields: Vec<u8> = Vec::new();
        while !self.rest.starts_with(')') {
            if self.rest.is_empty() {
                return Err(DescriptorError::UnterminatedTuple);
            }
            if fields.len() >= MAX_TUPLE_FIELDS {
                return Err(DescriptorError::TupleTooLarge);
            }
            let field = self.parse_type()?;
            fields.push(field.0);
            self.skip_whitespace();
        }
        self.eat(")", "tuple")?;

        let at = self.arena.alloc(1 + fields.len())?;
        self.arena.cells[at as usize] = fields.len() as u8;
        for (i, field) in fields.iter().enumerate() {
            self.arena.cells[at as usize + 1 + i] = *field;
        }
        Ok(NodeId(at))
    }

    fn parse_array(&mut self) -> Result<NodeId, DescriptorError> {
        self.eat("ArrayType", "array")?;
        self.skip_whitespace();

        let elem = self.parse_type()?;
        self.skip_whitespace();

        let mut rank: u32 = 0;
        while let Some(digit) = self.rest.as_bytes().first().copied().filter(u8::is_ascii_digit) {
            rank = 10 * rank + u32::from(digit - b'0');
            if rank > MAX_RANK {
                return Err(DescriptorError::RankTooLarge);
            }
            self.rest = &self.rest[1..];
        }
        if rank == 0 {
            return Err(DescriptorError::RankTooSmall);
        }
        self.skip_whitespace();
        self.eat(")", "array")?;

        // Rank 1 gets the compact two-cell encoding.
        if rank == 1 {
            let at = self.arena.alloc(2)?;
            self.arena.cells[at as usize] = TAG_ARRAY;
            self.arena.cells[at as usize + 1] = elem.0;
            Ok(NodeId(at))
        } else {
            let at = self.arena.alloc(3)?;
            self.arena.cells[at as usize] = TAG_NDARRAY;
            self.arena.cells[at as usize + 1] = rank as u8;
            self.arena.cells[at as usize + 2] = elem.0;
            Ok(NodeId(at))
        }
    }
}
