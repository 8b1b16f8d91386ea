//! Symbol tables
//!
//! - [`SymbolTable`]: variables of one scope, with cumulative storage offsets
//! - [`FunctionTable`]: every defined function and its signature
//! - [`SymbolTables`]: the global table, the function table and one local
//!   table per function, owned by a single evaluation run
//!
//! Offsets are assigned in declaration order and only grow. Names are unique
//! within the table that owns them; a local table checks only its own
//! entries, so locals and parameters may shadow globals. Lookups from inside a
//! function try the local table first, then the global one.

use std::fmt;

use rustc_hash::FxHashMap;
use thiserror::Error;

use super::constants::{ADDRESS_WIDTH, INT_WIDTH};

/// Declared type of a variable or function return value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Void,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Void => write!(f, "void"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Int,
    Array { length: usize },
    /// A function parameter; `array` parameters are passed by address
    Param { array: bool },
}

impl SymbolKind {
    /// Storage width in bytes, `None` if it does not fit in a `usize`
    pub fn width(&self) -> Option<usize> {
        match self {
            SymbolKind::Int => Some(INT_WIDTH),
            SymbolKind::Array { length } => INT_WIDTH.checked_mul(*length),
            SymbolKind::Param { array: true } => Some(ADDRESS_WIDTH),
            SymbolKind::Param { array: false } => Some(INT_WIDTH),
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(
            self,
            SymbolKind::Array { .. } | SymbolKind::Param { array: true }
        )
    }

    /// Declared length, when the array's size is known
    pub fn length(&self) -> Option<usize> {
        match self {
            SymbolKind::Array { length } => Some(*length),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolRecord {
    pub name: String,
    pub kind: SymbolKind,
    pub width: usize,
    pub offset: usize,
}

/// Reasons a symbol cannot be appended to a table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    /// The name is already present in the table
    #[error("'{0}' is already defined")]
    Conflict(String),

    /// The symbol's width or its offset past the table end overflows
    #[error("'{0}' does not fit in the table's storage")]
    Overflow(String),
}

/// Variables of one scope
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    records: Vec<SymbolRecord>,
    index: FxHashMap<String, usize>,
    width: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a symbol at the current cumulative offset and return that offset.
    /// The table is unchanged on error.
    pub fn append(&mut self, name: &str, kind: SymbolKind) -> Result<usize, SymbolError> {
        if self.exist(name) {
            return Err(SymbolError::Conflict(name.to_string()));
        }

        let offset = self.width;
        let Some((width, end)) = kind
            .width()
            .and_then(|width| Some((width, offset.checked_add(width)?)))
        else {
            return Err(SymbolError::Overflow(name.to_string()));
        };
        self.index.insert(name.to_string(), self.records.len());
        self.records.push(SymbolRecord {
            name: name.to_string(),
            kind,
            width,
            offset,
        });
        self.width = end;
        Ok(offset)
    }

    pub fn exist(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn query(&self, name: &str) -> Option<&SymbolRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    /// Records in declaration order
    pub fn records(&self) -> &[SymbolRecord] {
        &self.records
    }

    /// Total storage width of the table
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Index of a function's local table within [`SymbolTables`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalTableId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    pub return_type: BaseType,
    /// Parameter kinds in declaration order
    pub params: Vec<SymbolKind>,
    pub table: LocalTableId,
}

#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    records: Vec<FunctionRecord>,
    index: FxHashMap<String, usize>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: FunctionRecord) -> Result<(), SymbolError> {
        if self.exist(&record.name) {
            return Err(SymbolError::Conflict(record.name));
        }
        self.index.insert(record.name.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn exist(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn query(&self, name: &str) -> Option<&FunctionRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn records(&self) -> &[FunctionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where a declaration or a name lookup happens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Global,
    Function(LocalTableId),
}

/// Every table of one compilation run
#[derive(Debug, Clone, Default)]
pub struct SymbolTables {
    pub global: SymbolTable,
    pub functions: FunctionTable,
    locals: Vec<SymbolTable>,
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty local table for a function being defined.
    pub fn new_local(&mut self) -> LocalTableId {
        self.locals.push(SymbolTable::new());
        LocalTableId(self.locals.len() - 1)
    }

    pub fn local(&self, id: LocalTableId) -> Option<&SymbolTable> {
        self.locals.get(id.0)
    }

    /// The table declarations in `scope` are appended to.
    pub fn table_mut(&mut self, scope: Scope) -> Option<&mut SymbolTable> {
        match scope {
            Scope::Global => Some(&mut self.global),
            Scope::Function(id) => self.locals.get_mut(id.0),
        }
    }

    /// Look `name` up from `scope`: the local table first, then the globals.
    pub fn resolve(&self, scope: Scope, name: &str) -> Option<&SymbolRecord> {
        let local = match scope {
            Scope::Global => None,
            Scope::Function(id) => self.local(id).and_then(|t| t.query(name)),
        };
        local.or_else(|| self.global.query(name))
    }

    /// Local table of the named function.
    pub fn function_locals(&self, name: &str) -> Option<&SymbolTable> {
        self.functions
            .query(name)
            .and_then(|f| self.local(f.table))
    }
}
