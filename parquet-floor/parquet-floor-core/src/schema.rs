//! Parquet-shaped schema tree consumed by the marshallers.

use std::fmt::{self, Display, Formatter, Write as _};

use crate::error::{MarshalError, SchemaError};

/// Name of the repeated group directly below a LIST-annotated node.
pub const LIST_GROUP_NAME: &str = "list";
/// Name of the element field inside the LIST repeated group.
pub const LIST_ELEMENT_NAME: &str = "element";

/// Cardinality of a field within one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
    Required,
    Optional,
    Repeated,
}

impl Repetition {
    fn keyword(self) -> &'static str {
        match self {
            Repetition::Required => "required",
            Repetition::Optional => "optional",
            Repetition::Repeated => "repeated",
        }
    }
}

/// Physical storage type of a primitive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalType {
    Boolean,
    Int32,
    Int64,
    Int96,
    Float,
    Double,
    ByteArray,
    FixedLenByteArray(usize),
}

impl Display for PhysicalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PhysicalType::Boolean => f.write_str("boolean"),
            PhysicalType::Int32 => f.write_str("int32"),
            PhysicalType::Int64 => f.write_str("int64"),
            PhysicalType::Int96 => f.write_str("int96"),
            PhysicalType::Float => f.write_str("float"),
            PhysicalType::Double => f.write_str("double"),
            PhysicalType::ByteArray => f.write_str("binary"),
            PhysicalType::FixedLenByteArray(len) => write!(f, "fixed_len_byte_array({len})"),
        }
    }
}

/// Resolution of a timestamp column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Millis,
    Micros,
    Nanos,
}

impl TimeUnit {
    /// Divisor applied to a nanosecond instant to reach this unit.
    pub fn divisor(self) -> i64 {
        match self {
            TimeUnit::Millis => 1_000_000,
            TimeUnit::Micros => 1_000,
            TimeUnit::Nanos => 1,
        }
    }

    /// Parse a `TIMESTAMP_*` annotation name.
    pub fn from_annotation(name: &str) -> Option<Self> {
        match name {
            "TIMESTAMP_MILLIS" => Some(TimeUnit::Millis),
            "TIMESTAMP_MICROS" => Some(TimeUnit::Micros),
            "TIMESTAMP_NANOS" => Some(TimeUnit::Nanos),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            TimeUnit::Millis => "MILLIS",
            TimeUnit::Micros => "MICROS",
            TimeUnit::Nanos => "NANOS",
        }
    }
}

/// Logical / converted type annotation refining a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    List,
    Map,
    String,
    Enum,
    Uuid,
    Json,
    Date,
    Timestamp(TimeUnit),
}

impl Display for LogicalType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::List => f.write_str("LIST"),
            LogicalType::Map => f.write_str("MAP"),
            LogicalType::String => f.write_str("STRING"),
            LogicalType::Enum => f.write_str("ENUM"),
            LogicalType::Uuid => f.write_str("UUID"),
            LogicalType::Json => f.write_str("JSON"),
            LogicalType::Date => f.write_str("DATE"),
            LogicalType::Timestamp(unit) => write!(f, "TIMESTAMP({},true)", unit.keyword()),
        }
    }
}

/// Metadata carried by a resolved schema node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaElement {
    pub repetition: Repetition,
    /// `None` for groups.
    pub physical_type: Option<PhysicalType>,
    pub logical_type: Option<LogicalType>,
}

impl SchemaElement {
    pub fn new(repetition: Repetition, physical_type: Option<PhysicalType>) -> Self {
        Self {
            repetition,
            physical_type,
            logical_type: None,
        }
    }
}

/// One node of the schema tree: a message root, a group or a primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaNode {
    name: String,
    element: Option<SchemaElement>,
    children: Vec<SchemaNode>,
}

impl SchemaNode {
    pub fn new(
        name: impl Into<String>,
        element: Option<SchemaElement>,
        children: Vec<SchemaNode>,
    ) -> Self {
        Self {
            name: name.into(),
            element,
            children,
        }
    }

    /// Root node of a schema.
    pub fn message(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self::new(
            name,
            Some(SchemaElement::new(Repetition::Required, None)),
            children,
        )
    }

    pub fn group(
        name: impl Into<String>,
        repetition: Repetition,
        children: Vec<SchemaNode>,
    ) -> Self {
        Self::new(name, Some(SchemaElement::new(repetition, None)), children)
    }

    pub fn primitive(
        name: impl Into<String>,
        repetition: Repetition,
        physical_type: PhysicalType,
    ) -> Self {
        Self::new(
            name,
            Some(SchemaElement::new(repetition, Some(physical_type))),
            Vec::new(),
        )
    }

    /// LIST-annotated group wrapping `element` in the `list` / `element`
    /// layout. The element node is renamed to `element`.
    pub fn list(name: impl Into<String>, repetition: Repetition, element: SchemaNode) -> Self {
        let element = SchemaNode {
            name: LIST_ELEMENT_NAME.to_string(),
            ..element
        };
        let list = Self::group(LIST_GROUP_NAME, Repetition::Repeated, vec![element]);
        Self::group(name, repetition, vec![list]).with_logical_type(LogicalType::List)
    }

    /// Node whose schema element has not been resolved.
    pub fn unresolved(name: impl Into<String>, children: Vec<SchemaNode>) -> Self {
        Self::new(name, None, children)
    }

    /// Annotate the node. Has no effect on an unresolved node.
    pub fn with_logical_type(mut self, logical_type: LogicalType) -> Self {
        if let Some(element) = self.element.as_mut() {
            element.logical_type = Some(logical_type);
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn element(&self) -> Option<&SchemaElement> {
        self.element.as_ref()
    }

    /// The schema element, or [`MarshalError::MissingSchemaElement`].
    pub fn require_element(&self) -> Result<&SchemaElement, MarshalError> {
        self.element
            .as_ref()
            .ok_or_else(|| MarshalError::MissingSchemaElement {
                field: self.name.clone(),
            })
    }

    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&SchemaNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn repetition(&self) -> Option<Repetition> {
        self.element.as_ref().map(|e| e.repetition)
    }

    pub fn physical_type(&self) -> Option<PhysicalType> {
        self.element.as_ref().and_then(|e| e.physical_type)
    }

    pub fn logical_type(&self) -> Option<LogicalType> {
        self.element.as_ref().and_then(|e| e.logical_type)
    }

    pub fn is_group(&self) -> bool {
        self.physical_type().is_none()
    }

    pub fn is_list(&self) -> bool {
        self.logical_type() == Some(LogicalType::List)
    }

    pub fn is_repeated(&self) -> bool {
        self.repetition() == Some(Repetition::Repeated)
    }

    /// Resolve the `element` node below a LIST-annotated node.
    pub fn list_element(&self) -> Result<&SchemaNode, MarshalError> {
        if !self.is_list() {
            return Err(MarshalError::schema_mismatch(
                &self.name,
                "decoding list but schema node is not annotated as LIST",
            ));
        }
        self.child(LIST_GROUP_NAME)
            .and_then(|list| list.child(LIST_ELEMENT_NAME))
            .ok_or_else(|| {
                MarshalError::schema_mismatch(
                    &self.name,
                    format!("LIST node lacks '{LIST_GROUP_NAME}.{LIST_ELEMENT_NAME}'"),
                )
            })
    }

    /// Check structural invariants over the whole tree.
    pub fn validate(&self) -> Result<(), SchemaError> {
        self.validate_node(true)
    }

    fn validate_node(&self, is_root: bool) -> Result<(), SchemaError> {
        if self.physical_type().is_some() && !self.children.is_empty() {
            return Err(SchemaError::PrimitiveWithChildren {
                node: self.name.clone(),
            });
        }
        if !is_root && self.element.is_some() && self.is_group() && self.children.is_empty() {
            return Err(SchemaError::EmptyGroup {
                node: self.name.clone(),
            });
        }
        if self.is_list() {
            self.validate_list_layout()?;
        }
        self.children
            .iter()
            .try_for_each(|child| child.validate_node(false))
    }

    fn validate_list_layout(&self) -> Result<(), SchemaError> {
        let invalid = |detail: &str| SchemaError::InvalidList {
            node: self.name.clone(),
            detail: detail.to_string(),
        };
        let [list] = self.children.as_slice() else {
            return Err(invalid("does not have exactly one child"));
        };
        if list.name != LIST_GROUP_NAME || !list.is_group() || !list.is_repeated() {
            return Err(invalid("its child is not a repeated group named 'list'"));
        }
        let [element] = list.children.as_slice() else {
            return Err(invalid("'list' does not have exactly one child"));
        };
        if element.name != LIST_ELEMENT_NAME {
            return Err(invalid("the child of 'list' is not named 'element'"));
        }
        Ok(())
    }
}

impl Display for SchemaNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let text = format_schema(self)?;
        f.write_str(&text)
    }
}

/// Render a schema tree in Parquet message-type syntax.
pub fn format_schema(root: &SchemaNode) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "message {} {{", root.name)?;
    for child in &root.children {
        format_node(child, 2, &mut out)?;
    }
    out.push_str("}\n");
    Ok(out)
}

fn format_node(node: &SchemaNode, indent: usize, out: &mut String) -> fmt::Result {
    let pad = " ".repeat(indent);
    let repetition = node
        .repetition()
        .map(Repetition::keyword)
        .unwrap_or("optional");
    let annotation = node
        .logical_type()
        .map(|lt| format!(" ({lt})"))
        .unwrap_or_default();

    match node.physical_type() {
        Some(physical) => writeln!(out, "{pad}{repetition} {physical} {}{annotation};", node.name),
        None => {
            writeln!(out, "{pad}{repetition} group {}{annotation} {{", node.name)?;
            for child in &node.children {
                format_node(child, indent + 2, out)?;
            }
            writeln!(out, "{pad}}}")
        }
    }
}
