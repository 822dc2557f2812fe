///
/// IR Types and Shapes
///
/// Just enough of the IR type system for the binding layer: nominal types
/// with generic bindings, the shape of a defined type (name, metadata tags,
/// type formals), and the shape of a method attached to it.
///

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IrType {
    pub name: String,
    pub bindings: Vec<IrType>,
}

impl IrType {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), bindings: Vec::new() }
    }

    pub fn with_bindings(name: impl Into<String>, bindings: Vec<IrType>) -> Self {
        Self { name: name.into(), bindings }
    }

    pub fn string() -> Self {
        Self::named("String")
    }

    pub fn any_value() -> Self {
        Self::named("AnyValue")
    }

    /// The nominal type of instances of a defined type, formals bound to themselves.
    pub fn of_shape(shape: &TypeShape) -> Self {
        Self {
            name: shape.name.clone(),
            bindings: shape.type_formals.iter().map(IrType::named).collect(),
        }
    }
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.bindings.is_empty() {
            f.write_str("<")?;
            for (i, binding) in self.bindings.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", binding)?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MetadataKey(pub String);

impl MetadataKey {
    pub fn json() -> Self {
        Self("json".to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    pub name: String,
    pub metadata: Vec<MetadataKey>,
    pub type_formals: Vec<String>,
}

impl TypeShape {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), metadata: Vec::new(), type_formals: Vec::new() }
    }

    pub fn with_metadata(mut self, key: MetadataKey) -> Self {
        self.metadata.push(key);
        self
    }

    pub fn has_metadata(&self, key: &MetadataKey) -> bool {
        self.metadata.contains(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

impl Visibility {
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Public => None,
            Visibility::Protected | Visibility::Private => Some("#"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    Normal,
    Getter,
    Setter,
    Constructor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodShape {
    /// Name of the type the method belongs to.
    pub enclosing_type: String,
    /// Internal, unique name of the method.
    pub name: String,
    /// Name used for dot access, e.g. `toJSON`.
    pub symbol: String,
    pub visibility: Visibility,
    pub kind: MethodKind,
    pub may_yield: bool,
}

/// `typeof` result for values of an IR type. Int32 and Float64 share
/// `"number"` so runtime checks cannot tell them apart.
pub fn typeof_category(type_name: &str) -> &'static str {
    match type_name {
        "Boolean" => "boolean",
        "Int32" | "Float64" => "number",
        "Int64" => "bigint",
        "String" => "string",
        "Function" => "function",
        "Void" => "undefined",
        _ => "object",
    }
}
