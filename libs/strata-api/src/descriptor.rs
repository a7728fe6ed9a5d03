//! Type descriptors and handler lookup order.
//!
//! A [`TypeDesc`] is the dispatch key for structuring and unstructuring. It is
//! passed explicitly to every conversion, since aliases and generic arguments
//! cannot be recovered from a bare value.
//!
//! The lookup order of a descriptor is the sequence of descriptors probed for
//! a handler chain, most specific first:
//! - alias: the alias, then the lookup order of the wrapped descriptor
//! - generic: the generic itself, then the lookup order of its origin
//! - concrete: the type, its nominal ancestors (universal root excluded), then
//!   the structural marker for record or named-tuple shapes
//! - marker: the marker alone

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, LazyLock, OnceLock};

use crate::data::Data;
use crate::field::FieldDef;

/// Name of the universal root type. Never part of a lookup order.
pub const ROOT_NAME: &str = "object";

/// Synthetic descriptors matched by shape rather than declared ancestry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    /// Any record type with named fields.
    StructLike,
    /// Any named tuple type: fixed arity, heterogeneous, positional.
    FixedTuple,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::StructLike => write!(f, "struct-like"),
            Marker::FixedTuple => write!(f, "fixed-tuple"),
        }
    }
}

/// Runtime shape of the values of a concrete type.
#[derive(Debug, Clone)]
pub enum Shape {
    None,
    Bool,
    Int,
    Float,
    Str,
    Bytes,
    List,
    Dict,
    Tuple,
    Union,
    Record(Vec<FieldDef>),
    NamedTuple(Vec<FieldDef>),
}

/// A runtime-observable type with nominal ancestry.
#[derive(Debug)]
pub struct ConcreteType {
    name: String,
    bases: Vec<TypeDesc>,
    shape: Option<Shape>,
    /// Linearized nominal ancestors, excluding the type itself.
    nominal: OnceLock<Arc<[TypeDesc]>>,
}

impl ConcreteType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bases(&self) -> &[TypeDesc] {
        &self.bases
    }

    /// Own shape, or the first shape declared along the bases.
    pub fn shape(&self) -> Option<&Shape> {
        self.shape
            .as_ref()
            .or_else(|| self.bases.iter().find_map(TypeDesc::shape))
    }

    fn nominal_ancestors(&self) -> Arc<[TypeDesc]> {
        self.nominal
            .get_or_init(|| {
                let chained: Vec<TypeDesc> = self.bases.iter().flat_map(nominal_chain).collect();
                // Keep the last occurrence: an ancestor shared by several bases
                // is probed only after all of them.
                let mut linear: Vec<TypeDesc> = Vec::with_capacity(chained.len());
                for (i, desc) in chained.iter().enumerate() {
                    if desc.is_root() || chained[i + 1..].contains(desc) {
                        continue;
                    }
                    linear.push(desc.clone());
                }
                linear.into()
            })
            .clone()
    }
}

/// A generic origin applied to type arguments, e.g. `list[int]`.
#[derive(Debug)]
pub struct GenericType {
    origin: TypeDesc,
    args: Vec<TypeDesc>,
}

impl GenericType {
    pub fn origin(&self) -> &TypeDesc {
        &self.origin
    }

    pub fn args(&self) -> &[TypeDesc] {
        &self.args
    }
}

/// A named wrapper around another descriptor, distinct only for dispatch.
#[derive(Debug)]
pub struct AliasType {
    name: String,
    target: TypeDesc,
}

impl AliasType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &TypeDesc {
        &self.target
    }
}

/// Dispatch identity of a type.
///
/// Cheap to clone. Equality: concrete types and aliases compare by name,
/// generics by origin and arguments, markers by kind.
#[derive(Clone)]
pub enum TypeDesc {
    Concrete(Arc<ConcreteType>),
    Generic(Arc<GenericType>),
    Alias(Arc<AliasType>),
    Marker(Marker),
}

fn builtin(name: &str, shape: Shape) -> TypeDesc {
    TypeDesc::Concrete(Arc::new(ConcreteType {
        name: name.to_string(),
        bases: Vec::new(),
        shape: Some(shape),
        nominal: OnceLock::new(),
    }))
}

static OBJECT: LazyLock<TypeDesc> = LazyLock::new(|| {
    TypeDesc::Concrete(Arc::new(ConcreteType {
        name: ROOT_NAME.to_string(),
        bases: Vec::new(),
        shape: None,
        nominal: OnceLock::new(),
    }))
});
static NONE: LazyLock<TypeDesc> = LazyLock::new(|| builtin("none", Shape::None));
static BOOL: LazyLock<TypeDesc> = LazyLock::new(|| builtin("bool", Shape::Bool));
static INT: LazyLock<TypeDesc> = LazyLock::new(|| builtin("int", Shape::Int));
static FLOAT: LazyLock<TypeDesc> = LazyLock::new(|| builtin("float", Shape::Float));
static STR: LazyLock<TypeDesc> = LazyLock::new(|| builtin("str", Shape::Str));
static BYTES: LazyLock<TypeDesc> = LazyLock::new(|| builtin("bytes", Shape::Bytes));
static LIST: LazyLock<TypeDesc> = LazyLock::new(|| builtin("list", Shape::List));
static DICT: LazyLock<TypeDesc> = LazyLock::new(|| builtin("dict", Shape::Dict));
static TUPLE: LazyLock<TypeDesc> = LazyLock::new(|| builtin("tuple", Shape::Tuple));
static UNION: LazyLock<TypeDesc> = LazyLock::new(|| builtin("Union", Shape::Union));

impl TypeDesc {
    /// The universal root type.
    pub fn object() -> Self {
        OBJECT.clone()
    }

    pub fn none() -> Self {
        NONE.clone()
    }

    pub fn bool() -> Self {
        BOOL.clone()
    }

    pub fn int() -> Self {
        INT.clone()
    }

    pub fn float() -> Self {
        FLOAT.clone()
    }

    pub fn str() -> Self {
        STR.clone()
    }

    pub fn bytes() -> Self {
        BYTES.clone()
    }

    /// Origin of `list[T]` generics.
    pub fn list() -> Self {
        LIST.clone()
    }

    /// Origin of `dict[K, V]` generics.
    pub fn dict() -> Self {
        DICT.clone()
    }

    /// Origin of `tuple[T1, ..., Tn]` generics.
    pub fn tuple() -> Self {
        TUPLE.clone()
    }

    /// Origin of `Union[V1, ..., Vn]` generics.
    pub fn union() -> Self {
        UNION.clone()
    }

    pub fn list_of(elem: TypeDesc) -> Self {
        Self::generic(Self::list(), vec![elem])
    }

    pub fn dict_of(key: TypeDesc, value: TypeDesc) -> Self {
        Self::generic(Self::dict(), vec![key, value])
    }

    pub fn tuple_of(elems: Vec<TypeDesc>) -> Self {
        Self::generic(Self::tuple(), elems)
    }

    pub fn union_of(variants: Vec<TypeDesc>) -> Self {
        Self::generic(Self::union(), variants)
    }

    /// `Union[inner, none]`.
    pub fn optional(inner: TypeDesc) -> Self {
        Self::union_of(vec![inner, Self::none()])
    }

    pub fn generic(origin: TypeDesc, args: Vec<TypeDesc>) -> Self {
        TypeDesc::Generic(Arc::new(GenericType { origin, args }))
    }

    pub fn alias(name: impl Into<String>, target: TypeDesc) -> Self {
        TypeDesc::Alias(Arc::new(AliasType {
            name: name.into(),
            target,
        }))
    }

    /// A record type with named fields.
    pub fn record(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self::build(name).shape(Shape::Record(fields)).finish()
    }

    /// A named tuple type: positional fields that also carry names.
    pub fn named_tuple(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self::build(name).shape(Shape::NamedTuple(fields)).finish()
    }

    /// Start a concrete type with explicit bases and/or shape.
    pub fn build(name: impl Into<String>) -> ConcreteBuilder {
        ConcreteBuilder {
            name: name.into(),
            bases: Vec::new(),
            shape: None,
        }
    }

    /// Display name: concrete and alias names, generic `origin[args]`, marker kind.
    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn is_root(&self) -> bool {
        matches!(self, TypeDesc::Concrete(c) if c.name == ROOT_NAME)
    }

    /// Follow the alias chain down to the first non-alias descriptor.
    pub fn resolve_alias(&self) -> &TypeDesc {
        let mut desc = self;
        while let TypeDesc::Alias(alias) = desc {
            desc = &alias.target;
        }
        desc
    }

    /// Shape of the values, looking through aliases and generic origins.
    pub fn shape(&self) -> Option<&Shape> {
        match self.resolve_alias() {
            TypeDesc::Concrete(c) => c.shape(),
            TypeDesc::Generic(g) => g.origin.shape(),
            TypeDesc::Alias(_) | TypeDesc::Marker(_) => None,
        }
    }

    /// Generic arguments, looking through aliases. Empty for non-generics.
    pub fn type_args(&self) -> &[TypeDesc] {
        match self.resolve_alias() {
            TypeDesc::Generic(g) => &g.args,
            _ => &[],
        }
    }

    /// Declared fields of record and named-tuple types, looking through aliases.
    pub fn fields(&self) -> Option<&[FieldDef]> {
        match self.shape()? {
            Shape::Record(fields) | Shape::NamedTuple(fields) => Some(fields),
            _ => None,
        }
    }

    /// Structural marker this descriptor qualifies for by its own shape.
    fn marker(&self) -> Option<Marker> {
        match self.shape()? {
            Shape::Record(_) => Some(Marker::StructLike),
            Shape::NamedTuple(_) => Some(Marker::FixedTuple),
            _ => None,
        }
    }

    /// Ordered, deduplicated descriptors to probe for a handler chain.
    ///
    /// Pure function of the descriptor. Nominal ancestry is computed once per
    /// concrete type and cached inside it.
    pub fn lookup_order(&self) -> Vec<TypeDesc> {
        let mut order = vec![self.clone()];
        match self {
            TypeDesc::Alias(alias) => order.extend(alias.target.lookup_order()),
            TypeDesc::Generic(generic) => order.extend(generic.origin.lookup_order()),
            TypeDesc::Concrete(concrete) => {
                order.extend(concrete.nominal_ancestors().iter().cloned());
                if let Some(marker) = self.marker() {
                    order.push(TypeDesc::Marker(marker));
                }
            }
            TypeDesc::Marker(_) => {}
        }
        dedup(order)
    }

    /// Shape compatibility of a typed value with this descriptor.
    ///
    /// Aliases are transparent. Generic containers are checked by their outer
    /// shape only, element types are left to the nested conversions. A union
    /// accepts a value matching any of its variants. A concrete type without a
    /// shape is opaque: it accepts its own records and any non-record value.
    pub fn is_instance_of(&self, data: &Data) -> bool {
        match self {
            TypeDesc::Alias(alias) => alias.target.is_instance_of(data),
            TypeDesc::Marker(Marker::StructLike) => {
                matches!(data, Data::Record(r) if matches!(r.ty().shape(), Some(Shape::Record(_))))
            }
            TypeDesc::Marker(Marker::FixedTuple) => match data {
                Data::Record(r) => matches!(r.ty().shape(), Some(Shape::NamedTuple(_))),
                Data::Tuple(_) => true,
                _ => false,
            },
            TypeDesc::Generic(generic) => {
                if matches!(generic.origin.shape(), Some(Shape::Union)) {
                    generic.args.iter().any(|variant| variant.is_instance_of(data))
                } else {
                    generic.origin.is_instance_of(data)
                }
            }
            TypeDesc::Concrete(concrete) => {
                if concrete.name == ROOT_NAME {
                    return true;
                }
                match (concrete.shape(), data) {
                    (Some(Shape::None), Data::None)
                    | (Some(Shape::Bool), Data::Bool(_))
                    | (Some(Shape::Int), Data::Int(_))
                    | (Some(Shape::Float), Data::Float(_))
                    | (Some(Shape::Str), Data::Str(_))
                    | (Some(Shape::Bytes), Data::Bytes(_))
                    | (Some(Shape::List), Data::List(_))
                    | (Some(Shape::Dict), Data::Dict(_))
                    | (Some(Shape::Tuple), Data::Tuple(_)) => true,
                    (Some(Shape::Record(_) | Shape::NamedTuple(_)) | None, Data::Record(r)) => {
                        r.ty().lookup_order().contains(self)
                    }
                    // Opaque types carry whatever representation their handlers choose.
                    (None, _) => true,
                    _ => false,
                }
            }
        }
    }
}

/// A descriptor followed by its nominal ancestors, markers excluded.
fn nominal_chain(desc: &TypeDesc) -> Vec<TypeDesc> {
    match desc {
        TypeDesc::Concrete(c) => {
            let mut chain = vec![desc.clone()];
            chain.extend(c.nominal_ancestors().iter().cloned());
            chain
        }
        TypeDesc::Alias(a) => {
            let mut chain = vec![desc.clone()];
            chain.extend(nominal_chain(&a.target));
            chain
        }
        TypeDesc::Generic(g) => {
            let mut chain = vec![desc.clone()];
            chain.extend(nominal_chain(&g.origin));
            chain
        }
        TypeDesc::Marker(_) => Vec::new(),
    }
}

/// Drop the root and repeated descriptors, keeping first occurrences.
fn dedup(order: Vec<TypeDesc>) -> Vec<TypeDesc> {
    let mut out: Vec<TypeDesc> = Vec::with_capacity(order.len());
    for desc in order {
        if !desc.is_root() && !out.contains(&desc) {
            out.push(desc);
        }
    }
    out
}

/// Builder for concrete types with nominal bases.
pub struct ConcreteBuilder {
    name: String,
    bases: Vec<TypeDesc>,
    shape: Option<Shape>,
}

impl ConcreteBuilder {
    /// Add a direct base. Earlier bases are probed first.
    pub fn base(mut self, base: TypeDesc) -> Self {
        self.bases.push(base);
        self
    }

    pub fn shape(mut self, shape: Shape) -> Self {
        self.shape = Some(shape);
        self
    }

    pub fn finish(self) -> TypeDesc {
        TypeDesc::Concrete(Arc::new(ConcreteType {
            name: self.name,
            bases: self.bases,
            shape: self.shape,
            nominal: OnceLock::new(),
        }))
    }
}

impl PartialEq for TypeDesc {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (TypeDesc::Concrete(a), TypeDesc::Concrete(b)) => a.name == b.name,
            (TypeDesc::Alias(a), TypeDesc::Alias(b)) => a.name == b.name,
            (TypeDesc::Generic(a), TypeDesc::Generic(b)) => {
                a.origin == b.origin && a.args == b.args
            }
            (TypeDesc::Marker(a), TypeDesc::Marker(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeDesc {}

impl Hash for TypeDesc {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            TypeDesc::Concrete(c) => c.name.hash(state),
            TypeDesc::Alias(a) => a.name.hash(state),
            TypeDesc::Generic(g) => {
                g.origin.hash(state);
                g.args.hash(state);
            }
            TypeDesc::Marker(m) => m.hash(state),
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Concrete(c) => write!(f, "{}", c.name),
            TypeDesc::Alias(a) => write!(f, "{}", a.name),
            TypeDesc::Marker(m) => write!(f, "{m}"),
            TypeDesc::Generic(g) => {
                write!(f, "{}[", g.origin)?;
                if g.args.is_empty() {
                    write!(f, "()")?;
                }
                for (i, arg) in g.args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Debug for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeDesc({self})")
    }
}
