use crate::engine::complex::GenericType;
use crate::engine::errors::SchemaConstructionError;
use tracing::debug;

/// Parsed form of a column type such as `array<struct<a:string,b:int>>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpec {
    Array(Box<TypeSpec>),
    Struct(Vec<(String, TypeSpec)>),
    Primitive(String),
}

fn is_primitive(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "string"
            | "str"
            | "text"
            | "varchar"
            | "int"
            | "integer"
            | "bigint"
            | "long"
            | "i64"
            | "u64"
            | "double"
            | "float"
            | "number"
            | "decimal"
            | "bool"
            | "boolean"
            | "date"
            | "timestamp"
    )
}

peg::parser! {
    grammar complex_type() for str {
        rule _() = quiet!{ [' ' | '\t' | '\n' | '\r']* }

        rule ci(s: &'static str)
            = kw:$(['a'..='z' | 'A'..='Z']+) {? if kw.eq_ignore_ascii_case(s) { Ok(()) } else { Err("expected keyword") } }

        rule ident() -> &'input str
            = quiet!{
                $( ['a'..='z' | 'A'..='Z' | '_']
                   ['a'..='z' | 'A'..='Z' | '0'..='9' | '_']* )
            }
            / expected!("identifier")

        rule field() -> (String, TypeSpec)
            = _ name:ident() _ ":" _ t:type_spec() _ { (name.to_string(), t) }

        rule type_spec() -> TypeSpec
            = ci("array") _ "<" _ t:type_spec() _ ">" { TypeSpec::Array(Box::new(t)) }
            / ci("struct") _ "<" fields:(field() ++ ",") ">" { TypeSpec::Struct(fields) }
            / p:ident() {?
                if is_primitive(p) { Ok(TypeSpec::Primitive(p.to_ascii_lowercase())) }
                else { Err("primitive type") }
            }

        pub rule column_type() -> TypeSpec
            = _ t:type_spec() _ { t }
    }
}

pub fn parse_type_spec(input: &str) -> Result<TypeSpec, SchemaConstructionError> {
    complex_type::column_type(input)
        .map_err(|e| SchemaConstructionError::InvalidTypeString(format!("'{}': {}", input, e)))
}

/// Builds flattened schema trees for complex columns.
#[derive(Debug, Clone)]
pub struct ComplexSchemaBuilder {
    column: String,
    first_surrogate_index: usize,
    output_base: usize,
}

impl ComplexSchemaBuilder {
    pub fn new(column: &str) -> Self {
        Self {
            column: column.to_string(),
            first_surrogate_index: 0,
            output_base: 0,
        }
    }

    /// Surrogate index of the first leaf; later leaves count up left to right.
    pub fn with_first_surrogate_index(mut self, index: usize) -> Self {
        self.first_surrogate_index = index;
        self
    }

    /// Output array index of the root column.
    pub fn with_output_base(mut self, base: usize) -> Self {
        self.output_base = base;
        self
    }

    pub fn build(&self, type_str: &str) -> Result<GenericType, SchemaConstructionError> {
        let spec = parse_type_spec(type_str)?;
        if matches!(spec, TypeSpec::Primitive(_)) {
            return Err(SchemaConstructionError::InvalidTypeString(format!(
                "column '{}' must be an array or struct, got '{}'",
                self.column, type_str
            )));
        }

        let mut nodes = Vec::new();
        let mut next_leaf = self.first_surrogate_index;
        self.flatten(&spec, &self.column, "", &mut nodes, &mut next_leaf);

        let mut nodes = nodes.into_iter();
        let Some(mut root) = nodes.next() else {
            return Err(SchemaConstructionError::InvalidTypeString(type_str.to_string()));
        };
        for node in nodes {
            root.add_children(node)?;
        }
        root.validate()?;
        root.set_output_array_index(self.output_base);

        debug!(
            target: "ingest::codec",
            column = %self.column,
            columns = root.column_count(),
            leaves = root.leaf_descendants().len(),
            "Built complex schema"
        );
        Ok(root)
    }

    /// Emits nodes parent-first so every node's parent precedes it.
    fn flatten(
        &self,
        spec: &TypeSpec,
        name: &str,
        parent: &str,
        nodes: &mut Vec<GenericType>,
        next_leaf: &mut usize,
    ) {
        let column_id = format!("{}#{}", self.column, nodes.len());
        match spec {
            TypeSpec::Array(element) => {
                nodes.push(GenericType::array(name, parent, &column_id));
                self.flatten(element, &format!("{}.val", name), name, nodes, next_leaf);
            }
            TypeSpec::Struct(fields) => {
                nodes.push(GenericType::structure(name, parent, &column_id));
                for (field, spec) in fields {
                    self.flatten(spec, &format!("{}.{}", name, field), name, nodes, next_leaf);
                }
            }
            TypeSpec::Primitive(_) => {
                nodes.push(GenericType::primitive(name, parent, &column_id, *next_leaf));
                *next_leaf += 1;
            }
        }
    }
}
