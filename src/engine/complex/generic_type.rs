use crate::engine::errors::SchemaConstructionError;

/// One level of a nested column's schema tree.
///
/// The tree shape is fixed once schema construction is done. Encoding-time
/// counters do not live here; see [`ColumnarState`](super::ColumnarState).
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType {
    name: String,
    parent_name: String,
    column_id: String,
    output_array_index: usize,
    kind: TypeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    /// Exactly one element type once the schema is complete.
    Array { element: Option<Box<GenericType>> },
    /// Named fields, in declaration order.
    Struct { fields: Vec<GenericType> },
    /// Dictionary-encoded leaf. `surrogate_index` addresses the per-column
    /// key-size and cardinality tables.
    Primitive { surrogate_index: usize },
}

/// Outcome of offering a node to a subtree.
enum Attach {
    Done,
    Rejected(GenericType),
}

impl GenericType {
    pub fn array(name: &str, parent_name: &str, column_id: &str) -> Self {
        Self::with_kind(name, parent_name, column_id, TypeKind::Array { element: None })
    }

    pub fn structure(name: &str, parent_name: &str, column_id: &str) -> Self {
        Self::with_kind(
            name,
            parent_name,
            column_id,
            TypeKind::Struct { fields: Vec::new() },
        )
    }

    pub fn primitive(name: &str, parent_name: &str, column_id: &str, surrogate_index: usize) -> Self {
        Self::with_kind(
            name,
            parent_name,
            column_id,
            TypeKind::Primitive { surrogate_index },
        )
    }

    fn with_kind(name: &str, parent_name: &str, column_id: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            parent_name: parent_name.to_string(),
            column_id: column_id.to_string(),
            output_array_index: 0,
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent_name(&self) -> &str {
        &self.parent_name
    }

    pub fn column_id(&self) -> &str {
        &self.column_id
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn output_array_index(&self) -> usize {
        self.output_array_index
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, TypeKind::Primitive { .. })
    }

    pub fn surrogate_index(&self) -> Option<usize> {
        match self.kind {
            TypeKind::Primitive { surrogate_index } => Some(surrogate_index),
            _ => None,
        }
    }

    pub fn set_surrogate_index(&mut self, index: usize) {
        if let TypeKind::Primitive { surrogate_index } = &mut self.kind {
            *surrogate_index = index;
        }
    }

    /// Direct children in declaration order.
    pub fn children(&self) -> &[GenericType] {
        match &self.kind {
            TypeKind::Array {
                element: Some(element),
            } => std::slice::from_ref(&**element),
            TypeKind::Array { element: None } => &[],
            TypeKind::Struct { fields } => fields,
            TypeKind::Primitive { .. } => &[],
        }
    }

    /// The array's element type, failing if the schema never attached one.
    pub fn element(&self) -> Result<&GenericType, SchemaConstructionError> {
        match &self.kind {
            TypeKind::Array {
                element: Some(element),
            } => Ok(&**element),
            _ => Err(SchemaConstructionError::MissingElementType(
                self.name.clone(),
            )),
        }
    }

    /// Attaches `node` under the node whose name equals `node.parent_name()`,
    /// searching this subtree. Parents must be added before their children.
    pub fn add_children(&mut self, node: GenericType) -> Result<(), SchemaConstructionError> {
        match self.try_attach(node)? {
            Attach::Done => Ok(()),
            Attach::Rejected(node) => Err(SchemaConstructionError::NoMatchingParent {
                child: node.name,
                parent: node.parent_name,
                at: self.name.clone(),
            }),
        }
    }

    fn try_attach(&mut self, node: GenericType) -> Result<Attach, SchemaConstructionError> {
        let is_parent = node.parent_name == self.name;
        match &mut self.kind {
            TypeKind::Array { element } => {
                if is_parent {
                    if element.is_some() {
                        return Err(SchemaConstructionError::ElementTypeAlreadySet {
                            array: self.name.clone(),
                            child: node.name,
                        });
                    }
                    *element = Some(Box::new(node));
                    return Ok(Attach::Done);
                }
                match element {
                    Some(element) => element.try_attach(node),
                    None => Ok(Attach::Rejected(node)),
                }
            }
            TypeKind::Struct { fields } => {
                if is_parent {
                    if fields.iter().any(|f| f.name == node.name) {
                        return Err(SchemaConstructionError::DuplicateChild {
                            parent: self.name.clone(),
                            child: node.name,
                        });
                    }
                    fields.push(node);
                    return Ok(Attach::Done);
                }
                let mut pending = node;
                for field in fields.iter_mut() {
                    match field.try_attach(pending)? {
                        Attach::Done => return Ok(Attach::Done),
                        Attach::Rejected(node) => pending = node,
                    }
                }
                Ok(Attach::Rejected(pending))
            }
            TypeKind::Primitive { .. } => {
                if is_parent {
                    return Err(SchemaConstructionError::LeafCannotHaveChildren {
                        leaf: self.name.clone(),
                        child: node.name,
                    });
                }
                Ok(Attach::Rejected(node))
            }
        }
    }

    /// Checks every array has an element type and every struct has fields.
    pub fn validate(&self) -> Result<(), SchemaConstructionError> {
        match &self.kind {
            TypeKind::Array { element: None } => Err(
                SchemaConstructionError::MissingElementType(self.name.clone()),
            ),
            TypeKind::Struct { fields } if fields.is_empty() => {
                Err(SchemaConstructionError::EmptyStruct(self.name.clone()))
            }
            _ => self.children().iter().try_for_each(GenericType::validate),
        }
    }

    /// All primitive descendants, left to right. A primitive returns itself.
    pub fn leaf_descendants(&self) -> Vec<&GenericType> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a GenericType>) {
        if self.is_leaf() {
            leaves.push(self);
            return;
        }
        for child in self.children() {
            child.collect_leaves(leaves);
        }
    }

    /// Number of nodes in this subtree, including self.
    pub fn column_count(&self) -> usize {
        1 + self
            .children()
            .iter()
            .map(GenericType::column_count)
            .sum::<usize>()
    }

    /// Flattens the subtree into output column slots starting at `base`.
    /// Each node takes one slot before its children; struct fields take
    /// consecutive ranges in declaration order.
    pub fn set_output_array_index(&mut self, base: usize) {
        self.output_array_index = base;
        match &mut self.kind {
            TypeKind::Array {
                element: Some(element),
            } => element.set_output_array_index(base + 1),
            TypeKind::Struct { fields } => {
                let mut next = base + 1;
                for field in fields.iter_mut() {
                    field.set_output_array_index(next);
                    next = field.max_output_array_index() + 1;
                }
            }
            _ => {}
        }
    }

    pub fn max_output_array_index(&self) -> usize {
        self.children()
            .iter()
            .map(GenericType::max_output_array_index)
            .fold(self.output_array_index, usize::max)
    }

    /// Checks that output indexes run contiguously in pre-order from the
    /// root's index, the layout `set_output_array_index` produces. Per-run
    /// state is keyed by these indexes, so each node must own its own.
    pub fn check_output_layout(&self) -> Result<(), SchemaConstructionError> {
        let mut next = self.output_array_index;
        self.check_output_index(&mut next)
    }

    fn check_output_index(&self, next: &mut usize) -> Result<(), SchemaConstructionError> {
        if self.output_array_index != *next {
            return Err(SchemaConstructionError::OutputIndexMismatch {
                node: self.name.clone(),
                expected: *next,
                found: self.output_array_index,
            });
        }
        *next += 1;
        for child in self.children() {
            child.check_output_index(next)?;
        }
        Ok(())
    }

    /// Finds a node in this subtree by name.
    #[cfg(test)]
    pub fn find(&self, name: &str) -> Option<&GenericType> {
        if self.name == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(name))
    }
}
