use crate::ast::{VariableDeclaration, VariableId};

/// Stack of variable declaration lists; the last layer is innermost.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    layers: Vec<Vec<VariableId>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, declarations: Vec<VariableId>) {
        self.layers.push(declarations);
    }

    pub fn pop(&mut self) -> Option<Vec<VariableId>> {
        self.layers.pop()
    }

    /// Resolves `name` innermost-first. Shadowing is allowed.
    pub fn find_variable_declaration(
        &self,
        name: &str,
        variables: &[VariableDeclaration],
    ) -> Option<VariableId> {
        self.layers
            .iter()
            .rev()
            .flat_map(|layer| layer.iter().rev())
            .copied()
            .find(|id| variables[id.0].name == name)
    }

    pub fn contains(&self, id: VariableId) -> bool {
        self.layers.iter().any(|layer| layer.contains(&id))
    }

    pub fn layers(&self) -> &[Vec<VariableId>] {
        &self.layers
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
