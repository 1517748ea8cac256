use crate::{DependencyDeclaration, DependencyKind};

/// Declarations of a project, unique by `(name, kind)`, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySet {
    declarations: Vec<DependencyDeclaration>,
}

impl DependencySet {
    pub fn new() -> Self {
        DependencySet::default()
    }

    /// Add a declaration. An existing declaration with the same name and kind gets the new range.
    pub fn add(&mut self, declaration: DependencyDeclaration) {
        match self.get_mut(&declaration.name, declaration.kind) {
            Some(existing) => existing.requested_range = declaration.requested_range,
            None => self.declarations.push(declaration),
        }
    }

    /// Remove declarations named `name`, of `kind` only if given.
    ///
    /// Returns the number of removed declarations.
    pub fn remove(&mut self, name: &str, kind: Option<DependencyKind>) -> usize {
        let before = self.declarations.len();
        self.declarations.retain(|declaration| {
            declaration.name != name || kind.is_some_and(|kind| declaration.kind != kind)
        });
        before - self.declarations.len()
    }

    pub fn get(&self, name: &str, kind: DependencyKind) -> Option<&DependencyDeclaration> {
        self.declarations
            .iter()
            .find(|declaration| declaration.name == name && declaration.kind == kind)
    }

    fn get_mut(&mut self, name: &str, kind: DependencyKind) -> Option<&mut DependencyDeclaration> {
        self.declarations
            .iter_mut()
            .find(|declaration| declaration.name == name && declaration.kind == kind)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DependencyDeclaration> {
        self.declarations.iter()
    }

    pub fn of_kind(
        &self,
        kind: DependencyKind,
    ) -> impl Iterator<Item = &'_ DependencyDeclaration> + '_ {
        self.iter().filter(move |declaration| declaration.kind == kind)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

impl FromIterator<DependencyDeclaration> for DependencySet {
    fn from_iter<Iter: IntoIterator<Item = DependencyDeclaration>>(iter: Iter) -> Self {
        let mut set = DependencySet::new();
        for declaration in iter {
            set.add(declaration);
        }
        set
    }
}

impl<'a> IntoIterator for &'a DependencySet {
    type Item = &'a DependencyDeclaration;
    type IntoIter = std::slice::Iter<'a, DependencyDeclaration>;
    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use DependencyKind::{Dev, Peer, Runtime};

    fn declaration(name: &str, range: &str, kind: DependencyKind) -> DependencyDeclaration {
        DependencyDeclaration::new(name, range, kind)
    }

    #[test]
    fn unique_by_name_and_kind() {
        let mut set = DependencySet::new();
        set.add(declaration("ms", "*", Runtime));
        set.add(declaration("ms", "^2", Dev));
        set.add(declaration("typescript", "^5", Dev));
        set.add(declaration("ms", "^2.1.3", Runtime));

        let received: Vec<_> = set
            .iter()
            .map(|declaration| {
                (declaration.name.as_str(), declaration.requested_range.as_str(), declaration.kind)
            })
            .collect();
        assert_eq!(
            received,
            [("ms", "^2.1.3", Runtime), ("ms", "^2", Dev), ("typescript", "^5", Dev)],
        );
    }

    #[test]
    fn remove_by_kind() {
        let mut set: DependencySet = [
            declaration("ms", "*", Runtime),
            declaration("ms", "*", Peer),
            declaration("react", "^18", Peer),
        ]
        .into_iter()
        .collect();

        assert_eq!(set.remove("ms", Some(Peer)), 1);
        assert_eq!(set.get("ms", Runtime), Some(&declaration("ms", "*", Runtime)));
        assert_eq!(set.get("ms", Peer), None);
        assert_eq!(set.remove("unknown", None), 0);
        assert_eq!(set.remove("ms", None), 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.of_kind(Peer).count(), 1);
    }
}
