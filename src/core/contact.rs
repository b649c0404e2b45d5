use std::collections::HashMap;

use rapier3d::prelude::*;

use crate::bodies::{Material, MaterialId};

/// Table of per-material defaults and per-pair overrides
///
/// Colliders carry their [`MaterialId`] in `user_data`. Pairs without a rule keep
/// rapier's own coefficient combination.
#[derive(Debug, Clone, Default)]
pub struct ContactRules {
    materials: HashMap<MaterialId, Material>,
    pairs: HashMap<(MaterialId, MaterialId), Material>,
}

fn pair_key(a: MaterialId, b: MaterialId) -> (MaterialId, MaterialId) {
    if a <= b { (a, b) } else { (b, a) }
}

impl ContactRules {
    /// Creates an empty rule table
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines the surface response of a single material
    pub fn define(&mut self, id: MaterialId, material: Material) {
        self.materials.insert(id, material);
    }

    /// Returns the surface response of a material, if defined
    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    /// Adds or replaces the rule for an unordered material pair
    pub fn insert(&mut self, a: MaterialId, b: MaterialId, response: Material) -> Option<Material> {
        self.pairs.insert(pair_key(a, b), response)
    }

    /// Looks up the rule for an unordered material pair
    pub fn rule(&self, a: MaterialId, b: MaterialId) -> Option<&Material> {
        self.pairs.get(&pair_key(a, b))
    }

    /// Returns the number of pair rules
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns whether no pair rules exist
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

pub(crate) fn material_of(collider: &Collider) -> MaterialId {
    MaterialId(collider.user_data as u32)
}

impl PhysicsHooks for ContactRules {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let a = material_of(&context.colliders[context.collider1]);
        let b = material_of(&context.colliders[context.collider2]);

        if let Some(rule) = self.rule(a, b) {
            for contact in context.solver_contacts.iter_mut() {
                contact.friction = rule.friction;
                contact.restitution = rule.restitution;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_rules_are_unordered() {
        let mut rules = ContactRules::new();
        rules.insert(MaterialId(2), MaterialId(1), Material::new(0.1, 0.9));

        let rule = rules.rule(MaterialId(1), MaterialId(2)).copied();
        assert_eq!(rule, Some(Material::new(0.1, 0.9)));
        assert!(rules.rule(MaterialId(1), MaterialId(3)).is_none());
    }

    #[test]
    fn replacing_a_rule_returns_the_old_one() {
        let mut rules = ContactRules::new();
        assert!(rules.insert(MaterialId(0), MaterialId(0), Material::wood()).is_none());
        let old = rules.insert(MaterialId(0), MaterialId(0), Material::ice());
        assert_eq!(old, Some(Material::wood()));
        assert_eq!(rules.len(), 1);
    }
}
