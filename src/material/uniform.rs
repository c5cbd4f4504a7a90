use std::collections::BTreeMap;

use crate::animation::value::PropValue;
use crate::foundation::core::Rgb;
use crate::foundation::error::{StrataError, StrataResult};

/// How a declared name is wired into an assembled program, decided by its prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// `u_` prefix: a per-draw shader uniform.
    Uniform,
    /// `v_` prefix: a value interpolated from vertex to fragment stage.
    Varying,
    /// No prefix: a compile-time constant.
    Constant,
}

impl SlotKind {
    /// Split a declared name into its kind and the property name used for lookups.
    pub fn classify(name: &str) -> (Self, &str) {
        if let Some(prop) = name.strip_prefix("u_") {
            (Self::Uniform, prop)
        } else if let Some(prop) = name.strip_prefix("v_") {
            (Self::Varying, prop)
        } else {
            (Self::Constant, name)
        }
    }
}

/// Static declaration of one layer input.
#[derive(Clone, Copy, Debug)]
pub struct UniformDecl {
    /// Prefixed shader name, e.g. `u_strength`.
    pub name: &'static str,
    /// GLSL type of the input.
    pub glsl_type: &'static str,
    /// Value used when construction does not override it. Required inputs have none.
    pub default: Option<PropValue>,
}

impl UniformDecl {
    /// Declaration with a default value.
    pub const fn with_default(name: &'static str, default: PropValue) -> Self {
        Self {
            name,
            glsl_type: match default {
                PropValue::Bool(_) => "bool",
                PropValue::Scalar(_) => "float",
                PropValue::Color(_) => "vec3",
            },
            default: Some(default),
        }
    }

    /// Declaration that must be supplied at construction.
    pub const fn required(name: &'static str, glsl_type: &'static str) -> Self {
        Self {
            name,
            glsl_type,
            default: None,
        }
    }

    /// Varying declaration. Varyings carry no host-side value.
    pub const fn varying(name: &'static str, glsl_type: &'static str) -> Self {
        Self {
            name,
            glsl_type,
            default: None,
        }
    }
}

/// One named shader input and its current value.
#[derive(Clone, Debug, PartialEq)]
pub struct UniformSlot {
    /// Prefixed shader name.
    pub name: String,
    /// Wiring kind derived from the prefix.
    pub kind: SlotKind,
    /// GLSL type.
    pub glsl_type: &'static str,
    /// Declared default.
    pub default: Option<PropValue>,
    /// Current value. Always `None` for varyings.
    pub value: Option<PropValue>,
    dirty: bool,
}

impl UniformSlot {
    /// Property name without prefix.
    pub fn prop(&self) -> &str {
        SlotKind::classify(&self.name).1
    }

    /// Return `true` when written since the renderer last consumed it.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Explicit property table mapping property names to shader inputs.
///
/// Every write stores the value and flags the slot dirty. The renderer drains the flags with
/// [`UniformTable::take_dirty`] before it draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UniformTable {
    slots: Vec<UniformSlot>,
    by_prop: BTreeMap<String, usize>,
}

impl UniformTable {
    /// Build a table from declarations, letting `overrides` replace defaults.
    ///
    /// Fails when a uniform or constant has neither a default nor an override.
    pub fn from_decls(
        owner: &str,
        decls: &[UniformDecl],
        overrides: &BTreeMap<String, PropValue>,
    ) -> StrataResult<Self> {
        let mut table = Self::default();
        for decl in decls {
            let (kind, prop) = SlotKind::classify(decl.name);
            let value = match kind {
                SlotKind::Varying => None,
                SlotKind::Uniform | SlotKind::Constant => {
                    let v = overrides.get(prop).copied().or(decl.default);
                    if v.is_none() {
                        return Err(StrataError::material(format!(
                            "layer '{owner}' requires a value for '{}'",
                            decl.name
                        )));
                    }
                    v
                }
            };
            if table.by_prop.contains_key(prop) {
                return Err(StrataError::material(format!(
                    "layer '{owner}' declares '{prop}' twice"
                )));
            }
            table.by_prop.insert(prop.to_owned(), table.slots.len());
            table.slots.push(UniformSlot {
                name: decl.name.to_owned(),
                kind,
                glsl_type: decl.glsl_type,
                default: decl.default,
                value,
                dirty: true,
            });
        }

        for key in overrides.keys() {
            if !table.by_prop.contains_key(key) {
                tracing::debug!(layer = owner, prop = key.as_str(), "ignoring undeclared prop");
            }
        }
        Ok(table)
    }

    /// Current value of a property.
    pub fn get(&self, prop: &str) -> Option<PropValue> {
        self.slot(prop).and_then(|s| s.value)
    }

    /// Store `value` and mark the slot dirty. Returns `false` for undeclared properties and
    /// varyings, which hold no host-side value.
    pub fn set(&mut self, prop: &str, value: PropValue) -> bool {
        let Some(&idx) = self.by_prop.get(prop) else {
            return false;
        };
        let slot = &mut self.slots[idx];
        if slot.kind == SlotKind::Varying {
            return false;
        }
        slot.value = Some(value);
        slot.dirty = true;
        true
    }

    /// Return `true` when `prop` is declared.
    pub fn declares(&self, prop: &str) -> bool {
        self.by_prop.contains_key(prop)
    }

    /// Slot lookup by property name.
    pub fn slot(&self, prop: &str) -> Option<&UniformSlot> {
        self.by_prop.get(prop).map(|&i| &self.slots[i])
    }

    /// Scalar view of a property, `0` when missing.
    pub fn scalar(&self, prop: &str) -> f32 {
        self.get(prop).map_or(0.0, PropValue::as_f32)
    }

    /// Color view of a property, black when missing.
    pub fn color(&self, prop: &str) -> Rgb {
        self.get(prop).map_or(Rgb::BLACK, PropValue::as_rgb)
    }

    /// Slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &UniformSlot> {
        self.slots.iter()
    }

    /// Names of slots written since the last call, in declaration order. Clears the flags.
    pub fn take_dirty(&mut self) -> Vec<String> {
        let mut out = Vec::new();
        for slot in &mut self.slots {
            if slot.dirty {
                slot.dirty = false;
                out.push(slot.name.clone());
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/material/uniform.rs"]
mod tests;
