//! Hotkey triggers and the table that maps them to actions.
//!
//! A [`Trigger`] is one key press as delivered by a
//! [`TriggerSource`](crate::traits::TriggerSource).  It either names a combo
//! from the configured bindings or carries an action string directly.
//!
//! Every binding is parsed once when the [`BindingRegistry`] is built.  A
//! malformed binding is kept (as its parse error) so that pressing it is
//! reported, while every other binding keeps working.

use crate::action::{Action, ActionError};
use crate::dispatch::DispatchError;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One hotkey activation.
///
/// On the wire (see [`ipc::listener`](crate::ipc::listener)) this is
/// `{"Combo":"Mod4+Tab"}` or `{"Action":"switch_tab next wrap"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    /// A combo name from the configured bindings.
    Combo(String),
    /// A raw action string, bypassing the binding table.
    Action(String),
}

/// A configured combo and what it parsed to.
#[derive(Debug, Clone)]
struct Binding {
    source: String,
    action: Result<Action, ActionError>,
}

/// Combo name → parsed action.
#[derive(Debug, Clone, Default)]
pub struct BindingRegistry {
    bindings: BTreeMap<String, Binding>,
}

impl BindingRegistry {
    /// Parse every `combo → action string` pair.
    pub fn new<'a>(bindings: impl IntoIterator<Item = (&'a String, &'a String)>) -> Self {
        let bindings = bindings
            .into_iter()
            .map(|(combo, source)| {
                let action = Action::parse(source);
                match &action {
                    Ok(Action::Unbound(name)) => {
                        warn!("bind: {} -> {:?}: action {} doesn't exist", combo, source, name)
                    }
                    Ok(action) => debug!("bind: {} -> {}", combo, action),
                    Err(e) => warn!("bind: {} -> {:?}: {}", combo, source, e),
                }
                (
                    combo.clone(),
                    Binding {
                        source: source.clone(),
                        action,
                    },
                )
            })
            .collect();
        Self { bindings }
    }

    /// Resolve a trigger to the action it should run.
    pub fn resolve(&self, trigger: &Trigger) -> Result<Action, DispatchError> {
        match trigger {
            Trigger::Combo(combo) => {
                let binding = self
                    .bindings
                    .get(combo)
                    .ok_or_else(|| DispatchError::NoBinding(combo.clone()))?;
                binding.action.clone().map_err(DispatchError::Malformed)
            }
            Trigger::Action(source) => Ok(Action::parse(source)?),
        }
    }

    /// The raw action string bound to `combo`.
    pub fn source(&self, combo: &str) -> Option<&str> {
        self.bindings.get(combo).map(|b| b.source.as_str())
    }

    /// Bound combo names, sorted.
    pub fn combos(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Direction;
    use crate::navigator::TabDirection;

    fn registry(pairs: &[(&str, &str)]) -> BindingRegistry {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BindingRegistry::new(&map)
    }

    #[test]
    fn combo_resolves_to_parsed_action() {
        let reg = registry(&[("Mod4+Tab", "switch_tab next wrap"), ("Mod4+h", "switch left group")]);
        assert_eq!(
            reg.resolve(&Trigger::Combo("Mod4+Tab".into())),
            Ok(Action::SwitchTab {
                direction: TabDirection::Next,
                wrap: true
            })
        );
        assert_eq!(
            reg.resolve(&Trigger::Combo("Mod4+h".into())),
            Ok(Action::Switch {
                direction: Direction::Left,
                group: true
            })
        );
    }

    #[test]
    fn unknown_combo_is_reported() {
        let reg = registry(&[("Mod4+Tab", "switch_tab next")]);
        assert_eq!(
            reg.resolve(&Trigger::Combo("Mod4+q".into())),
            Err(DispatchError::NoBinding("Mod4+q".into()))
        );
    }

    #[test]
    fn malformed_binding_does_not_affect_others() {
        let reg = registry(&[("Mod4+1", "switch_to_tab one"), ("Mod4+2", "switch_to_tab 2")]);
        assert_eq!(reg.len(), 2);
        assert!(matches!(
            reg.resolve(&Trigger::Combo("Mod4+1".into())),
            Err(DispatchError::Malformed(_))
        ));
        assert_eq!(
            reg.resolve(&Trigger::Combo("Mod4+2".into())),
            Ok(Action::SwitchToTab(2))
        );
    }

    #[test]
    fn unbound_action_is_kept() {
        let reg = registry(&[("Mod4+x", "bogus_action")]);
        assert_eq!(
            reg.resolve(&Trigger::Combo("Mod4+x".into())),
            Ok(Action::Unbound("bogus_action".into()))
        );
        assert_eq!(reg.source("Mod4+x"), Some("bogus_action"));
    }

    #[test]
    fn raw_action_trigger_is_parsed() {
        let reg = BindingRegistry::default();
        assert!(reg.is_empty());
        assert_eq!(
            reg.resolve(&Trigger::Action("switch_to_tab 3".into())),
            Ok(Action::SwitchToTab(3))
        );
        assert!(matches!(
            reg.resolve(&Trigger::Action("switch_tab".into())),
            Err(DispatchError::Malformed(_))
        ));
    }

    #[test]
    fn trigger_wire_format() {
        let t: Trigger = serde_json::from_str(r#"{"Combo":"Mod4+Tab"}"#).unwrap();
        assert_eq!(t, Trigger::Combo("Mod4+Tab".into()));
        let t: Trigger = serde_json::from_str(r#"{"Action":"switch left"}"#).unwrap();
        assert_eq!(t, Trigger::Action("switch left".into()));
    }

    #[test]
    fn combos_are_sorted() {
        let reg = registry(&[("b", "switch up"), ("a", "switch down")]);
        assert_eq!(reg.combos().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
