//! Actions and the focus commands they resolve to.
//!
//! This module defines the vocabulary shared by all components:
//! [`Action`] is what a key binding asks for, [`Intent`] is what the window
//! manager is finally told to do, and [`Direction`] /
//! [`TabDirection`] qualify both.
//!
//! Bindings are written as whitespace-separated strings, e.g.
//! `"switch left group"`, `"switch_tab next wrap"`, `"switch_to_tab 3"`.

use crate::navigator::TabDirection;
use crate::tree::ConId;
use std::fmt;
use std::num::IntErrorKind;

/// Geometric focus direction, passed through to the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// Focus the parent container.
    Parent,
    /// Focus the most recently focused child.
    Child,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
            Direction::Parent => write!(f, "parent"),
            Direction::Child => write!(f, "child"),
        }
    }
}

/// Parse a direction word (case-insensitive; `top`/`bottom` are accepted
/// for `up`/`down`).
pub fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" | "top" => Some(Direction::Up),
        "down" | "bottom" => Some(Direction::Down),
        "parent" => Some(Direction::Parent),
        "child" => Some(Direction::Child),
        _ => None,
    }
}

fn parse_tab_direction(s: &str) -> Option<TabDirection> {
    match s.trim().to_lowercase().as_str() {
        "next" => Some(TabDirection::Next),
        "prev" | "previous" => Some(TabDirection::Prev),
        _ => None,
    }
}

/// Every action a binding can name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `switch <direction> [group|nogroup]`
    ///
    /// Move focus geometrically.  With `group`, a window inside a tab group
    /// first focuses the whole group so the move leaves it instead of
    /// cycling between its tabs.
    Switch { direction: Direction, group: bool },

    /// `switch_tab <next|prev> [wrap|nowrap]`
    SwitchTab { direction: TabDirection, wrap: bool },

    /// `switch_to_tab <number>`, 1-based.
    SwitchToTab(i64),

    /// Any action name not listed above.  Kept so that triggering it can be
    /// reported instead of silently ignored.
    Unbound(String),
}

/// A known action whose arguments do not parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("empty action")]
    Empty,
    #[error("{action}: missing argument, expected {expected}")]
    MissingArgument {
        action: &'static str,
        expected: &'static str,
    },
    #[error("{action}: invalid argument {value:?}, expected {expected}")]
    InvalidArgument {
        action: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("{action}: unexpected argument {value:?}")]
    UnexpectedArgument { action: &'static str, value: String },
}

/// Parse an optional `on`/`off` style keyword argument.
fn parse_flag(
    action: &'static str,
    arg: Option<&str>,
    on: &'static str,
    off: &'static str,
    expected: &'static str,
) -> Result<bool, ActionError> {
    match arg {
        None => Ok(false),
        Some(a) if a.eq_ignore_ascii_case(on) => Ok(true),
        Some(a) if a.eq_ignore_ascii_case(off) => Ok(false),
        Some(a) => Err(ActionError::InvalidArgument {
            action,
            value: a.to_string(),
            expected,
        }),
    }
}

impl Action {
    /// Parse `"<action> [arg]*"`.
    ///
    /// Besides the `switch*` forms, the short command-line forms are
    /// accepted: `next [wrap]`, `prev [wrap]`, `number <n>` and
    /// `<direction> [group]`.  Names and keywords are case-insensitive.
    ///
    /// An unknown action name is not an error: it yields
    /// [`Action::Unbound`].  A known name with bad arguments is.
    pub fn parse(s: &str) -> Result<Self, ActionError> {
        let mut tokens = s.split_whitespace();
        let name = tokens.next().ok_or(ActionError::Empty)?;
        let args: Vec<&str> = tokens.collect();

        let action = match name.to_lowercase().as_str() {
            "switch" => {
                const EXPECTED: &str = "left, right, up, down, parent or child";
                let word = first_arg("switch", &args, EXPECTED)?;
                let direction = parse_direction(word).ok_or_else(|| ActionError::InvalidArgument {
                    action: "switch",
                    value: word.to_string(),
                    expected: EXPECTED,
                })?;
                switch(direction, "switch", &args[1..])?
            }
            "switch_tab" => {
                const EXPECTED: &str = "next or prev";
                let word = first_arg("switch_tab", &args, EXPECTED)?;
                let direction =
                    parse_tab_direction(word).ok_or_else(|| ActionError::InvalidArgument {
                        action: "switch_tab",
                        value: word.to_string(),
                        expected: EXPECTED,
                    })?;
                switch_tab(direction, "switch_tab", &args[1..])?
            }
            "next" => switch_tab(TabDirection::Next, "next", &args)?,
            "prev" | "previous" => switch_tab(TabDirection::Prev, "prev", &args)?,
            "switch_to_tab" => switch_to_tab("switch_to_tab", &args)?,
            "number" => switch_to_tab("number", &args)?,
            other => match parse_direction(other) {
                Some(direction) => switch(direction, "switch", &args)?,
                None => Action::Unbound(name.to_string()),
            },
        };
        Ok(action)
    }

    /// Whether deciding this action requires a tree snapshot.
    pub fn needs_snapshot(&self) -> bool {
        !matches!(
            self,
            Action::Switch { group: false, .. } | Action::Unbound(_)
        )
    }
}

fn first_arg<'a>(
    action: &'static str,
    args: &[&'a str],
    expected: &'static str,
) -> Result<&'a str, ActionError> {
    args.first()
        .copied()
        .ok_or(ActionError::MissingArgument { action, expected })
}

/// `[group|nogroup]` after the direction.
fn switch(direction: Direction, action: &'static str, rest: &[&str]) -> Result<Action, ActionError> {
    let group = parse_flag(action, rest.first().copied(), "group", "nogroup", "group or nogroup")?;
    reject_extra(action, rest, 1)?;
    Ok(Action::Switch { direction, group })
}

/// `[wrap|nowrap]` after the tab direction.
fn switch_tab(
    direction: TabDirection,
    action: &'static str,
    rest: &[&str],
) -> Result<Action, ActionError> {
    let wrap = parse_flag(action, rest.first().copied(), "wrap", "nowrap", "wrap or nowrap")?;
    reject_extra(action, rest, 1)?;
    Ok(Action::SwitchTab { direction, wrap })
}

/// `<number>`.  Numbers beyond `i64` saturate; they name no tab either way.
fn switch_to_tab(action: &'static str, args: &[&str]) -> Result<Action, ActionError> {
    const EXPECTED: &str = "a tab number";
    let word = first_arg(action, args, EXPECTED)?;
    let n = match word.parse::<i64>() {
        Ok(n) => n,
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => i64::MAX,
            IntErrorKind::NegOverflow => i64::MIN,
            _ => {
                return Err(ActionError::InvalidArgument {
                    action,
                    value: word.to_string(),
                    expected: EXPECTED,
                })
            }
        },
    };
    reject_extra(action, args, 1)?;
    Ok(Action::SwitchToTab(n))
}

fn reject_extra(action: &'static str, args: &[&str], allowed: usize) -> Result<(), ActionError> {
    match args.get(allowed) {
        Some(extra) => Err(ActionError::UnexpectedArgument {
            action,
            value: extra.to_string(),
        }),
        None => Ok(()),
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Switch { direction, group } => {
                write!(f, "switch {}", direction)?;
                if *group {
                    write!(f, " group")?;
                }
                Ok(())
            }
            Action::SwitchTab { direction, wrap } => {
                write!(f, "switch_tab {}", direction)?;
                if *wrap {
                    write!(f, " wrap")?;
                }
                Ok(())
            }
            Action::SwitchToTab(n) => write!(f, "switch_to_tab {}", n),
            Action::Unbound(name) => write!(f, "{}", name),
        }
    }
}

/// One command for the window manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusCommand {
    /// `[con_id=<id>] focus`
    Id(ConId),
    /// `focus <direction>`
    Direction(Direction),
}

/// What a successful dispatch asks the window manager to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Move focus geometrically.
    Direction(Direction),
    /// Focus the tab group container, then move out of it.
    GroupDirection { group: ConId, direction: Direction },
    /// Focus a specific container.
    Container(ConId),
}

impl Intent {
    /// The commands to send, in order.
    pub fn commands(&self) -> Vec<FocusCommand> {
        match *self {
            Intent::Direction(direction) => vec![FocusCommand::Direction(direction)],
            Intent::GroupDirection { group, direction } => {
                vec![FocusCommand::Id(group), FocusCommand::Direction(direction)]
            }
            Intent::Container(id) => vec![FocusCommand::Id(id)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_display() {
        assert_eq!(Direction::Left.to_string(), "left");
        assert_eq!(Direction::Right.to_string(), "right");
        assert_eq!(Direction::Up.to_string(), "up");
        assert_eq!(Direction::Down.to_string(), "down");
        assert_eq!(Direction::Parent.to_string(), "parent");
        assert_eq!(Direction::Child.to_string(), "child");
    }

    #[test]
    fn direction_aliases_and_case() {
        assert_eq!(parse_direction("LEFT"), Some(Direction::Left));
        assert_eq!(parse_direction("top"), Some(Direction::Up));
        assert_eq!(parse_direction("bottom"), Some(Direction::Down));
        assert_eq!(parse_direction("sideways"), None);
    }

    #[test]
    fn parse_switch() {
        assert_eq!(
            Action::parse("switch left"),
            Ok(Action::Switch {
                direction: Direction::Left,
                group: false
            })
        );
        assert_eq!(
            Action::parse("switch  down   group"),
            Ok(Action::Switch {
                direction: Direction::Down,
                group: true
            })
        );
        assert_eq!(
            Action::parse("switch up nogroup"),
            Ok(Action::Switch {
                direction: Direction::Up,
                group: false
            })
        );
    }

    #[test]
    fn parse_switch_tab_defaults_to_nowrap() {
        assert_eq!(
            Action::parse("switch_tab next"),
            Ok(Action::SwitchTab {
                direction: TabDirection::Next,
                wrap: false
            })
        );
        assert_eq!(
            Action::parse("switch_tab prev wrap"),
            Ok(Action::SwitchTab {
                direction: TabDirection::Prev,
                wrap: true
            })
        );
        assert_eq!(
            Action::parse("switch_tab prev nowrap"),
            Ok(Action::SwitchTab {
                direction: TabDirection::Prev,
                wrap: false
            })
        );
    }

    #[test]
    fn parse_switch_to_tab() {
        assert_eq!(Action::parse("switch_to_tab 3"), Ok(Action::SwitchToTab(3)));
        assert_eq!(Action::parse("switch_to_tab 0"), Ok(Action::SwitchToTab(0)));
    }

    #[test]
    fn unknown_action_is_unbound_not_error() {
        assert_eq!(
            Action::parse("bogus_action 1 2"),
            Ok(Action::Unbound("bogus_action".into()))
        );
    }

    #[test]
    fn malformed_arguments_are_errors() {
        assert_eq!(Action::parse(""), Err(ActionError::Empty));
        assert_eq!(Action::parse("   "), Err(ActionError::Empty));
        assert!(matches!(
            Action::parse("switch_to_tab two"),
            Err(ActionError::InvalidArgument { action: "switch_to_tab", .. })
        ));
        assert!(matches!(
            Action::parse("switch_to_tab"),
            Err(ActionError::MissingArgument { action: "switch_to_tab", .. })
        ));
        assert!(matches!(
            Action::parse("switch sideways"),
            Err(ActionError::InvalidArgument { action: "switch", .. })
        ));
        assert!(matches!(
            Action::parse("switch_tab next twice"),
            Err(ActionError::InvalidArgument { action: "switch_tab", .. })
        ));
        assert!(matches!(
            Action::parse("switch_tab next wrap now"),
            Err(ActionError::UnexpectedArgument { action: "switch_tab", .. })
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for s in ["switch left group", "switch up", "switch_tab next wrap", "switch_tab prev", "switch_to_tab 4"] {
            let action = Action::parse(s).unwrap();
            assert_eq!(action.to_string(), s);
        }
    }

    #[test]
    fn only_plain_switch_skips_snapshot() {
        assert!(!Action::parse("switch left").unwrap().needs_snapshot());
        assert!(Action::parse("switch left group").unwrap().needs_snapshot());
        assert!(Action::parse("switch_tab next").unwrap().needs_snapshot());
        assert!(Action::parse("switch_to_tab 1").unwrap().needs_snapshot());
    }

    #[test]
    fn intent_commands_in_order() {
        assert_eq!(
            Intent::GroupDirection {
                group: 7,
                direction: Direction::Right
            }
            .commands(),
            vec![FocusCommand::Id(7), FocusCommand::Direction(Direction::Right)]
        );
        assert_eq!(Intent::Container(3).commands(), vec![FocusCommand::Id(3)]);
        assert_eq!(
            Intent::Direction(Direction::Up).commands(),
            vec![FocusCommand::Direction(Direction::Up)]
        );
    }

    #[test]
    fn short_command_forms() {
        assert_eq!(
            Action::parse("next wrap"),
            Ok(Action::SwitchTab {
                direction: TabDirection::Next,
                wrap: true
            })
        );
        assert_eq!(
            Action::parse("prev"),
            Ok(Action::SwitchTab {
                direction: TabDirection::Prev,
                wrap: false
            })
        );
        assert_eq!(Action::parse("number 3"), Ok(Action::SwitchToTab(3)));
        assert_eq!(
            Action::parse("left group"),
            Ok(Action::Switch {
                direction: Direction::Left,
                group: true
            })
        );
        assert_eq!(
            Action::parse("bottom"),
            Ok(Action::Switch {
                direction: Direction::Down,
                group: false
            })
        );
        assert!(matches!(
            Action::parse("next sideways"),
            Err(ActionError::InvalidArgument { action: "next", .. })
        ));
        assert!(matches!(
            Action::parse("number"),
            Err(ActionError::MissingArgument { action: "number", .. })
        ));
    }

    #[test]
    fn action_names_ignore_case() {
        assert_eq!(
            Action::parse("Switch_Tab NEXT Wrap"),
            Ok(Action::SwitchTab {
                direction: TabDirection::Next,
                wrap: true
            })
        );
        assert_eq!(Action::parse("SWITCH_TO_TAB 2"), Ok(Action::SwitchToTab(2)));
        assert_eq!(Action::parse("Bogus"), Ok(Action::Unbound("Bogus".into())));
    }

    #[test]
    fn huge_tab_numbers_saturate() {
        assert_eq!(
            Action::parse("switch_to_tab 99999999999999999999"),
            Ok(Action::SwitchToTab(i64::MAX))
        );
        assert_eq!(
            Action::parse("number -99999999999999999999"),
            Ok(Action::SwitchToTab(i64::MIN))
        );
    }
}
