//! Command-line interface.
//!
//! ```text
//! i3switch [-c <path>]                      run the daemon
//! i3switch [-c <path>] daemon               same
//! i3switch [-c <path>] bindings             print the effective bindings
//! i3switch next|prev [wrap|nowrap]          cycle tabs once
//! i3switch number <num>                     focus tab <num>
//! i3switch left|right|up|down [group]       directional focus
//! i3switch <action> [args...]               any action string
//! ```

use crate::action::{Action, ActionError, Direction};
use crate::navigator::TabDirection;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// i3switch: tab-aware focus switching for i3 and sway.
#[derive(Debug, Parser)]
#[command(name = "i3switch", version)]
pub struct Cli {
    /// Config file to use instead of the standard locations.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the trigger daemon (the default).
    Daemon,
    /// Print the effective key bindings.
    Bindings,
    /// Focus the next tab.
    Next(WrapArg),
    /// Focus the previous tab.
    Prev(WrapArg),
    /// Focus a tab by its position, counting from 1.
    Number {
        #[arg(value_name = "num", allow_negative_numbers = true)]
        number: i64,
    },
    /// Move focus left.
    Left(GroupArg),
    /// Move focus right.
    Right(GroupArg),
    /// Move focus up.
    Up(GroupArg),
    /// Move focus down.
    Down(GroupArg),
    /// Any action string, e.g. `switch_tab next wrap`.
    #[command(external_subcommand)]
    Action(Vec<String>),
}

#[derive(Debug, Args)]
pub struct WrapArg {
    /// Whether to wrap around at the ends of the tab group.
    #[arg(value_enum, default_value_t = WrapOption::NoWrap)]
    pub wrap: WrapOption,
}

#[derive(Debug, Args)]
pub struct GroupArg {
    /// With `group`, leave the enclosing tab group instead of moving
    /// between its tabs.
    #[arg(value_enum, default_value_t = GroupOption::NoGroup)]
    pub group: GroupOption,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WrapOption {
    Wrap,
    #[value(name = "nowrap")]
    NoWrap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupOption {
    Group,
    #[value(name = "nogroup")]
    NoGroup,
}

/// What the process should do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Daemon,
    ListBindings,
    Once(Action),
}

impl Cli {
    /// Resolve the subcommand into a [`Mode`].
    pub fn mode(&self) -> Result<Mode, ActionError> {
        let action = match &self.command {
            None | Some(Commands::Daemon) => return Ok(Mode::Daemon),
            Some(Commands::Bindings) => return Ok(Mode::ListBindings),
            Some(Commands::Next(arg)) => tab(TabDirection::Next, arg),
            Some(Commands::Prev(arg)) => tab(TabDirection::Prev, arg),
            Some(Commands::Number { number }) => Action::SwitchToTab(*number),
            Some(Commands::Left(arg)) => switch(Direction::Left, arg),
            Some(Commands::Right(arg)) => switch(Direction::Right, arg),
            Some(Commands::Up(arg)) => switch(Direction::Up, arg),
            Some(Commands::Down(arg)) => switch(Direction::Down, arg),
            Some(Commands::Action(words)) => Action::parse(&words.join(" "))?,
        };
        Ok(Mode::Once(action))
    }
}

fn tab(direction: TabDirection, arg: &WrapArg) -> Action {
    Action::SwitchTab {
        direction,
        wrap: arg.wrap == WrapOption::Wrap,
    }
}

fn switch(direction: Direction, arg: &GroupArg) -> Action {
    Action::Switch {
        direction,
        group: arg.group == GroupOption::Group,
    }
}
