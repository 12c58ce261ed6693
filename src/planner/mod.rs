//! Goal-oriented planner and action execution

pub mod action;
pub mod catalog;
pub mod executor;
pub mod goal;
pub mod search;

pub use action::{Action, ActionKind, ActionStatus, ExecContext, Invocation};
pub use catalog::ActionCatalog;
pub use executor::PlanExecutor;
pub use goal::{default_goals, Comparator, Condition, Goal};
pub use search::{plan_for_goal, select_plan, Plan};
