pub mod policy;

pub use policy::{GreedyPolicy, PolicyKind, RandomPolicy, ScriptedPolicy};
pub use sixtysix_core::game::policy::Policy;
