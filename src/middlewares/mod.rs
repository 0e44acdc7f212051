pub mod require_actor;
pub mod require_role;

pub use require_actor::RequireActor;
pub use require_role::RequireRole;
