/// Handler Module Index
///
/// One submodule per resource controller, mirroring the route modules. Each
/// handler validates its input, performs a repository call, and returns JSON;
/// authorization is a `require_role` check at the top of guarded handlers.
pub mod auth;
pub mod categories;
pub mod menu;
pub mod social;
pub mod users;
pub mod working_hours;
