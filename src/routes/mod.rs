/// Router Module Index
///
/// Organizes the application's routing logic into security-segregated modules,
/// applying access control explicitly at the module level (via Axum layers)
/// so that protected endpoints cannot be exposed by accident.
///
/// The three modules map directly onto the role ladder: anonymous visitors,
/// admins, and superadmins.

/// Routes accessible to all clients (anonymous, read-only, plus the auth
/// gateway). Handlers must enforce visibility (`show_on_main_page`) at the
/// Repository level.
pub mod public;

/// Routes requiring a validated JWT with at least the 'admin' role.
pub mod admin;

/// Routes restricted to the 'superadmin' role (staff account management).
pub mod superadmin;
