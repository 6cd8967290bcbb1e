//! User CRUD and admin-action HTTP handlers.

mod handlers;

pub use handlers::{
    approve_user, create_user, delete_user, disable_user, get_user, update_user,
};
