//! CLI command handlers, one file per command.

mod add_user;
mod check;
mod login;
mod logout;
mod show;
mod upload;
mod users;

pub use add_user::run_add_user;
pub use check::run_check;
pub use login::run_login;
pub use logout::run_logout;
pub use show::run_show;
pub use upload::run_upload;
pub use users::run_users;
