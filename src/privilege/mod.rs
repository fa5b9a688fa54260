pub mod finalizer;
pub mod session;

pub use finalizer::{install_signal_handler, Finalizer};
pub use session::{Authorizer, PrivilegeSession, SudoAuthorizer};
