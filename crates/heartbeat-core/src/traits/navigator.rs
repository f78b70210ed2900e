//! Navigation signal trait.

use crate::navigation::Route;

/// Receiver of navigation requests issued outside of user interaction,
/// such as the forced redirect to login after the session is lost.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
