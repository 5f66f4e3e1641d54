mod intent;
mod session;
mod visualization;

pub use intent::{Complexity, Intent, QueryKind};
pub use session::{ErrorKind, QuerySession, Row, SessionError};
pub use visualization::{ChartKind, Visualization};
