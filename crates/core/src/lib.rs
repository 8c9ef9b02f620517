pub mod dataset;
pub mod error;
pub mod event;
pub mod reading;
pub mod schema;
pub mod state;
pub mod trend;
pub mod view;
pub mod widget;
pub mod window;

pub use error::{DashError, NoTrendAvailable, Result};
pub use event::Message;
pub use reading::{Reading, Timestamp};
pub use schema::ReadingSchema;
pub use state::DashState;
pub use trend::{fit_trend, Trend};
pub use view::{Cell, DerivedView, Table};
pub use window::SampleWindow;
