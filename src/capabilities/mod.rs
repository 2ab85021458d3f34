mod api;
mod timer;

pub use self::api::{Api, ApiError, ApiOperation, ApiOutput, ApiResult};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

// We use Crux's built-in Render capability directly because it provides
// all necessary functionality for triggering view updates.
pub use crux_core::render::Render;

use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub api: Api<Event>,
    pub timer: Timer<Event>,
}
