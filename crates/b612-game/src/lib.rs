//! The viewer itself: view state machine, per-frame session and the
//! fixed-step loop that drives it.

pub mod frame_loop;
pub mod log_sink;
pub mod session;
pub mod settings;
pub mod view_state;

pub use frame_loop::{FIXED_DT, FrameLoop, MAX_FRAME_TIME};
pub use log_sink::LogDialogueSink;
pub use session::{FrameInput, FrameOutput, QUOTE_DISPLAY_FRAMES, Session, SessionEvent};
pub use settings::Settings;
pub use view_state::{
    TransitionError, ViewAction, ViewMode, ViewModeKind, ViewStateMachine, ZoomSettings,
};
