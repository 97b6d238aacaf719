pub mod kalman;
pub mod track_state;

pub use kalman::{AxisState, JointTrack, SmoothingParams};
pub use track_state::TrackState;
