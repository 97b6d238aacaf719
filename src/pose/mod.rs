pub mod coords;
pub mod extract;
pub mod keypoint;
pub mod multi;
pub mod single;
pub mod traverse;

pub use coords::image_coords;
pub use extract::{extract_candidates, Candidate, LOCAL_MAXIMUM_RADIUS};
pub use keypoint::{JointIndex, Keypoint, Pose};
pub use multi::{decode_multi, MultiPoseParams};
pub use single::decode_single;
pub use traverse::decode_pose;
