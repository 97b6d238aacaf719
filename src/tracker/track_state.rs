use super::kalman::JointTrack;

/// 前フレームのポーズ状態: max_poses 個の固定スロット
///
/// Owned by the caller and passed to the decoder by reference each frame;
/// the decoder reads it and overwrites it, never retains it. Slot `i`
/// always corresponds to the `i`-th pose returned by the previous call.
/// Not reentrant: frames for the same TrackState must be serialized.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackState {
    slots: Vec<Vec<JointTrack>>,
    num_joints: usize,
}

impl TrackState {
    pub fn new(max_poses: usize, num_joints: usize) -> Self {
        Self {
            slots: vec![vec![JointTrack::default(); num_joints]; max_poses],
            num_joints,
        }
    }

    pub fn max_poses(&self) -> usize {
        self.slots.len()
    }

    pub fn num_joints(&self) -> usize {
        self.num_joints
    }

    pub fn slot(&self, index: usize) -> &[JointTrack] {
        &self.slots[index]
    }

    pub(crate) fn slot_mut(&mut self, index: usize) -> &mut [JointTrack] {
        &mut self.slots[index]
    }

    /// 被写体が消えたスロットのトラックを破棄する
    pub fn reset_slot(&mut self, index: usize) {
        for track in &mut self.slots[index] {
            track.reset();
        }
    }

    pub fn reset(&mut self) {
        for index in 0..self.slots.len() {
            self.reset_slot(index);
        }
    }
}
