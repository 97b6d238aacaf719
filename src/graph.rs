use crate::pose::JointIndex;

/// COCO 17ジョイントの親→子エッジ (16本)
///
/// The order is the model's displacement-channel order: edge `e` reads
/// channels `(e, e + num_edges)`. Do not reorder.
pub const COCO_EDGES: [(JointIndex, JointIndex); 16] = [
    (JointIndex::Nose, JointIndex::LeftEye),
    (JointIndex::LeftEye, JointIndex::LeftEar),
    (JointIndex::Nose, JointIndex::RightEye),
    (JointIndex::RightEye, JointIndex::RightEar),
    (JointIndex::Nose, JointIndex::LeftShoulder),
    (JointIndex::LeftShoulder, JointIndex::LeftElbow),
    (JointIndex::LeftElbow, JointIndex::LeftWrist),
    (JointIndex::LeftShoulder, JointIndex::LeftHip),
    (JointIndex::LeftHip, JointIndex::LeftKnee),
    (JointIndex::LeftKnee, JointIndex::LeftAnkle),
    (JointIndex::Nose, JointIndex::RightShoulder),
    (JointIndex::RightShoulder, JointIndex::RightElbow),
    (JointIndex::RightElbow, JointIndex::RightWrist),
    (JointIndex::RightShoulder, JointIndex::RightHip),
    (JointIndex::RightHip, JointIndex::RightKnee),
    (JointIndex::RightKnee, JointIndex::RightAnkle),
];

/// 骨格トポロジー: 親→子ジョイントIDのエッジ木
///
/// Supplied as data so an alternate joint taxonomy can reuse the same
/// traversal engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoseGraph {
    edges: Vec<(usize, usize)>,
}

impl PoseGraph {
    pub fn new(edges: Vec<(usize, usize)>) -> Self {
        Self { edges }
    }

    /// COCO 17ジョイントの標準トポロジー
    pub fn coco() -> Self {
        Self {
            edges: COCO_EDGES
                .iter()
                .map(|&(p, c)| (p as usize, c as usize))
                .collect(),
        }
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// エッジの (親, 子) ジョイントID
    pub fn edge(&self, index: usize) -> (usize, usize) {
        self.edges[index]
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }
}

impl Default for PoseGraph {
    fn default() -> Self {
        Self::coco()
    }
}
