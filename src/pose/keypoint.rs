/// COCO 17 ジョイントインデックス (ResNet50/MobileNet系の正規順序)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum JointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl JointIndex {
    pub const COUNT: usize = 17;

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nose),
            1 => Some(Self::LeftEye),
            2 => Some(Self::RightEye),
            3 => Some(Self::LeftEar),
            4 => Some(Self::RightEar),
            5 => Some(Self::LeftShoulder),
            6 => Some(Self::RightShoulder),
            7 => Some(Self::LeftElbow),
            8 => Some(Self::RightElbow),
            9 => Some(Self::LeftWrist),
            10 => Some(Self::RightWrist),
            11 => Some(Self::LeftHip),
            12 => Some(Self::RightHip),
            13 => Some(Self::LeftKnee),
            14 => Some(Self::RightKnee),
            15 => Some(Self::LeftAnkle),
            16 => Some(Self::RightAnkle),
            _ => None,
        }
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// 入力画像ピクセルX座標
    pub x: f32,
    /// 入力画像ピクセルY座標
    pub y: f32,
    /// ヒートマップ信頼度 (0.0〜1.0)
    pub score: f32,
    /// ジョイントID
    pub joint: usize,
}

impl Keypoint {
    pub fn new(score: f32, x: f32, y: f32, joint: usize) -> Self {
        Self { x, y, score, joint }
    }

    /// 未解決スロットの番兵値
    pub fn sentinel(joint: usize) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            score: 0.0,
            joint,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.score == 0.0 && self.x == 0.0 && self.y == 0.0
    }

    /// 信頼度が閾値以上か
    pub fn is_valid(&self, threshold: f32) -> bool {
        self.score >= threshold
    }

    pub fn distance_squared_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x - x;
        let dy = self.y - y;
        dx * dx + dy * dy
    }
}

/// num_joints 個のキーポイントからなる姿勢 (添字 = ジョイントID)
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
}

impl Pose {
    pub fn new(keypoints: Vec<Keypoint>) -> Self {
        Self { keypoints }
    }

    /// 全スロットが番兵値の姿勢
    pub fn sentinel(num_joints: usize) -> Self {
        Self {
            keypoints: (0..num_joints).map(Keypoint::sentinel).collect(),
        }
    }

    pub fn num_joints(&self) -> usize {
        self.keypoints.len()
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, joint: JointIndex) -> &Keypoint {
        &self.keypoints[joint as usize]
    }

    /// 全キーポイントの平均信頼度
    pub fn average_score(&self) -> f32 {
        if self.keypoints.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.keypoints.iter().map(|k| k.score).sum();
        sum / self.keypoints.len() as f32
    }
}
