use crate::config::VertexConfig;
use crate::normalize::NormalizedPair;

/// 可視化用の頂点クラウド (x, y, z の平坦な並び)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexCloud {
    data: Vec<f32>,
}

impl VertexCloud {
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }

    pub fn vertex_count(&self) -> usize {
        self.data.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter_vertices(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.data.chunks_exact(3).map(|v| [v[0], v[1], v[2]])
    }

    /// 軸平行バウンディングボックス (min, max)。空なら None
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let mut vertices = self.iter_vertices();
        let first = vertices.next()?;
        let (mut min, mut max) = (first, first);
        for v in vertices {
            for i in 0..3 {
                min[i] = min[i].min(v[i]);
                max[i] = max[i].max(v[i]);
            }
        }
        Some((min, max))
    }
}

/// 名前がノイズ関節（指・つま先・眼球など）に該当するか
fn is_noise_joint(name: &str, filters: &[String]) -> bool {
    let lower = name.to_lowercase();
    filters
        .iter()
        .any(|f| !f.is_empty() && lower.contains(&f.to_lowercase()))
}

/// 正面・側面の正規化セットを1つの頂点クラウドに融合
///
/// X は正面、Z は側面、Y は両者の平均から取る。
/// 両セットに存在する関節のみ対象。順序は正面セットの走査順
pub fn build_vertices(pair: &NormalizedPair, config: &VertexConfig) -> VertexCloud {
    let mut data = Vec::with_capacity(pair.front.joints.len() * 3);

    for (name, front) in &pair.front.joints {
        if is_noise_joint(name, &config.noise_filters) {
            continue;
        }
        let Some(side) = pair.side.joints.get(name) else {
            continue;
        };

        let x = front.x * config.spread_factor;
        let y = (front.y + side.y) / 2.0 + config.y_offset;
        let z = side.z * config.depth_scale + config.z_offset;
        data.extend_from_slice(&[x, y, z]);
    }

    VertexCloud { data }
}
