//! Forward transform for one independently processed segment.

use crate::model::PrefixModel;

/// Predict each byte from `dist` bytes earlier (when the table is
/// confident) and emit the XOR residual; otherwise pass the byte through.
/// While a predicted residual is zero, the walk keeps using the same
/// anchor distance instead of re-querying the table, since a confirmed
/// match usually keeps matching for a run.
pub fn forward_segment(data: &[u8]) -> Vec<u8> {
    let mut model = PrefixModel::new(data.len());
    let mut out = vec![0u8; data.len()];
    let mut pos = 0;
    while pos < data.len() {
        if let Some(dist) = model.dist_at(pos) {
            loop {
                let err = data[pos - dist] ^ data[pos];
                out[pos] = err;
                model.observe_byte(pos, data[pos]);
                pos += 1;
                if err != 0 || pos >= data.len() {
                    break;
                }
            }
        } else {
            out[pos] = data[pos];
            model.observe_byte(pos, data[pos]);
            pos += 1;
        }
    }
    out
}
