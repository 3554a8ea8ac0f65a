//! NMRPipe header field locations (indices into the 512-float header).

use crate::dataset::{Dataset, DimHeader};

/// Number of f32 values in a pipe header
pub const HEADER_LEN: usize = 512;

/// Byte-order check value stored at [`FDFLTORDER`]
pub(crate) const FLOAT_ORDER_CHECK: f32 = 2.345;

/// IEEE float format marker stored at [`FDFLTFORMAT`]
pub(crate) const FLOAT_FORMAT_IEEE: f32 = 4_008_636_160.0;

/// Magic word, zero for a valid header
pub(crate) const FDMAGIC: usize = 0;
/// Floating point format marker
pub(crate) const FDFLTFORMAT: usize = 1;
/// Byte-order check value
pub(crate) const FDFLTORDER: usize = 2;
/// Number of dimensions
pub(crate) const FDDIMCOUNT: usize = 9;
/// First of four slots giving the axis order
pub(crate) const FDDIMORDER: usize = 24;
/// Stream flag, zero for a plain file
pub(crate) const FDPIPEFLAG: usize = 57;
/// Points per record along F2
pub(crate) const FDSIZE: usize = 99;
/// 1 when every axis is real
pub(crate) const FDQUADFLAG: usize = 106;
/// Number of 1-D records in the file
pub(crate) const FDSPECNUM: usize = 219;
/// Transpose flag
pub(crate) const FDTRANSPOSED: usize = 221;
/// Number of files in the series
pub(crate) const FDFILECOUNT: usize = 442;

/// Field locations for one axis
#[derive(Debug, Clone, Copy)]
pub(crate) struct AxisFields {
    /// Sweep width in Hz
    pub(crate) sw: usize,
    /// Observe frequency in MHz
    pub(crate) obs: usize,
    /// Frequency of the last point in Hz
    pub(crate) orig: usize,
    /// Per-axis quad flag
    pub(crate) quad: usize,
    /// Frequency-domain flag
    pub(crate) ft: usize,
    /// First of two label slots
    pub(crate) label: usize,
    /// Centre point
    pub(crate) center: usize,
    /// Size slot for axes beyond the first two; F2 uses `FDSIZE` and F1
    /// uses `FDSPECNUM`
    pub(crate) size: Option<usize>,
}

/// F2, F1, F3, F4: dataset dimensions 0 to 3
pub(crate) const AXES: [AxisFields; 4] = [
    AxisFields {
        sw: 100,
        obs: 119,
        orig: 101,
        quad: 56,
        ft: 220,
        label: 16,
        center: 79,
        size: None,
    },
    AxisFields {
        sw: 229,
        obs: 218,
        orig: 249,
        quad: 55,
        ft: 222,
        label: 18,
        center: 80,
        size: None,
    },
    AxisFields {
        sw: 11,
        obs: 10,
        orig: 12,
        quad: 51,
        ft: 13,
        label: 20,
        center: 81,
        size: Some(15),
    },
    AxisFields {
        sw: 29,
        obs: 28,
        orig: 30,
        quad: 54,
        ft: 31,
        label: 22,
        center: 82,
        size: Some(32),
    },
];

/// Build the header describing `dataset`
///
/// The caller checks that the dataset has at most four dimensions.
pub(crate) fn build(dataset: &Dataset) -> Vec<f32> {
    let dims = &dataset.header().dims;
    let mut header = vec![0f32; HEADER_LEN];

    header[FDMAGIC] = 0.0;
    header[FDFLTFORMAT] = FLOAT_FORMAT_IEEE;
    header[FDFLTORDER] = FLOAT_ORDER_CHECK;
    header[FDDIMCOUNT] = dims.len() as f32;
    for (slot, order) in header[FDDIMORDER..FDDIMORDER + 4]
        .iter_mut()
        .zip([2.0, 1.0, 3.0, 4.0])
    {
        *slot = order;
    }
    header[FDPIPEFLAG] = 0.0;
    header[FDFILECOUNT] = 1.0;
    header[FDTRANSPOSED] = 0.0;

    let all_real = dims.iter().all(|d| !d.complex);
    header[FDQUADFLAG] = if all_real { 1.0 } else { 0.0 };

    header[FDSIZE] = dims.first().map_or(0, |d| d.size) as f32;
    // one 1-D record per stored row of the outer dimensions
    let records: usize = dims.iter().skip(1).map(|d| d.stored_size()).product();
    header[FDSPECNUM] = records as f32;

    for (dim, fields) in dims.iter().zip(AXES.iter()) {
        write_axis(&mut header, dim, fields);
    }
    header
}

fn write_axis(header: &mut [f32], dim: &DimHeader, fields: &AxisFields) {
    header[fields.sw] = dim.sw as f32;
    header[fields.obs] = dim.sf as f32;
    // frequency of the last point, in Hz
    header[fields.orig] = (dim.point_to_ppm(dim.size.saturating_sub(1) as f64) * dim.sf) as f32;
    header[fields.quad] = if dim.complex { 0.0 } else { 1.0 };
    header[fields.ft] = 1.0;
    header[fields.center] = (dim.size / 2 + 1) as f32;
    if let Some(size) = fields.size {
        header[size] = dim.size as f32;
    }
    let [first, second] = pack_label(&dim.label);
    header[fields.label] = first;
    header[fields.label + 1] = second;
}

/// Pack up to 8 label bytes into two floats, zero padded
pub(crate) fn pack_label(label: &str) -> [f32; 2] {
    let mut bytes = [0u8; 8];
    for (slot, byte) in bytes.iter_mut().zip(label.bytes()) {
        *slot = byte;
    }
    [
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]),
        f32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
    ]
}
